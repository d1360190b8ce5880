//! Generic pagination over DNSimple list endpoints.
//!
//! List endpoints answer with `{ "data": [...], "pagination": { "current_page",
//! "per_page", "total_entries", "total_pages" } }`. Some endpoints nest the
//! array deeper (analytics returns `data.rows`), so the array location is a
//! dot-path.
//!
//! Pages are fetched one after another against live state: records created or
//! removed between two page requests may be skipped or seen twice.

use ds_api::{HttpClient, HttpMethod, Query};
use ds_error::{AdapterError, Result};
use serde_json::Value;

use crate::context::{ExecutionContext, DEFAULT_MAX_PAGES};
use crate::record::{to_records, OutputRecord};

pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_PER_PAGE: u32 = 100;
/// Page size used by a bounded fetch when the host supplies no `limit`.
pub const DEFAULT_LIMIT: u64 = 50;

#[derive(Debug, Clone)]
pub struct PaginationOptions {
    /// Extra query parameters. `page` and `per_page` are overwritten on every request.
    pub qs: Query,
    pub data_path: String,
    pub per_page: u32,
    /// Hard stop for servers that keep reporting more pages.
    pub max_pages: u32,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            qs: Query::new(),
            data_path: DEFAULT_DATA_PATH.to_string(),
            per_page: DEFAULT_PER_PAGE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl PaginationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.qs.insert(key.to_string(), value.to_string());
        self
    }

    /// Set `key` only when a value is present.
    pub fn with_optional_query(self, key: &str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    pub fn with_data_path(mut self, data_path: &str) -> Self {
        self.data_path = data_path.to_string();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

impl PaginationState {
    pub fn start(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            has_more: true,
        }
    }

    /// Record the server's `total_pages` for the page just fetched.
    pub fn advance(&mut self, total_pages: Option<u64>) {
        self.has_more = total_pages.map_or(false, |total| total > u64::from(self.page));
        if self.has_more {
            self.page += 1;
        }
    }
}

/// Locate the array at a dot-separated path (`"data"`, `"data.rows"`).
///
/// A missing path, or one that ends on something other than an array, yields
/// no records rather than an error.
pub fn extract_array(response: &Value, data_path: &str) -> Vec<Value> {
    let mut current = response;
    for segment in data_path.split('.').filter(|s| !s.is_empty()) {
        match current.get(segment) {
            Some(next) => current = next,
            None => return Vec::new(),
        }
    }
    match current {
        Value::Array(items) => items.clone(),
        _ => Vec::new(),
    }
}

pub fn total_pages(response: &Value) -> Option<u64> {
    response.get("pagination")?.get("total_pages")?.as_u64()
}

/// Walk every page of `endpoint`, concatenating the arrays in page order.
///
/// Any request failure aborts the walk and nothing collected so far is
/// returned.
pub async fn fetch_all_pages(
    http: &dyn HttpClient,
    endpoint: &str,
    options: &mut PaginationOptions,
) -> Result<Vec<Value>> {
    let mut state = PaginationState::start(options.per_page.max(1));
    let max_pages = options.max_pages.max(1);
    let mut collected = Vec::new();

    while state.has_more {
        if state.page > max_pages {
            tracing::error!(%endpoint, max_pages, "server kept reporting more pages");
            return Err(AdapterError::PageLimitExceeded {
                endpoint: endpoint.to_string(),
                max_pages,
            });
        }

        options.qs.insert("page".to_string(), state.page.to_string());
        options
            .qs
            .insert("per_page".to_string(), state.per_page.to_string());

        let response = http
            .request(HttpMethod::Get, endpoint, &options.qs, None)
            .await?;
        let items = extract_array(&response, &options.data_path);
        let reported = total_pages(&response);
        tracing::debug!(
            %endpoint,
            page = state.page,
            count = items.len(),
            total_pages = ?reported,
            "fetched page"
        );

        collected.extend(items);
        state.advance(reported);
    }

    Ok(collected)
}

/// Apply the host's `returnAll` / `limit` choice to a list endpoint.
///
/// With `returnAll` every page is fetched. Otherwise one request is made with
/// `per_page = limit`; a server whose page maximum is below `limit` returns
/// fewer records and that is not an error.
pub async fn handle_paginated_list(
    ctx: &dyn ExecutionContext,
    item_index: usize,
    endpoint: &str,
    mut options: PaginationOptions,
) -> Result<Vec<OutputRecord>> {
    let return_all = ctx.bool_param("returnAll", item_index, false)?;

    let items = if return_all {
        options.max_pages = options.max_pages.min(ctx.max_pages());
        fetch_all_pages(ctx.http(), endpoint, &mut options).await?
    } else {
        let limit = ctx.u64_param("limit", item_index, DEFAULT_LIMIT)?;
        if limit == 0 {
            return Err(AdapterError::InvalidParameter {
                name: "limit".to_string(),
                item_index,
                reason: "must be at least 1".to_string(),
            });
        }
        options
            .qs
            .insert("per_page".to_string(), limit.to_string());
        let response = ctx
            .http()
            .request(HttpMethod::Get, endpoint, &options.qs, None)
            .await?;
        extract_array(&response, &options.data_path)
    };

    Ok(to_records(items, item_index))
}
