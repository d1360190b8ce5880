//! Domains in an account.

use ds_api::{HttpMethod, Query};
use ds_engine::{
    handle_paginated_list, pagination_fields, ExecutionContext, FieldDescriptor, PaginationOptions,
    ResourceDefinition, SelectOption,
};
use ds_error::Result;
use futures::future::BoxFuture;
use serde_json::json;

use crate::common::{account_field, account_id, fetch, segment_param, HandlerFuture};

pub const RESOURCE: &str = "domain";

pub fn definition() -> ResourceDefinition {
    let mut fields = vec![
        account_field(RESOURCE),
        FieldDescriptor::locator("domain", "Domain", "searchDomains")
            .required()
            .describe("Domain name or ID")
            .show_for(RESOURCE, &["get", "delete"]),
        FieldDescriptor::string("name", "Name")
            .required()
            .describe("Domain name to add to the account")
            .show_for(RESOURCE, &["create"]),
        FieldDescriptor::string("nameLike", "Name Like")
            .describe("Only return domains whose name contains this text")
            .show_for(RESOURCE, &["list"]),
        FieldDescriptor::string("sort", "Sort")
            .describe("e.g. name:asc, expiration:desc")
            .show_for(RESOURCE, &["list"]),
    ];
    fields.extend(pagination_fields(RESOURCE, "list"));

    ResourceDefinition::new(RESOURCE)
        .operation("list", "List", "List domains", list)
        .operation("get", "Get", "Get a domain", get)
        .operation("create", "Create", "Add a domain to the account", create)
        .operation("delete", "Delete", "Remove a domain from the account", delete)
        .fields(fields)
        .list_search("searchDomains", search_domains)
}

fn list<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let account = account_id(ctx, item_index).await?;
        let options = PaginationOptions::new()
            .with_optional_query("name_like", ctx.optional_string_param("nameLike", item_index))
            .with_optional_query("sort", ctx.optional_string_param("sort", item_index));
        handle_paginated_list(ctx, item_index, &format!("/{account}/domains"), options).await
    })
}

fn get<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let domain = segment_param(ctx, "domain", item_index)?;
        let account = account_id(ctx, item_index).await?;
        let path = format!("/{account}/domains/{domain}");
        fetch(ctx, item_index, HttpMethod::Get, &path, None).await
    })
}

fn create<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let name = ctx.string_param("name", item_index)?;
        let account = account_id(ctx, item_index).await?;
        let path = format!("/{account}/domains");
        fetch(ctx, item_index, HttpMethod::Post, &path, Some(json!({ "name": name }))).await
    })
}

fn delete<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let domain = segment_param(ctx, "domain", item_index)?;
        let account = account_id(ctx, item_index).await?;
        let path = format!("/{account}/domains/{domain}");
        fetch(ctx, item_index, HttpMethod::Delete, &path, None).await
    })
}

/// Domain picker: first page of domains matching the filter text.
fn search_domains<'a>(
    ctx: &'a dyn ExecutionContext,
    filter: Option<&'a str>,
) -> BoxFuture<'a, Result<Vec<SelectOption>>> {
    Box::pin(async move {
        let account = account_id(ctx, 0).await?;
        let mut query = Query::new();
        query.insert("per_page".to_string(), "100".to_string());
        query.insert("sort".to_string(), "name:asc".to_string());
        if let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) {
            query.insert("name_like".to_string(), filter.to_string());
        }
        let response = ctx
            .http()
            .request(HttpMethod::Get, &format!("/{account}/domains"), &query, None)
            .await?;
        Ok(ds_engine::extract_array(&response, "data")
            .iter()
            .filter_map(|d| {
                let name = d["name"].as_str()?;
                Some(SelectOption::new(name, name))
            })
            .collect())
    })
}
