//! Records inside a hosted zone.

use ds_api::HttpMethod;
use ds_engine::{
    handle_paginated_list, pagination_fields, ExecutionContext, FieldDescriptor, PaginationOptions,
    ResourceDefinition, SelectOption,
};
use ds_error::AdapterError;
use serde_json::Value;

use crate::common::{
    account_field, account_id, body_with, fetch, segment_param, update_body, HandlerFuture,
};

pub const RESOURCE: &str = "record";

const RECORD_TYPES: &[&str] = &[
    "A", "AAAA", "ALIAS", "CAA", "CNAME", "HINFO", "MX", "NAPTR", "NS", "POOL", "PTR", "SPF", "SRV",
    "SSHFP", "TXT", "URL",
];

pub fn definition() -> ResourceDefinition {
    let type_options = RECORD_TYPES
        .iter()
        .map(|t| SelectOption::new(*t, *t))
        .collect::<Vec<_>>();

    let mut fields = vec![
        account_field(RESOURCE),
        FieldDescriptor::string("zone", "Zone")
            .required()
            .load_options("getZones")
            .show_for(RESOURCE, &[]),
        FieldDescriptor::string("recordId", "Record ID")
            .required()
            .show_for(RESOURCE, &["get", "update", "delete"]),
        FieldDescriptor::string("name", "Name")
            .describe("Record name without the zone; @ for the apex")
            .show_for(RESOURCE, &["create", "list"]),
        FieldDescriptor::options("type", "Type", type_options)
            .required()
            .show_for(RESOURCE, &["create"]),
        FieldDescriptor::string("content", "Content")
            .required()
            .show_for(RESOURCE, &["create"]),
        FieldDescriptor::number("ttl", "TTL", 3600).show_for(RESOURCE, &["create"]),
        FieldDescriptor::json("additionalFields", "Additional Fields")
            .describe("priority, regions, integrated_zones")
            .show_for(RESOURCE, &["create"]),
        FieldDescriptor::json("updateFields", "Update Fields")
            .required()
            .show_for(RESOURCE, &["update"]),
        FieldDescriptor::string("typeFilter", "Type Filter").show_for(RESOURCE, &["list"]),
    ];
    fields.extend(pagination_fields(RESOURCE, "list"));

    ResourceDefinition::new(RESOURCE)
        .operation("list", "List", "List records in a zone", list)
        .operation("get", "Get", "Get a record", get)
        .operation("create", "Create", "Create a record", create)
        .operation("update", "Update", "Update a record", update)
        .operation("delete", "Delete", "Delete a record", delete)
        .fields(fields)
}

/// Zone apex marker accepted for `name`; the API spells the apex as an empty name.
const APEX: &str = "@";

async fn records_path(ctx: &dyn ExecutionContext, item_index: usize) -> ds_error::Result<String> {
    let zone = segment_param(ctx, "zone", item_index)?;
    let account = account_id(ctx, item_index).await?;
    Ok(format!("/{account}/zones/{zone}/records"))
}

/// `name` with `@` mapped to the apex. `None` when no name was given.
fn record_name(ctx: &dyn ExecutionContext, item_index: usize) -> Option<String> {
    ctx.optional_string_param("name", item_index)
        .map(|name| if name == APEX { String::new() } else { name })
}

fn list<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let path = records_path(ctx, item_index).await?;
        let mut options = PaginationOptions::new()
            .with_optional_query("type", ctx.optional_string_param("typeFilter", item_index));
        if let Some(name) = record_name(ctx, item_index) {
            options = options.with_query("name", name);
        }
        handle_paginated_list(ctx, item_index, &path, options).await
    })
}

fn get<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let id = segment_param(ctx, "recordId", item_index)?;
        let path = records_path(ctx, item_index).await?;
        fetch(ctx, item_index, HttpMethod::Get, &format!("{path}/{id}"), None).await
    })
}

fn create<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let required = [("type", "type"), ("content", "content")];
        let mut body = body_with(ctx, item_index, "additionalFields", &required)?;

        let record_type = body["type"].as_str().unwrap_or_default().to_ascii_uppercase();
        if !RECORD_TYPES.contains(&record_type.as_str()) {
            return Err(AdapterError::InvalidParameter {
                name: "type".to_string(),
                item_index,
                reason: format!("unsupported record type {record_type}"),
            });
        }
        body.insert("type".to_string(), Value::String(record_type));
        body.insert(
            "name".to_string(),
            Value::String(record_name(ctx, item_index).unwrap_or_default()),
        );
        if ctx.parameter("ttl", item_index).is_some() {
            let ttl = ctx.u64_param("ttl", item_index, 3600)?;
            body.insert("ttl".to_string(), Value::from(ttl));
        }

        let path = records_path(ctx, item_index).await?;
        fetch(ctx, item_index, HttpMethod::Post, &path, Some(Value::Object(body))).await
    })
}

fn update<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let id = segment_param(ctx, "recordId", item_index)?;
        let body = update_body(ctx, item_index)?;
        let path = format!("{}/{id}", records_path(ctx, item_index).await?);
        fetch(ctx, item_index, HttpMethod::Patch, &path, Some(Value::Object(body))).await
    })
}

fn delete<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let id = segment_param(ctx, "recordId", item_index)?;
        let path = records_path(ctx, item_index).await?;
        fetch(ctx, item_index, HttpMethod::Delete, &format!("{path}/{id}"), None).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::{context, mock};
    use ds_engine::OutputRecord;
    use serde_json::json;

    #[tokio::test]
    async fn create_builds_record_body() {
        let http = mock(|request| Ok(json!({ "data": request.body.clone().unwrap_or_default() })));
        let ctx = context(
            &http,
            json!({
                "accountId": 1010,
                "zone": "example.com",
                "name": "www",
                "type": "cname",
                "content": "example.com",
                "ttl": "600",
                "additionalFields": { "regions": ["global"] }
            }),
        );

        let records = definition().handler("create").expect("create")(&ctx, 0)
            .await
            .expect("create");

        let request = &http.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/1010/zones/example.com/records");
        assert_eq!(
            request.body,
            Some(json!({
                "name": "www",
                "type": "CNAME",
                "content": "example.com",
                "ttl": 600,
                "regions": ["global"]
            }))
        );
        assert_eq!(records[0].json["type"], "CNAME");
    }

    #[tokio::test]
    async fn create_rejects_unknown_type() {
        let http = mock(|_| Ok(json!({})));
        let ctx = context(
            &http,
            json!({ "accountId": 1, "zone": "example.com", "type": "BOGUS", "content": "x" }),
        );
        let err = definition().handler("create").expect("create")(&ctx, 0)
            .await
            .expect_err("bad type");
        assert!(matches!(err, AdapterError::InvalidParameter { ref name, .. } if name == "type"));
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn list_filters_by_name_and_type() {
        let http = mock(|_| {
            Ok(json!({ "data": [{ "id": 9, "type": "MX" }], "pagination": { "total_pages": 1 } }))
        });
        let ctx = context(
            &http,
            json!({
                "accountId": 1,
                "zone": "example.com",
                "name": "",
                "typeFilter": "MX",
                "returnAll": true
            }),
        );
        let records = definition().handler("list").expect("list")(&ctx, 0)
            .await
            .expect("list");
        assert_eq!(records.len(), 1);
        let query = &http.requests()[0].query;
        assert_eq!(query.get("type").map(String::as_str), Some("MX"));
        assert!(query.get("name").is_none());
        assert_eq!(query.get("page").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn update_patches_and_delete_succeeds() {
        let http = mock(|request| match request.method {
            HttpMethod::Patch => Ok(json!({ "data": { "id": 9, "ttl": 60 } })),
            _ => Ok(Value::Null),
        });
        let ctx = context(
            &http,
            json!({
                "accountId": 1,
                "zone": "example.com",
                "recordId": 9,
                "updateFields": { "ttl": 60 }
            }),
        );
        let definition = definition();

        let updated = definition.handler("update").expect("update")(&ctx, 0)
            .await
            .expect("update");
        assert_eq!(updated[0].json["ttl"], 60);

        let deleted = definition.handler("delete").expect("delete")(&ctx, 0)
            .await
            .expect("delete");
        assert_eq!(deleted, vec![OutputRecord::success(0)]);

        let requests = http.requests();
        assert_eq!(requests[0].path, "/1/zones/example.com/records/9");
        assert_eq!(requests[0].body, Some(json!({ "ttl": 60 })));
        assert_eq!(requests[1].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn apex_marker_filters_on_empty_name() {
        let http = mock(|_| Ok(json!({ "data": [], "pagination": { "total_pages": 1 } })));
        let ctx = context(&http, json!({ "accountId": 1, "zone": "example.com", "name": "@" }));
        definition().handler("list").expect("list")(&ctx, 0)
            .await
            .expect("list");
        assert_eq!(http.requests()[0].query.get("name").map(String::as_str), Some(""));
    }

    #[tokio::test]
    async fn record_and_zone_ids_stay_inside_their_segments() {
        let http = mock(|_| Ok(Value::Null));
        let ctx = context(
            &http,
            json!({ "accountId": 1, "zone": "example.com?x=1", "recordId": "../../domains" }),
        );
        definition().handler("delete").expect("delete")(&ctx, 0)
            .await
            .expect("delete");
        assert_eq!(
            http.requests()[0].path,
            "/1/zones/example.com%3Fx%3D1/records/..%2F..%2Fdomains"
        );
    }

    #[tokio::test]
    async fn missing_record_id_fails_before_account_lookup() {
        let http = mock(|_| Ok(Value::Null));
        let ctx = context(&http, json!({ "zone": "example.com" }));
        let err = definition().handler("get").expect("get")(&ctx, 0)
            .await
            .expect_err("missing id");
        assert!(matches!(
            err,
            AdapterError::MissingParameter { ref name, .. } if name == "recordId"
        ));
        assert_eq!(http.request_count(), 0);
    }
}
