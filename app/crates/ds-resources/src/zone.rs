//! Hosted DNS zones.

use ds_api::HttpMethod;
use ds_engine::{
    fetch_all_pages, handle_paginated_list, pagination_fields, ExecutionContext, FieldDescriptor,
    PaginationOptions, ResourceDefinition, SelectOption,
};
use ds_error::Result;
use futures::future::BoxFuture;

use crate::common::{account_field, account_id, fetch, segment_param, HandlerFuture};

pub const RESOURCE: &str = "zone";

pub fn definition() -> ResourceDefinition {
    let mut fields = vec![
        account_field(RESOURCE),
        FieldDescriptor::string("zone", "Zone")
            .required()
            .describe("Zone name, e.g. example.com")
            .load_options("getZones")
            .show_for(RESOURCE, &["get", "getFile", "checkDistribution"]),
        FieldDescriptor::string("nameLike", "Name Like")
            .describe("Only return zones whose name contains this text")
            .show_for(RESOURCE, &["list"]),
    ];
    fields.extend(pagination_fields(RESOURCE, "list"));

    ResourceDefinition::new(RESOURCE)
        .operation("list", "List", "List zones", list)
        .operation("get", "Get", "Get a zone", get)
        .operation("getFile", "Get File", "Download the zone file", get_file)
        .operation(
            "checkDistribution",
            "Check Distribution",
            "Check whether the zone is fully distributed to the name servers",
            check_distribution,
        )
        .fields(fields)
        .load_options("getZones", get_zones)
}

fn list<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let account = account_id(ctx, item_index).await?;
        let options = PaginationOptions::new()
            .with_optional_query("name_like", ctx.optional_string_param("nameLike", item_index));
        handle_paginated_list(ctx, item_index, &format!("/{account}/zones"), options).await
    })
}

fn zone_path_op<'a>(
    ctx: &'a dyn ExecutionContext,
    item_index: usize,
    suffix: &'static str,
) -> HandlerFuture<'a> {
    Box::pin(async move {
        let zone = segment_param(ctx, "zone", item_index)?;
        let account = account_id(ctx, item_index).await?;
        let path = format!("/{account}/zones/{zone}{suffix}");
        fetch(ctx, item_index, HttpMethod::Get, &path, None).await
    })
}

fn get<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    zone_path_op(ctx, item_index, "")
}

fn get_file<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    zone_path_op(ctx, item_index, "/file")
}

fn check_distribution<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    zone_path_op(ctx, item_index, "/distribution")
}

fn get_zones<'a>(
    ctx: &'a dyn ExecutionContext,
    _filter: Option<&'a str>,
) -> BoxFuture<'a, Result<Vec<SelectOption>>> {
    Box::pin(async move {
        let account = account_id(ctx, 0).await?;
        let mut options = PaginationOptions::new().with_max_pages(ctx.max_pages());
        let zones = fetch_all_pages(ctx.http(), &format!("/{account}/zones"), &mut options).await?;
        Ok(zones
            .iter()
            .filter_map(|z| {
                let name = z["name"].as_str()?;
                Some(SelectOption::new(name, name))
            })
            .collect())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::{context, mock};
    use ds_engine::AuxiliaryKind;
    use serde_json::json;

    #[tokio::test]
    async fn zone_sub_resources_use_distinct_paths() {
        let http = mock(|request| {
            Ok(match request.path.as_str() {
                "/1010/zones/example.com/file" => {
                    json!({ "data": { "zone": "$ORIGIN example.com." } })
                }
                "/1010/zones/example.com/distribution" => {
                    json!({ "data": { "distributed": true } })
                }
                _ => json!({ "data": { "id": 1, "name": "example.com" } }),
            })
        });
        let ctx = context(&http, json!({ "accountId": 1010, "zone": "example.com" }));
        let definition = definition();

        let zone = definition.handler("get").expect("get")(&ctx, 0).await.expect("get");
        assert_eq!(zone[0].json["name"], "example.com");
        let file = definition.handler("getFile").expect("getFile")(&ctx, 0)
            .await
            .expect("file");
        assert_eq!(file[0].json["zone"], "$ORIGIN example.com.");
        let distribution = definition.handler("checkDistribution").expect("distribution")(&ctx, 0)
            .await
            .expect("distribution");
        assert_eq!(distribution[0].json["distributed"], true);
    }

    #[tokio::test]
    async fn get_requires_zone() {
        let http = mock(|_| Ok(json!({})));
        let ctx = context(&http, json!({ "accountId": 1010 }));
        let err = definition().handler("get").expect("get")(&ctx, 0)
            .await
            .expect_err("missing zone");
        assert!(matches!(err, ds_error::AdapterError::MissingParameter { .. }));
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn get_zones_walks_all_pages() {
        let http = mock(|request| {
            Ok(match request.query.get("page").map(String::as_str) {
                Some("1") => {
                    json!({ "data": [{ "name": "a.test" }], "pagination": { "total_pages": 2 } })
                }
                _ => json!({ "data": [{ "name": "b.test" }], "pagination": { "total_pages": 2 } }),
            })
        });
        let ctx = context(&http, json!({ "accountId": 1010 }));
        let load = *definition()
            .auxiliary_methods(AuxiliaryKind::LoadOptions)
            .and_then(|m| m.get("getZones"))
            .expect("getZones");

        let options = load(&ctx, None).await.expect("load");

        assert_eq!(
            options,
            vec![SelectOption::new("a.test", "a.test"), SelectOption::new("b.test", "b.test")]
        );
    }

    #[tokio::test]
    async fn zone_name_is_a_single_segment() {
        let http = mock(|_| Ok(json!({ "data": {} })));
        let ctx = context(&http, json!({ "accountId": 1010, "zone": "../../accounts" }));
        definition().handler("getFile").expect("getFile")(&ctx, 0)
            .await
            .expect("file");
        assert_eq!(http.requests()[0].path, "/1010/zones/..%2F..%2Faccounts/file");
    }
}
