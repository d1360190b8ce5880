//! Account webhooks.

use ds_api::HttpMethod;
use ds_engine::{ExecutionContext, FieldDescriptor, ResourceDefinition};
use ds_error::AdapterError;
use serde_json::json;

use crate::common::{account_field, account_id, fetch, segment_param, HandlerFuture};

pub const RESOURCE: &str = "webhook";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition::new(RESOURCE)
        .operation("list", "List", "List webhooks", list)
        .operation("create", "Create", "Create a webhook", create)
        .operation("delete", "Delete", "Delete a webhook", delete)
        .fields([
            account_field(RESOURCE),
            FieldDescriptor::string("url", "URL")
                .required()
                .describe("HTTPS endpoint that receives event notifications")
                .show_for(RESOURCE, &["create"]),
            FieldDescriptor::string("webhookId", "Webhook ID")
                .required()
                .show_for(RESOURCE, &["delete"]),
        ])
}

fn list<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let account = account_id(ctx, item_index).await?;
        let path = format!("/{account}/webhooks");
        fetch(ctx, item_index, HttpMethod::Get, &path, None).await
    })
}

fn create<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let url = ctx.string_param("url", item_index)?;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(AdapterError::InvalidParameter {
                name: "url".to_string(),
                item_index,
                reason: format!("\"{url}\" is not an http(s) URL"),
            });
        }
        let account = account_id(ctx, item_index).await?;
        let path = format!("/{account}/webhooks");
        fetch(ctx, item_index, HttpMethod::Post, &path, Some(json!({ "url": url }))).await
    })
}

fn delete<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let id = segment_param(ctx, "webhookId", item_index)?;
        let account = account_id(ctx, item_index).await?;
        let path = format!("/{account}/webhooks/{id}");
        fetch(ctx, item_index, HttpMethod::Delete, &path, None).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::{context, mock};
    use ds_engine::OutputRecord;
    use serde_json::Value;

    #[tokio::test]
    async fn list_returns_one_record_per_webhook() {
        let http = mock(|_| {
            Ok(json!({ "data": [
                { "id": 1, "url": "https://hooks.example.com/a" },
                { "id": 2, "url": "https://hooks.example.com/b" }
            ] }))
        });
        let ctx = context(&http, json!({ "accountId": 1010 }));

        let records = definition().handler("list").expect("list")(&ctx, 0)
            .await
            .expect("list");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].json["id"], 2);
    }

    #[tokio::test]
    async fn create_rejects_non_http_url_before_calling_api() {
        let http = mock(|_| Ok(json!({})));
        let ctx = context(&http, json!({ "accountId": 1010, "url": "ftp://example.com" }));

        let err = definition().handler("create").expect("create")(&ctx, 0)
            .await
            .expect_err("bad url");
        assert!(matches!(err, AdapterError::InvalidParameter { ref name, .. } if name == "url"));
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn delete_returns_success_marker() {
        let http = mock(|_| Ok(Value::Null));
        let ctx = context(&http, json!({ "accountId": 1010, "webhookId": 5 }));

        let records = definition().handler("delete").expect("delete")(&ctx, 0)
            .await
            .expect("delete");
        assert_eq!(records, vec![OutputRecord::success(0)]);
        assert_eq!(http.requests()[0].path, "/1010/webhooks/5");
        assert_eq!(http.requests()[0].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn delete_keeps_webhook_id_inside_its_segment() {
        use ds_api::DnsimpleClient;
        use std::time::Duration;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/1010/webhooks/..%2Fdomains%2Fexample.com"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/1010/domains/example.com"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let client = DnsimpleClient::with_options("token", &server.uri(), Duration::from_secs(5))
            .expect("client");
        let ctx = ds_engine::StaticContext::new(std::sync::Arc::new(client)).with_item(
            json!({}),
            json!({ "accountId": 1010, "webhookId": "../domains/example.com" }),
        );

        let records = definition().handler("delete").expect("delete")(&ctx, 0)
            .await
            .expect("delete");
        assert_eq!(records, vec![OutputRecord::success(0)]);
    }
}
