//! Accounts reachable with the configured token.

use ds_api::HttpMethod;
use ds_engine::{ExecutionContext, ResourceDefinition};

use crate::common::{fetch, HandlerFuture};

pub const RESOURCE: &str = "account";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition::new(RESOURCE)
        .operation("whoami", "Who Am I", "Get the identity behind the token", whoami)
        .operation("list", "List", "List accounts the token can access", list)
}

fn whoami<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move { fetch(ctx, item_index, HttpMethod::Get, "/whoami", None).await })
}

fn list<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move { fetch(ctx, item_index, HttpMethod::Get, "/accounts", None).await })
}
