use ds_api::{HttpMethod, Query};
use ds_engine::{ExecutionContext, FieldDescriptor, OutputRecord};
use ds_error::{AdapterError, Result};
use futures::future::BoxFuture;
use serde_json::{Map, Value};

pub(crate) type HandlerFuture<'a> = BoxFuture<'a, Result<Vec<OutputRecord>>>;

/// Required parameter rendered as a single URL path segment.
///
/// The value is percent-encoded so `/`, `?` and `#` stay inside the segment;
/// `.` and `..` are refused since URL parsing would collapse them.
pub(crate) fn segment_param(
    ctx: &dyn ExecutionContext,
    name: &str,
    item_index: usize,
) -> Result<String> {
    path_segment(&ctx.string_param(name, item_index)?, name, item_index)
}

pub(crate) fn path_segment(value: &str, name: &str, item_index: usize) -> Result<String> {
    if value == "." || value == ".." {
        return Err(AdapterError::InvalidParameter {
            name: name.to_string(),
            item_index,
            reason: format!("\"{value}\" is not a valid path segment"),
        });
    }
    Ok(urlencoding::encode(value).into_owned())
}

/// Account the request runs under: the `accountId` parameter, else the
/// account behind the token as reported by `/whoami`.
pub(crate) async fn account_id(ctx: &dyn ExecutionContext, item_index: usize) -> Result<String> {
    if let Some(id) = ctx.optional_string_param("accountId", item_index) {
        return path_segment(&id, "accountId", item_index);
    }
    let whoami = ctx
        .http()
        .request(HttpMethod::Get, "/whoami", &Query::new(), None)
        .await?;
    whoami["data"]["account"]["id"]
        .as_u64()
        .map(|id| id.to_string())
        .ok_or(AdapterError::AccountUnresolved)
}

pub(crate) async fn call(
    ctx: &dyn ExecutionContext,
    method: HttpMethod,
    path: &str,
    body: Option<Value>,
) -> Result<Value> {
    let response = ctx
        .http()
        .request(method, path, &Query::new(), body.as_ref())
        .await?;
    Ok(response)
}

/// Unwrap the `data` envelope: one record per array element, one record for
/// an object, a success marker when the API returned no body.
pub(crate) fn data_records(response: Value, item_index: usize) -> Vec<OutputRecord> {
    match response {
        Value::Null => vec![OutputRecord::success(item_index)],
        Value::Object(mut envelope) => match envelope.remove("data") {
            Some(Value::Array(items)) => ds_engine::to_records(items, item_index),
            Some(Value::Null) | None => vec![OutputRecord::success(item_index)],
            Some(data) => vec![OutputRecord::for_item(data, item_index)],
        },
        other => vec![OutputRecord::for_item(other, item_index)],
    }
}

pub(crate) async fn fetch(
    ctx: &dyn ExecutionContext,
    item_index: usize,
    method: HttpMethod,
    path: &str,
    body: Option<Value>,
) -> Result<Vec<OutputRecord>> {
    let response = call(ctx, method, path, body).await?;
    Ok(data_records(response, item_index))
}

/// Shown on every operation of an account-scoped resource.
pub(crate) fn account_field(resource: &str) -> FieldDescriptor {
    FieldDescriptor::string("accountId", "Account ID")
        .describe("Defaults to the account behind the API token")
        .show_for(resource, &[])
}

/// Start from the optional `additionalFields` object and layer required keys on top.
pub(crate) fn body_with(
    ctx: &dyn ExecutionContext,
    item_index: usize,
    extra_param: &str,
    required: &[(&str, &str)],
) -> Result<Map<String, Value>> {
    let mut body = ctx.object_param(extra_param, item_index)?;
    for (param, key) in required {
        body.insert(key.to_string(), Value::String(ctx.string_param(param, item_index)?));
    }
    Ok(body)
}

/// Fields for an update: the `updateFields` object, which must not be empty.
pub(crate) fn update_body(
    ctx: &dyn ExecutionContext,
    item_index: usize,
) -> Result<Map<String, Value>> {
    let body = ctx.object_param("updateFields", item_index)?;
    if body.is_empty() {
        return Err(AdapterError::InvalidParameter {
            name: "updateFields".to_string(),
            item_index,
            reason: "at least one field must be set".to_string(),
        });
    }
    Ok(body)
}
