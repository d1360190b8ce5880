//! Domain registration through the DNSimple registrar.

use ds_api::HttpMethod;
use ds_engine::{ExecutionContext, FieldDescriptor, ResourceDefinition};
use ds_error::Result;
use serde_json::{json, Value};

use crate::common::{account_field, account_id, fetch, segment_param, HandlerFuture};

pub const RESOURCE: &str = "registrar";

pub fn definition() -> ResourceDefinition {
    let all = [
        "checkAvailability",
        "getPrices",
        "register",
        "renew",
        "enableAutoRenewal",
        "disableAutoRenewal",
    ];
    ResourceDefinition::new(RESOURCE)
        .operation(
            "checkAvailability",
            "Check Availability",
            "Check whether a domain can be registered",
            check_availability,
        )
        .operation(
            "getPrices",
            "Get Prices",
            "Get registration, renewal and transfer prices",
            get_prices,
        )
        .operation("register", "Register", "Register a domain", register)
        .operation("renew", "Renew", "Renew a domain", renew)
        .operation(
            "enableAutoRenewal",
            "Enable Auto Renewal",
            "Turn on auto renewal for a domain",
            enable_auto_renewal,
        )
        .operation(
            "disableAutoRenewal",
            "Disable Auto Renewal",
            "Turn off auto renewal for a domain",
            disable_auto_renewal,
        )
        .fields([
            account_field(RESOURCE),
            FieldDescriptor::string("domainName", "Domain Name")
                .required()
                .show_for(RESOURCE, &all),
            FieldDescriptor::string("registrantId", "Registrant ID")
                .required()
                .describe("Contact that will own the domain")
                .load_options("getContacts")
                .show_for(RESOURCE, &["register"]),
            FieldDescriptor::boolean("whoisPrivacy", "WHOIS Privacy", false)
                .show_for(RESOURCE, &["register"]),
            FieldDescriptor::boolean("autoRenew", "Auto Renew", false)
                .show_for(RESOURCE, &["register"]),
            FieldDescriptor::number("period", "Period", 1)
                .describe("Years to renew for")
                .show_for(RESOURCE, &["renew"]),
        ])
}

async fn domain_path(
    ctx: &dyn ExecutionContext,
    item_index: usize,
    suffix: &str,
) -> Result<String> {
    let domain = segment_param(ctx, "domainName", item_index)?;
    let account = account_id(ctx, item_index).await?;
    Ok(format!("/{account}/registrar/domains/{domain}/{suffix}"))
}

async fn send(
    ctx: &dyn ExecutionContext,
    item_index: usize,
    method: HttpMethod,
    suffix: &str,
    body: Option<Value>,
) -> Result<Vec<ds_engine::OutputRecord>> {
    let path = domain_path(ctx, item_index, suffix).await?;
    fetch(ctx, item_index, method, &path, body).await
}

fn check_availability<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(send(ctx, item_index, HttpMethod::Get, "check", None))
}

fn get_prices<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(send(ctx, item_index, HttpMethod::Get, "prices", None))
}

fn register<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let registrant = ctx.string_param("registrantId", item_index)?;
        let registrant_id = registrant
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or(Value::String(registrant));
        let body = json!({
            "registrant_id": registrant_id,
            "whois_privacy": ctx.bool_param("whoisPrivacy", item_index, false)?,
            "auto_renew": ctx.bool_param("autoRenew", item_index, false)?,
        });
        send(ctx, item_index, HttpMethod::Post, "registrations", Some(body)).await
    })
}

fn renew<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let period = ctx.u64_param("period", item_index, 1)?;
        send(ctx, item_index, HttpMethod::Post, "renewals", Some(json!({ "period": period }))).await
    })
}

fn enable_auto_renewal<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(send(ctx, item_index, HttpMethod::Put, "auto_renewal", None))
}

fn disable_auto_renewal<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(send(ctx, item_index, HttpMethod::Delete, "auto_renewal", None))
}
