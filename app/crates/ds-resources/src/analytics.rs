//! DNS query analytics.
//!
//! The analytics endpoint nests its rows under `data.rows` instead of `data`,
//! so it goes through the same paginated list path with a different data path.

use ds_engine::{
    handle_paginated_list, pagination_fields, ExecutionContext, FieldDescriptor, PaginationOptions,
    ResourceDefinition,
};

use crate::common::{account_field, account_id, HandlerFuture};

pub const RESOURCE: &str = "dnsAnalytics";

pub fn definition() -> ResourceDefinition {
    let mut fields = vec![
        account_field(RESOURCE),
        FieldDescriptor::string("startDate", "Start Date")
            .describe("YYYY-MM-DD")
            .show_for(RESOURCE, &["query"]),
        FieldDescriptor::string("endDate", "End Date")
            .describe("YYYY-MM-DD")
            .show_for(RESOURCE, &["query"]),
        FieldDescriptor::string("groupings", "Groupings")
            .describe("Comma separated: zone_name, date")
            .show_for(RESOURCE, &["query"]),
        FieldDescriptor::string("sort", "Sort")
            .describe("e.g. volume:desc")
            .show_for(RESOURCE, &["query"]),
    ];
    fields.extend(pagination_fields(RESOURCE, "query"));

    ResourceDefinition::new(RESOURCE)
        .operation("query", "Query", "Query DNS analytics", query)
        .fields(fields)
}

fn query<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let account = account_id(ctx, item_index).await?;
        let options = PaginationOptions::new()
            .with_data_path("data.rows")
            .with_optional_query("start_date", ctx.optional_string_param("startDate", item_index))
            .with_optional_query("end_date", ctx.optional_string_param("endDate", item_index))
            .with_optional_query("groupings", ctx.optional_string_param("groupings", item_index))
            .with_optional_query("sort", ctx.optional_string_param("sort", item_index));
        handle_paginated_list(ctx, item_index, &format!("/{account}/dns_analytics"), options).await
    })
}
