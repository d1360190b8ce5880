//! Registrant contacts.

use ds_api::HttpMethod;
use ds_engine::{
    fetch_all_pages, handle_paginated_list, pagination_fields, ExecutionContext, FieldDescriptor,
    PaginationOptions, ResourceDefinition, SelectOption,
};
use ds_error::Result;
use futures::future::BoxFuture;
use serde_json::Value;

use crate::common::{
    account_field, account_id, body_with, fetch, segment_param, update_body, HandlerFuture,
};

pub const RESOURCE: &str = "contact";

/// (parameter, API key) pairs a new contact must carry.
const REQUIRED_FIELDS: &[(&str, &str)] = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("address1", "address1"),
    ("city", "city"),
    ("stateProvince", "state_province"),
    ("postalCode", "postal_code"),
    ("country", "country"),
    ("email", "email"),
    ("phone", "phone"),
];

pub fn definition() -> ResourceDefinition {
    let mut fields = vec![
        account_field(RESOURCE),
        FieldDescriptor::string("contactId", "Contact ID")
            .required()
            .load_options("getContacts")
            .show_for(RESOURCE, &["get", "update", "delete"]),
        FieldDescriptor::json("additionalFields", "Additional Fields")
            .describe("label, organization_name, job_title, address2, fax")
            .show_for(RESOURCE, &["create"]),
        FieldDescriptor::json("updateFields", "Update Fields")
            .required()
            .show_for(RESOURCE, &["update"]),
    ];
    fields.extend(REQUIRED_FIELDS.iter().map(|(param, key)| {
        FieldDescriptor::string(param, &display_name(key))
            .required()
            .show_for(RESOURCE, &["create"])
    }));
    fields.extend(pagination_fields(RESOURCE, "list"));

    ResourceDefinition::new(RESOURCE)
        .operation("list", "List", "List contacts", list)
        .operation("get", "Get", "Get a contact", get)
        .operation("create", "Create", "Create a contact", create)
        .operation("update", "Update", "Update a contact", update)
        .operation("delete", "Delete", "Delete a contact", delete)
        .fields(fields)
        .load_options("getContacts", get_contacts)
}

fn display_name(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn contact_path(ctx: &dyn ExecutionContext, item_index: usize) -> Result<String> {
    let id = segment_param(ctx, "contactId", item_index)?;
    let account = account_id(ctx, item_index).await?;
    Ok(format!("/{account}/contacts/{id}"))
}

fn list<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let account = account_id(ctx, item_index).await?;
        let path = format!("/{account}/contacts");
        handle_paginated_list(ctx, item_index, &path, PaginationOptions::new()).await
    })
}

fn get<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let path = contact_path(ctx, item_index).await?;
        fetch(ctx, item_index, HttpMethod::Get, &path, None).await
    })
}

fn create<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let body = body_with(ctx, item_index, "additionalFields", REQUIRED_FIELDS)?;
        let account = account_id(ctx, item_index).await?;
        let path = format!("/{account}/contacts");
        fetch(ctx, item_index, HttpMethod::Post, &path, Some(Value::Object(body))).await
    })
}

fn update<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let body = update_body(ctx, item_index)?;
        let path = contact_path(ctx, item_index).await?;
        fetch(ctx, item_index, HttpMethod::Patch, &path, Some(Value::Object(body))).await
    })
}

fn delete<'a>(ctx: &'a dyn ExecutionContext, item_index: usize) -> HandlerFuture<'a> {
    Box::pin(async move {
        let path = contact_path(ctx, item_index).await?;
        fetch(ctx, item_index, HttpMethod::Delete, &path, None).await
    })
}

fn get_contacts<'a>(
    ctx: &'a dyn ExecutionContext,
    _filter: Option<&'a str>,
) -> BoxFuture<'a, Result<Vec<SelectOption>>> {
    Box::pin(async move {
        let account = account_id(ctx, 0).await?;
        let mut options = PaginationOptions::new().with_max_pages(ctx.max_pages());
        let path = format!("/{account}/contacts");
        let contacts = fetch_all_pages(ctx.http(), &path, &mut options).await?;
        Ok(contacts
            .iter()
            .filter_map(|c| {
                let id = c["id"].as_u64()?;
                let label = match (c["first_name"].as_str(), c["last_name"].as_str()) {
                    (Some(first), Some(last)) => format!("{first} {last}"),
                    _ => c["email"].as_str().unwrap_or("contact").to_string(),
                };
                Some(SelectOption::new(label, id))
            })
            .collect())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::{context, mock};
    use ds_engine::AuxiliaryKind;
    use ds_error::AdapterError;
    use serde_json::json;

    fn new_contact() -> Value {
        json!({
            "accountId": 1010,
            "firstName": "Ada",
            "lastName": "Lovelace",
            "address1": "1 Analytical Way",
            "city": "London",
            "stateProvince": "London",
            "postalCode": "N1",
            "country": "GB",
            "email": "ada@example.com",
            "phone": "+44.2000000000",
            "additionalFields": { "organization_name": "Engines Ltd" }
        })
    }

    #[test]
    fn display_names_from_api_keys() {
        assert_eq!(display_name("state_province"), "State Province");
        assert_eq!(display_name("email"), "Email");
    }

    #[tokio::test]
    async fn create_maps_parameters_to_api_keys() {
        let http = mock(|_| Ok(json!({ "data": { "id": 1 } })));
        let ctx = context(&http, new_contact());

        definition().handler("create").expect("create")(&ctx, 0)
            .await
            .expect("create");

        let body = http.requests()[0].body.clone().expect("body");
        assert_eq!(body["first_name"], "Ada");
        assert_eq!(body["state_province"], "London");
        assert_eq!(body["organization_name"], "Engines Ltd");
        assert!(body.get("firstName").is_none());
    }

    #[tokio::test]
    async fn create_requires_every_contact_field() {
        let http = mock(|_| Ok(json!({})));
        let mut params = new_contact();
        params.as_object_mut().expect("object").remove("phone");
        let ctx = context(&http, params);

        let err = definition().handler("create").expect("create")(&ctx, 0)
            .await
            .expect_err("missing phone");
        assert!(matches!(err, AdapterError::MissingParameter { ref name, .. } if name == "phone"));
    }

    #[tokio::test]
    async fn get_contacts_labels_by_name_or_email() {
        let http = mock(|_| {
            Ok(json!({
                "data": [
                    { "id": 1, "first_name": "Ada", "last_name": "Lovelace" },
                    { "id": 2, "email": "ops@example.com" }
                ],
                "pagination": { "total_pages": 1 }
            }))
        });
        let ctx = context(&http, json!({}));
        let load = *definition()
            .auxiliary_methods(AuxiliaryKind::LoadOptions)
            .and_then(|m| m.get("getContacts"))
            .expect("getContacts");

        let options = load(&ctx, None).await.expect("load");
        assert_eq!(
            options,
            vec![
                SelectOption::new("Ada Lovelace", 1u64),
                SelectOption::new("ops@example.com", 2u64)
            ]
        );
    }

    #[tokio::test]
    async fn contact_id_is_encoded_and_update_checked_first() {
        let http = mock(|_| Ok(Value::Null));
        let ctx = context(&http, json!({ "contactId": "1#frag" }));
        definition().handler("delete").expect("delete")(&ctx, 0)
            .await
            .expect("delete");
        assert_eq!(http.requests()[1].path, "/1010/contacts/1%23frag");

        let http = mock(|_| Ok(Value::Null));
        let ctx = context(&http, json!({ "contactId": 1, "updateFields": {} }));
        let err = definition().handler("update").expect("update")(&ctx, 0)
            .await
            .expect_err("empty update");
        assert!(matches!(err, AdapterError::InvalidParameter { .. }));
        assert_eq!(http.request_count(), 0);
    }
}
