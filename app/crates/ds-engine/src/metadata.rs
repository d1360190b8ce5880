//! Declarative metadata each resource publishes about itself.
//!
//! The engine only aggregates these; rendering them is the host's business.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    pub resource: String,
    /// Key the dispatcher looks the handler up by.
    pub value: String,
    pub name: String,
    pub action: String,
}

impl OperationDescriptor {
    pub fn new(resource: &str, value: &str, name: &str, action: &str) -> Self {
        Self {
            resource: resource.to_string(),
            value: value.to_string(),
            name: name.to_string(),
            action: action.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Options,
    Json,
    ResourceLocator,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCondition {
    pub resource: Vec<String>,
    pub operation: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    pub name: String,
    pub value: Value,
}

impl SelectOption {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub display_name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub show_for: DisplayCondition,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_options_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_list_method: Option<String>,
}

impl FieldDescriptor {
    fn base(name: &str, display_name: &str, kind: FieldKind, default: Value) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            kind,
            required: false,
            default,
            description: None,
            show_for: DisplayCondition::default(),
            options: Vec::new(),
            load_options_method: None,
            search_list_method: None,
        }
    }

    pub fn string(name: &str, display_name: &str) -> Self {
        Self::base(name, display_name, FieldKind::String, json!(""))
    }

    pub fn number(name: &str, display_name: &str, default: u64) -> Self {
        Self::base(name, display_name, FieldKind::Number, json!(default))
    }

    pub fn boolean(name: &str, display_name: &str, default: bool) -> Self {
        Self::base(name, display_name, FieldKind::Boolean, json!(default))
    }

    pub fn json(name: &str, display_name: &str) -> Self {
        Self::base(name, display_name, FieldKind::Json, json!({}))
    }

    pub fn options(name: &str, display_name: &str, options: Vec<SelectOption>) -> Self {
        let default = options.first().map(|o| o.value.clone()).unwrap_or(Value::Null);
        Self {
            options,
            ..Self::base(name, display_name, FieldKind::Options, default)
        }
    }

    /// Picker backed by a list-search auxiliary method.
    pub fn locator(name: &str, display_name: &str, search_list_method: &str) -> Self {
        Self {
            search_list_method: Some(search_list_method.to_string()),
            ..Self::base(name, display_name, FieldKind::ResourceLocator, json!(""))
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn load_options(mut self, method: &str) -> Self {
        self.load_options_method = Some(method.to_string());
        self
    }

    pub fn show_for(mut self, resource: &str, operations: &[&str]) -> Self {
        self.show_for = DisplayCondition {
            resource: vec![resource.to_string()],
            operation: operations.iter().map(|op| op.to_string()).collect(),
        };
        self
    }
}

/// The `returnAll` / `limit` pair every paginated list operation exposes.
pub fn pagination_fields(resource: &str, operation: &str) -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::boolean("returnAll", "Return All", false)
            .describe("Whether to return all results or only up to a given limit")
            .show_for(resource, &[operation]),
        FieldDescriptor::number("limit", "Limit", crate::pagination::DEFAULT_LIMIT)
            .describe("Max number of results to return")
            .show_for(resource, &[operation]),
    ]
}

/// Which kind of auxiliary method a resource publishes for the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AuxiliaryKind {
    ListSearch,
    LoadOptions,
}
