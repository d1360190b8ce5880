//! Host execution context.
//!
//! The workflow host hands every handler an [`ExecutionContext`]: per-item
//! parameters, the input items, the continuation policy and an authenticated
//! [`HttpClient`]. The engine is written only against this trait.

use std::sync::Arc;

use ds_api::HttpClient;
use ds_error::{AdapterError, Result};
use serde_json::{Map, Value};

/// Upper bound on pages walked by an exhaustive fetch unless the host says otherwise.
pub const DEFAULT_MAX_PAGES: u32 = 1000;

pub trait ExecutionContext: Send + Sync {
    /// Raw parameter value for one item, `None` when the host has no value.
    fn parameter(&self, name: &str, item_index: usize) -> Option<Value>;

    fn input_items(&self) -> &[Value];

    fn continue_on_fail(&self) -> bool;

    fn http(&self) -> &dyn HttpClient;

    fn max_pages(&self) -> u32 {
        DEFAULT_MAX_PAGES
    }

    fn parameter_or(&self, name: &str, item_index: usize, fallback: Value) -> Value {
        self.parameter(name, item_index)
            .filter(|v| !v.is_null())
            .unwrap_or(fallback)
    }

    /// Required, non-empty string. Numbers are accepted and rendered as text.
    fn string_param(&self, name: &str, item_index: usize) -> Result<String> {
        self.optional_string_param(name, item_index)
            .ok_or_else(|| AdapterError::MissingParameter {
                name: name.to_string(),
                item_index,
            })
    }

    fn optional_string_param(&self, name: &str, item_index: usize) -> Option<String> {
        match self.parameter(name, item_index)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn bool_param(&self, name: &str, item_index: usize, default: bool) -> Result<bool> {
        match self.parameter(name, item_index) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(b),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(invalid(name, item_index, "expected true or false")),
            },
            Some(_) => Err(invalid(name, item_index, "expected a boolean")),
        }
    }

    fn u64_param(&self, name: &str, item_index: usize, default: u64) -> Result<u64> {
        match self.parameter(name, item_index) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Number(n)) => n
                .as_u64()
                .ok_or_else(|| invalid(name, item_index, "expected a non-negative integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(name, item_index, "expected a non-negative integer")),
            Some(_) => Err(invalid(name, item_index, "expected a number")),
        }
    }

    /// Object-valued parameter (e.g. a JSON body supplied by the user).
    fn object_param(&self, name: &str, item_index: usize) -> Result<Map<String, Value>> {
        match self.parameter(name, item_index) {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(map)) => Ok(map),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(Map::new()),
            Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
                Ok(Value::Object(map)) => Ok(map),
                _ => Err(invalid(name, item_index, "expected a JSON object")),
            },
            Some(_) => Err(invalid(name, item_index, "expected a JSON object")),
        }
    }
}

fn invalid(name: &str, item_index: usize, reason: &str) -> AdapterError {
    AdapterError::InvalidParameter {
        name: name.to_string(),
        item_index,
        reason: reason.to_string(),
    }
}

/// In-memory context: a fixed list of items with shared and per-item parameters.
///
/// Per-item parameters shadow shared ones.
pub struct StaticContext {
    items: Vec<Value>,
    item_parameters: Vec<Map<String, Value>>,
    shared: Map<String, Value>,
    continue_on_fail: bool,
    max_pages: u32,
    http: Arc<dyn HttpClient>,
}

impl StaticContext {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            items: Vec::new(),
            item_parameters: Vec::new(),
            shared: Map::new(),
            continue_on_fail: false,
            max_pages: DEFAULT_MAX_PAGES,
            http,
        }
    }

    /// Append an input item. Non-object `parameters` are ignored.
    pub fn with_item(mut self, json: Value, parameters: Value) -> Self {
        self.items.push(json);
        self.item_parameters.push(match parameters {
            Value::Object(map) => map,
            _ => Map::new(),
        });
        self
    }

    pub fn with_parameter(mut self, name: &str, value: Value) -> Self {
        self.shared.insert(name.to_string(), value);
        self
    }

    pub fn with_continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

impl ExecutionContext for StaticContext {
    fn parameter(&self, name: &str, item_index: usize) -> Option<Value> {
        self.item_parameters
            .get(item_index)
            .and_then(|params| params.get(name))
            .or_else(|| self.shared.get(name))
            .cloned()
    }

    fn input_items(&self) -> &[Value] {
        &self.items
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }

    fn http(&self) -> &dyn HttpClient {
        self.http.as_ref()
    }

    fn max_pages(&self) -> u32 {
        self.max_pages
    }
}
