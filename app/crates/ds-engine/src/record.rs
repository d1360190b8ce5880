use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One output entry handed back to the host.
///
/// `json` is always an object: API entities pass through unchanged, anything
/// else (analytics rows are arrays) is wrapped as `{ "value": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub json: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired_item: Option<usize>,
}

impl OutputRecord {
    pub fn new(json: Value) -> Self {
        let json = match json {
            Value::Object(_) => json,
            other => json!({ "value": other }),
        };
        Self {
            json,
            paired_item: None,
        }
    }

    pub fn for_item(json: Value, item_index: usize) -> Self {
        Self {
            paired_item: Some(item_index),
            ..Self::new(json)
        }
    }

    /// Marker for operations whose API call returns no body.
    pub fn success(item_index: usize) -> Self {
        Self::for_item(json!({ "success": true }), item_index)
    }

    pub fn error(message: impl Into<String>, item_index: usize) -> Self {
        Self::for_item(json!({ "error": message.into() }), item_index)
    }

    pub fn is_error(&self) -> bool {
        self.json.get("error").is_some() && self.json.as_object().map_or(false, |m| m.len() == 1)
    }
}

/// Map raw API entities to records paired with `item_index`.
pub fn to_records(items: Vec<Value>, item_index: usize) -> Vec<OutputRecord> {
    items
        .into_iter()
        .map(|item| OutputRecord::for_item(item, item_index))
        .collect()
}
