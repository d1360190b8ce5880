//! Job files: the batch of items one `run` executes.
//!
//! ```json
//! {
//!   "continueOnFail": true,
//!   "parameters": { "resource": "domain", "operation": "get" },
//!   "items": [
//!     { "parameters": { "domain": "example.com" } },
//!     { "json": { "source": "import" }, "parameters": { "domain": "example.org" } }
//!   ]
//! }
//! ```
//!
//! Item parameters shadow the shared `parameters`.

use std::path::Path;
use std::sync::Arc;

use ds_api::HttpClient;
use ds_engine::StaticContext;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    pub continue_on_fail: bool,
    pub parameters: Map<String, Value>,
    pub items: Vec<JobItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobItem {
    pub json: Value,
    pub parameters: Map<String, Value>,
}

impl Default for JobItem {
    fn default() -> Self {
        Self {
            json: Value::Object(Map::new()),
            parameters: Map::new(),
        }
    }
}

impl Job {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| AppError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_context(self, http: Arc<dyn HttpClient>, max_pages: u32) -> StaticContext {
        let mut ctx = StaticContext::new(http)
            .with_continue_on_fail(self.continue_on_fail)
            .with_max_pages(max_pages);
        for (name, value) in self.parameters {
            ctx = ctx.with_parameter(&name, value);
        }
        for item in self.items {
            ctx = ctx.with_item(item.json, Value::Object(item.parameters));
        }
        ctx
    }
}
