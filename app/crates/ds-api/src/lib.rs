//! DNSimple v2 REST API access.
//!
//! Everything above this crate talks to DNSimple through the [`HttpClient`]
//! trait; [`DnsimpleClient`] is the reqwest-backed implementation that injects
//! the bearer token and turns non-2xx answers into [`HttpError::Status`].

mod client;

pub use client::{DnsimpleClient, Environment, PRODUCTION_API, SANDBOX_API};

use std::collections::BTreeMap;
use std::fmt;

use ds_error::HttpError;
use serde_json::Value;

/// Query-string parameters. Ordered so requests are reproducible in logs and tests.
pub type Query = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// One authenticated request against the API.
///
/// `path` is relative to the API root (e.g. `/whoami`). Responses without a
/// body (204) come back as `Value::Null`.
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Value, HttpError>;
}
