//! reqwest-backed `HttpClient` for the DNSimple v2 API.
//!
//! Authenticates with an OAuth/API token in the `Authorization: Bearer`
//! header. Every other concern (paths, paging, payload shape) is the
//! caller's.
//!
//! Reference: https://developer.dnsimple.com/v2/

use std::time::Duration;

use ds_error::HttpError;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;

use super::{HttpClient, HttpMethod, Query};

pub const PRODUCTION_API: &str = "https://api.dnsimple.com/v2";
pub const SANDBOX_API: &str = "https://api.sandbox.dnsimple.com/v2";

const USER_AGENT: &str = concat!("dnsimple-actions/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_API,
            Self::Sandbox => SANDBOX_API,
        }
    }
}

pub struct DnsimpleClient {
    client: Client,
    api_token: String,
    base_url: String,
}

impl DnsimpleClient {
    pub fn new(api_token: &str, environment: Environment) -> Self {
        Self {
            client: Client::new(),
            api_token: api_token.to_string(),
            base_url: environment.base_url().to_string(),
        }
    }

    /// Build a client with a request timeout and an explicit API root.
    pub fn with_options(
        api_token: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_token: api_token.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn apply_auth(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("Authorization", format!("Bearer {}", self.api_token))
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// DNSimple error bodies look like `{"message": "...", "errors": {...}}`.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(String::from))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                fallback.to_string()
            } else {
                body.trim().to_string()
            }
        })
}

#[async_trait::async_trait]
impl HttpClient for DnsimpleClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Value, HttpError> {
        let url = self.url(path);
        tracing::debug!(%method, %url, ?query, "dnsimple request");

        let mut req = self.apply_auth(self.client.request(to_reqwest_method(method), &url));
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req
            .send()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| HttpError::Transport(e.to_string()))?;

        if !status.is_success() {
            let fallback = status.canonical_reason().unwrap_or("request failed");
            return Err(HttpError::Status {
                status: status.as_u16(),
                message: error_message(&text, fallback),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| HttpError::Decode(e.to_string()))
    }
}
