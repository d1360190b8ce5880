//! Connection settings: an optional JSON file, then `DNSIMPLE_*` environment
//! overrides on top.

use std::path::Path;
use std::time::Duration;

use ds_api::Environment;
use ds_engine::DEFAULT_MAX_PAGES;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_token: Option<String>,
    pub sandbox: Option<bool>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_pages: Option<u32>,
}

impl Settings {
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

    /// File (if any) overlaid with the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.with_env(|name| std::env::var(name).ok())
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = var("DNSIMPLE_TOKEN") {
            self.api_token = Some(token);
        }
        if let Some(raw) = var("DNSIMPLE_SANDBOX") {
            self.sandbox = Some(match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(AppError::Setting {
                        name: "DNSIMPLE_SANDBOX",
                        reason: format!("expected true or false, got \"{other}\""),
                    })
                }
            });
        }
        if let Some(url) = var("DNSIMPLE_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(raw) = var("DNSIMPLE_TIMEOUT_SECS") {
            self.timeout_secs = Some(parse_number("DNSIMPLE_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = var("DNSIMPLE_MAX_PAGES") {
            self.max_pages = Some(parse_number("DNSIMPLE_MAX_PAGES", &raw)?);
        }
        Ok(self)
    }

    pub fn api_token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingToken)
    }

    /// An explicit base URL wins over the sandbox flag.
    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.sandbox) {
            (Some(url), _) => url.as_str(),
            (None, Some(true)) => Environment::Sandbox.base_url(),
            _ => Environment::Production.base_url(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1))
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages.unwrap_or(DEFAULT_MAX_PAGES).max(1)
    }
}

fn parse_number<T>(name: &'static str, raw: &str) -> Result<T>
where
    T: std::str::FromStr + Default + PartialEq,
{
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(value),
        _ => Err(AppError::Setting {
            name,
            reason: format!("\"{raw}\" is not a positive number"),
        }),
    }
}
