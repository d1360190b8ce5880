use std::path::PathBuf;

use ds_error::{AdapterError, HttpError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid setting {name}: {reason}")]
    Setting { name: &'static str, reason: String },
    #[error("No API token configured; set DNSIMPLE_TOKEN or apiToken in the config file")]
    MissingToken,
    #[error("HTTP client setup failed: {0}")]
    Client(#[from] HttpError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
