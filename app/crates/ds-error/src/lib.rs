//! Structured error types shared by every DNSimple Actions crate.
//!
//! `HttpError` covers what the HTTP client can report; `AdapterError` is the
//! error every operation handler, the pagination engine and the dispatcher
//! return. `AdapterError::payload` gives the host a serialisable view.

use serde::Serialize;
use thiserror::Error;

/// Errors raised by an `HttpClient` implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HttpError {
    #[error("HTTP transport error: {0}")]
    Transport(String),
    #[error("DNSimple API error ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl HttpError {
    /// HTTP status code if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("The resource \"{resource}\" does not support the operation \"{operation}\"")]
    UnsupportedOperation { resource: String, operation: String },
    #[error("Missing required parameter \"{name}\" for item {item_index}")]
    MissingParameter { name: String, item_index: usize },
    #[error("Invalid parameter \"{name}\" for item {item_index}: {reason}")]
    InvalidParameter {
        name: String,
        item_index: usize,
        reason: String,
    },
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("Pagination of {endpoint} exceeded {max_pages} pages")]
    PageLimitExceeded { endpoint: String, max_pages: u32 },
    #[error("A resource named \"{name}\" is already registered")]
    DuplicateResource { name: String },
    #[error("Could not determine the DNSimple account for these credentials")]
    AccountUnresolved,
    #[error("Item {item_index}: {source}")]
    Item {
        item_index: usize,
        #[source]
        source: Box<AdapterError>,
    },
}

impl AdapterError {
    /// Attach item-index context, unless the error already carries it.
    pub fn for_item(self, item_index: usize) -> Self {
        match self {
            Self::Item { .. } => self,
            other => Self::Item {
                item_index,
                source: Box::new(other),
            },
        }
    }

    /// The error without any item-index wrapper.
    pub fn root(&self) -> &AdapterError {
        match self {
            Self::Item { source, .. } => source.root(),
            other => other,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedOperation { .. } => "unsupported_operation",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::Http(_) => "http",
            Self::PageLimitExceeded { .. } => "page_limit_exceeded",
            Self::DuplicateResource { .. } => "duplicate_resource",
            Self::AccountUnresolved => "account_unresolved",
            Self::Item { source, .. } => source.kind(),
        }
    }

    /// Serialisable view used when reporting an aborted run.
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            kind: self.kind().to_string(),
            message: self.to_string(),
            item_index: match self {
                Self::Item { item_index, .. } => Some(*item_index),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
}

pub type Result<T> = std::result::Result<T, AdapterError>;
