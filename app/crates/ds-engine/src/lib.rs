//! Execution core for DNSimple Actions.
//!
//! - [`registry`]: resource modules register a [`ResourceDefinition`] here and
//!   the dispatcher looks handlers up by `(resource, operation)`.
//! - [`pagination`]: exhaustive and bounded fetching of paged list endpoints.
//! - [`dispatch`]: the per-item loop that applies the host's continuation policy.
//! - [`context`]: the host contract every handler is written against.

pub mod context;
pub mod dispatch;
pub mod metadata;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod pagination;
pub mod record;
pub mod registry;

pub use context::{ExecutionContext, StaticContext, DEFAULT_MAX_PAGES};
pub use dispatch::{DispatchFailure, Dispatcher};
pub use metadata::{
    pagination_fields, AuxiliaryKind, FieldDescriptor, FieldKind, OperationDescriptor, SelectOption,
};
pub use pagination::{
    extract_array, fetch_all_pages, handle_paginated_list, PaginationOptions, PaginationState,
};
pub use record::{to_records, OutputRecord};
pub use registry::{AuxiliaryMethod, OperationHandler, Registry, ResourceDefinition};
