//! Per-item execution loop.
//!
//! Items run strictly one after another. Each item resolves its
//! `resource`/`operation` pair through the [`Registry`] and its records are
//! appended in input order. The dispatcher is the only place that decides
//! between recording a failure and aborting the run.

use std::sync::Arc;

use ds_error::{AdapterError, Result};
use thiserror::Error;
use tracing::Instrument;

use crate::context::ExecutionContext;
use crate::record::OutputRecord;
use crate::registry::Registry;

/// A run stopped at `item_index`. Records of earlier items are kept in `completed`.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct DispatchFailure {
    pub item_index: usize,
    pub completed: Vec<OutputRecord>,
    #[source]
    pub error: AdapterError,
}

pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub async fn execute(
        &self,
        ctx: &dyn ExecutionContext,
    ) -> std::result::Result<Vec<OutputRecord>, DispatchFailure> {
        let mut output = Vec::new();

        for item_index in 0..ctx.input_items().len() {
            let span = tracing::info_span!("item", index = item_index);
            match self.run_item(ctx, item_index).instrument(span).await {
                Ok(records) => output.extend(records),
                Err(error) if ctx.continue_on_fail() => {
                    tracing::warn!(item = item_index, %error, "item failed, continuing");
                    output.push(OutputRecord::error(error.to_string(), item_index));
                }
                Err(error) => {
                    tracing::error!(item = item_index, %error, "item failed, aborting run");
                    return Err(DispatchFailure {
                        item_index,
                        completed: output,
                        error: error.for_item(item_index),
                    });
                }
            }
        }

        Ok(output)
    }

    async fn run_item(
        &self,
        ctx: &dyn ExecutionContext,
        item_index: usize,
    ) -> Result<Vec<OutputRecord>> {
        let resource = ctx.string_param("resource", item_index)?;
        let operation = ctx.string_param("operation", item_index)?;

        let handler = self
            .registry
            .handler(&resource, &operation)
            .ok_or_else(|| AdapterError::UnsupportedOperation {
                resource: resource.clone(),
                operation: operation.clone(),
            })?;

        tracing::debug!(%resource, %operation, "executing");
        let mut records = handler(ctx, item_index).await?;
        for record in &mut records {
            record.paired_item.get_or_insert(item_index);
        }
        tracing::debug!(%resource, %operation, count = records.len(), "item succeeded");
        Ok(records)
    }
}
