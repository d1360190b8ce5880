//! DNSimple resource modules.
//!
//! Each module publishes one [`ResourceDefinition`]; [`register_all`] puts
//! them into a [`Registry`] for the dispatcher.

mod common;

pub mod account;
pub mod analytics;
pub mod contact;
pub mod domain;
pub mod registrar;
pub mod webhook;
pub mod zone;
pub mod zone_record;

use ds_engine::{Registry, ResourceDefinition};
use ds_error::Result;

pub fn definitions() -> Vec<ResourceDefinition> {
    vec![
        account::definition(),
        domain::definition(),
        zone::definition(),
        zone_record::definition(),
        contact::definition(),
        registrar::definition(),
        analytics::definition(),
        webhook::definition(),
    ]
}

/// Register every resource, failing on a repeated resource name.
pub fn register_all(registry: &mut Registry) -> Result<()> {
    for definition in definitions() {
        tracing::debug!(
            resource = %definition.name,
            operations = definition.operations.len(),
            "registering"
        );
        registry.register_unique(definition)?;
    }
    Ok(())
}

pub fn build_registry() -> Result<Registry> {
    let mut registry = Registry::new();
    register_all(&mut registry)?;
    Ok(registry)
}
