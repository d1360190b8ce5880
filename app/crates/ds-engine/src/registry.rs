//! Resource registry: the dispatch table every resource module plugs into.
//!
//! Resources are looked up by name, operations by their descriptor `value`.
//! The registry is built once at startup and shared read-only afterwards
//! (`Arc<Registry>`), so it needs no locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ds_error::{AdapterError, Result};
use futures::future::BoxFuture;

use crate::context::ExecutionContext;
use crate::metadata::{AuxiliaryKind, FieldDescriptor, OperationDescriptor, SelectOption};
use crate::record::OutputRecord;

/// Runs one operation for one input item.
pub type OperationHandler =
    for<'a> fn(&'a dyn ExecutionContext, usize) -> BoxFuture<'a, Result<Vec<OutputRecord>>>;

/// Backs a list-search or load-options picker. The second argument is the
/// user's filter text, if any.
pub type AuxiliaryMethod = for<'a> fn(
    &'a dyn ExecutionContext,
    Option<&'a str>,
) -> BoxFuture<'a, Result<Vec<SelectOption>>>;

pub struct ResourceDefinition {
    pub name: String,
    pub operations: Vec<OperationDescriptor>,
    pub fields: Vec<FieldDescriptor>,
    handlers: HashMap<String, OperationHandler>,
    auxiliary: HashMap<AuxiliaryKind, HashMap<String, AuxiliaryMethod>>,
}

impl ResourceDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            operations: Vec::new(),
            fields: Vec::new(),
            handlers: HashMap::new(),
            auxiliary: HashMap::new(),
        }
    }

    /// Declare an operation and install its handler under `value`.
    pub fn operation(
        mut self,
        value: &str,
        name: &str,
        action: &str,
        handler: OperationHandler,
    ) -> Self {
        self.operations
            .push(OperationDescriptor::new(&self.name, value, name, action));
        self.handlers.insert(value.to_string(), handler);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn list_search(self, name: &str, method: AuxiliaryMethod) -> Self {
        self.auxiliary_method(AuxiliaryKind::ListSearch, name, method)
    }

    pub fn load_options(self, name: &str, method: AuxiliaryMethod) -> Self {
        self.auxiliary_method(AuxiliaryKind::LoadOptions, name, method)
    }

    fn auxiliary_method(
        mut self,
        kind: AuxiliaryKind,
        name: &str,
        method: AuxiliaryMethod,
    ) -> Self {
        self.auxiliary
            .entry(kind)
            .or_default()
            .insert(name.to_string(), method);
        self
    }

    pub fn handler(&self, operation: &str) -> Option<OperationHandler> {
        self.handlers.get(operation).copied()
    }

    pub fn auxiliary_methods(
        &self,
        kind: AuxiliaryKind,
    ) -> Option<&HashMap<String, AuxiliaryMethod>> {
        self.auxiliary.get(&kind)
    }
}

impl fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut operations: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        operations.sort_unstable();
        f.debug_struct("ResourceDefinition")
            .field("name", &self.name)
            .field("operations", &operations)
            .field("fields", &self.fields.len())
            .finish()
    }
}

#[derive(Default)]
pub struct Registry {
    resources: Vec<Arc<ResourceDefinition>>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a definition; an existing one with the same name is replaced in place.
    pub fn register(&mut self, definition: impl Into<Arc<ResourceDefinition>>) {
        let definition = definition.into();
        match self.index.get(&definition.name) {
            Some(&slot) => {
                tracing::warn!(
                    resource = %definition.name,
                    "replacing already registered resource"
                );
                self.resources[slot] = definition;
            }
            None => {
                tracing::debug!(resource = %definition.name, "registered resource");
                self.index
                    .insert(definition.name.clone(), self.resources.len());
                self.resources.push(definition);
            }
        }
    }

    /// Like [`register`](Self::register) but refuses to replace an existing name.
    pub fn register_unique(
        &mut self,
        definition: impl Into<Arc<ResourceDefinition>>,
    ) -> Result<()> {
        let definition = definition.into();
        if self.index.contains_key(&definition.name) {
            return Err(AdapterError::DuplicateResource {
                name: definition.name.clone(),
            });
        }
        self.register(definition);
        Ok(())
    }

    pub fn resource(&self, name: &str) -> Option<&Arc<ResourceDefinition>> {
        self.index.get(name).map(|&slot| &self.resources[slot])
    }

    pub fn handler(&self, resource: &str, operation: &str) -> Option<OperationHandler> {
        self.resource(resource)?.handler(operation)
    }

    pub fn resource_names(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn all_operation_metadata(&self) -> Vec<OperationDescriptor> {
        self.resources
            .iter()
            .flat_map(|r| r.operations.iter().cloned())
            .collect()
    }

    pub fn all_field_metadata(&self) -> Vec<FieldDescriptor> {
        self.resources
            .iter()
            .flat_map(|r| r.fields.iter().cloned())
            .collect()
    }

    /// Shallow union over all resources; a later resource wins on a name clash.
    pub fn all_auxiliary_methods(&self, kind: AuxiliaryKind) -> HashMap<String, AuxiliaryMethod> {
        let mut merged = HashMap::new();
        for methods in self.resources.iter().filter_map(|r| r.auxiliary_methods(kind)) {
            merged.extend(methods.iter().map(|(name, method)| (name.clone(), *method)));
        }
        merged
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.resources.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StaticContext;
    use crate::metadata::FieldDescriptor;
    use crate::mock::MockHttpClient;
    use serde_json::json;

    type Handled<'a> = BoxFuture<'a, Result<Vec<OutputRecord>>>;
    type Options<'a> = BoxFuture<'a, Result<Vec<SelectOption>>>;

    fn list_a<'a>(_: &'a dyn ExecutionContext, item_index: usize) -> Handled<'a> {
        Box::pin(async move { Ok(vec![OutputRecord::for_item(json!({"from": "a"}), item_index)]) })
    }

    fn list_b<'a>(_: &'a dyn ExecutionContext, item_index: usize) -> Handled<'a> {
        Box::pin(async move { Ok(vec![OutputRecord::for_item(json!({"from": "b"}), item_index)]) })
    }

    fn options_a<'a>(_: &'a dyn ExecutionContext, _: Option<&'a str>) -> Options<'a> {
        Box::pin(async { Ok(vec![SelectOption::new("a", "a")]) })
    }

    fn options_b<'a>(_: &'a dyn ExecutionContext, _: Option<&'a str>) -> Options<'a> {
        Box::pin(async { Ok(vec![SelectOption::new("b", "b")]) })
    }

    fn context() -> StaticContext {
        StaticContext::new(Arc::new(MockHttpClient::with_responses(Vec::new())))
            .with_item(json!({}), json!({}))
    }

    #[tokio::test]
    async fn handler_lookup_returns_installed_handler() {
        let mut registry = Registry::new();
        registry.register(
            ResourceDefinition::new("domain").operation("list", "List", "List domains", list_a),
        );
        registry.register(
            ResourceDefinition::new("zone").operation("list", "List", "List zones", list_b),
        );

        let ctx = context();
        let domain = registry.handler("domain", "list").expect("domain/list");
        let zone = registry.handler("zone", "list").expect("zone/list");
        assert_eq!(domain(&ctx, 0).await.expect("run")[0].json, json!({"from": "a"}));
        assert_eq!(zone(&ctx, 0).await.expect("run")[0].json, json!({"from": "b"}));

        assert!(registry.handler("domain", "delete").is_none());
        assert!(registry.handler("contact", "list").is_none());
        assert!(registry.handler("", "").is_none());
    }

    #[tokio::test]
    async fn same_name_registration_replaces_previous() {
        let mut registry = Registry::new();
        registry.register(
            ResourceDefinition::new("domain")
                .operation("list", "List", "List domains", list_a)
                .operation("get", "Get", "Get a domain", list_a)
                .fields([FieldDescriptor::string("old", "Old")]),
        );
        registry.register(
            ResourceDefinition::new("zone").operation("list", "List", "List zones", list_a),
        );
        registry.register(
            ResourceDefinition::new("domain")
                .operation("list", "List", "List domains", list_b)
                .fields([FieldDescriptor::string("new", "New")]),
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resource_names(), vec!["domain", "zone"]);
        assert!(registry.handler("domain", "get").is_none());

        let values: Vec<(String, String)> = registry
            .all_operation_metadata()
            .into_iter()
            .map(|op| (op.resource, op.value))
            .collect();
        assert_eq!(
            values,
            vec![
                ("domain".to_string(), "list".to_string()),
                ("zone".to_string(), "list".to_string()),
            ]
        );
        let fields: Vec<String> = registry
            .all_field_metadata()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(fields, vec!["new".to_string()]);

        let ctx = context();
        let handler = registry.handler("domain", "list").expect("domain/list");
        assert_eq!(handler(&ctx, 0).await.expect("run")[0].json, json!({"from": "b"}));
    }

    #[test]
    fn register_unique_rejects_duplicates() {
        let mut registry = Registry::new();
        registry
            .register_unique(ResourceDefinition::new("domain"))
            .expect("first registration");
        let err = registry
            .register_unique(ResourceDefinition::new("domain"))
            .expect_err("duplicate");
        assert!(matches!(err, AdapterError::DuplicateResource { ref name } if name == "domain"));
    }

    #[test]
    fn operation_metadata_keeps_per_resource_order() {
        let mut registry = Registry::new();
        registry.register(
            ResourceDefinition::new("record")
                .operation("list", "List", "List records", list_a)
                .operation("create", "Create", "Create a record", list_a)
                .operation("delete", "Delete", "Delete a record", list_a),
        );
        let values: Vec<String> = registry
            .all_operation_metadata()
            .into_iter()
            .map(|op| op.value)
            .collect();
        assert_eq!(values, vec!["list", "create", "delete"]);
    }

    #[tokio::test]
    async fn auxiliary_methods_merge_later_wins() {
        let mut registry = Registry::new();
        registry.register(
            ResourceDefinition::new("contact")
                .load_options("getContacts", options_a)
                .load_options("shared", options_a),
        );
        registry.register(
            ResourceDefinition::new("zone")
                .load_options("shared", options_b)
                .list_search("searchZones", options_b),
        );

        let load = registry.all_auxiliary_methods(AuxiliaryKind::LoadOptions);
        assert_eq!(load.len(), 2);
        let ctx = context();
        let shared = *load.get("shared").expect("shared");
        assert_eq!(shared(&ctx, None).await.expect("run")[0].name, "b");

        let search = registry.all_auxiliary_methods(AuxiliaryKind::ListSearch);
        assert_eq!(search.keys().collect::<Vec<_>>(), vec!["searchZones"]);
    }
}
