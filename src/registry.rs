//! Resource handlers by declarative type name, for callers that dispatch at runtime.

use crate::error::ReconcileError;
use crate::resource::{
    BasicAuthCredentialResource, ConsumerResource, JwtCredentialResource, KeyAuthCredentialResource, Resource,
};
use crate::schema::ResourceSchema;
use crate::service::{Plan, Reconciler};
use crate::state::ResourceData;
use crate::transport::Transport;
use async_trait::async_trait;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Object-safe view of [`Reconciler`] for one entity kind.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn kind(&self) -> &'static str;
    fn schema(&self) -> ResourceSchema;
    async fn create(&self, transport: &dyn Transport, state: &ResourceData) -> Result<ResourceData, ReconcileError>;
    async fn read(&self, transport: &dyn Transport, state: &ResourceData) -> Result<ResourceData, ReconcileError>;
    async fn update(&self, transport: &dyn Transport, state: &ResourceData) -> Result<ResourceData, ReconcileError>;
    async fn delete(&self, transport: &dyn Transport, state: &ResourceData) -> Result<(), ReconcileError>;
    async fn import(&self, transport: &dyn Transport, external_id: &str) -> Result<ResourceData, ReconcileError>;
    fn plan(&self, prior: Option<&ResourceData>, desired: Option<&ResourceData>) -> Plan;
    async fn apply(&self, transport: &dyn Transport, plan: &Plan) -> Result<Option<ResourceData>, ReconcileError>;
}

struct Handler<R>(PhantomData<fn() -> R>);

#[async_trait]
impl<R: Resource> ResourceHandler for Handler<R> {
    fn type_name(&self) -> &'static str {
        R::TYPE_NAME
    }

    fn kind(&self) -> &'static str {
        R::KIND
    }

    fn schema(&self) -> ResourceSchema {
        R::schema()
    }

    async fn create(&self, transport: &dyn Transport, state: &ResourceData) -> Result<ResourceData, ReconcileError> {
        Reconciler::<R>::create(transport, state).await
    }

    async fn read(&self, transport: &dyn Transport, state: &ResourceData) -> Result<ResourceData, ReconcileError> {
        Reconciler::<R>::read(transport, state).await
    }

    async fn update(&self, transport: &dyn Transport, state: &ResourceData) -> Result<ResourceData, ReconcileError> {
        Reconciler::<R>::update(transport, state).await
    }

    async fn delete(&self, transport: &dyn Transport, state: &ResourceData) -> Result<(), ReconcileError> {
        Reconciler::<R>::delete(transport, state).await
    }

    async fn import(&self, transport: &dyn Transport, external_id: &str) -> Result<ResourceData, ReconcileError> {
        Reconciler::<R>::import(transport, external_id).await
    }

    fn plan(&self, prior: Option<&ResourceData>, desired: Option<&ResourceData>) -> Plan {
        Reconciler::<R>::plan(prior, desired)
    }

    async fn apply(&self, transport: &dyn Transport, plan: &Plan) -> Result<Option<ResourceData>, ReconcileError> {
        Reconciler::<R>::apply(transport, plan).await
    }
}

#[derive(Clone)]
pub struct ResourceRegistry {
    by_type: HashMap<&'static str, Arc<dyn ResourceHandler>>,
}

impl ResourceRegistry {
    /// Registry with every built-in kind.
    pub fn new() -> Self {
        let mut registry = ResourceRegistry::empty();
        registry.register::<ConsumerResource>();
        registry.register::<JwtCredentialResource>();
        registry.register::<KeyAuthCredentialResource>();
        registry.register::<BasicAuthCredentialResource>();
        registry
    }

    pub fn empty() -> Self {
        ResourceRegistry {
            by_type: HashMap::new(),
        }
    }

    pub fn register<R: Resource>(&mut self) {
        self.by_type
            .insert(R::TYPE_NAME, Arc::new(Handler::<R>(PhantomData)));
    }

    pub fn get(&self, type_name: &str) -> Option<Arc<dyn ResourceHandler>> {
        self.by_type.get(type_name).cloned()
    }

    /// Like [`get`](Self::get), failing with a validation error for unknown types.
    pub fn handler(&self, type_name: &str) -> Result<Arc<dyn ResourceHandler>, ReconcileError> {
        self.get(type_name)
            .ok_or_else(|| ReconcileError::Validation(format!("unknown resource type: {}", type_name)))
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_type.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
