//! Kong reconcile: drive Kong consumers and credentials to a declared state through the Admin API.

pub mod config;
pub mod error;
pub mod registry;
pub mod resource;
pub mod response;
pub mod schema;
pub mod service;
pub mod state;
pub mod transport;

pub use config::{load_from_path, validate, ProviderConfig};
pub use error::{ConfigError, ReconcileError, TransportError};
pub use registry::{ResourceHandler, ResourceRegistry};
pub use resource::{
    BasicAuthCredentialResource, ConsumerResource, JwtCredentialResource, KeyAuthCredentialResource, Operation,
    Resource,
};
pub use response::ErrorRecord;
pub use schema::{FieldSchema, ResourceSchema};
pub use service::{Action, Plan, Reconciler, StateValidator};
pub use state::ResourceData;
pub use transport::{ApiPath, ApiRequest, ApiResponse, HttpTransport, Transport};
