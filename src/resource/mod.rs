//! Entity adapters: one per Kong entity kind, translating declarative state to and from
//! the Admin API wire shape and naming the paths the engine calls.

mod basic_auth;
mod consumer;
mod jwt;
mod key_auth;

pub use basic_auth::{BasicAuthCredential, BasicAuthCredentialResource};
pub use consumer::{Consumer, ConsumerResource};
pub use jwt::{JwtCredential, JwtCredentialResource};
pub use key_auth::{KeyAuthCredential, KeyAuthCredentialResource};

use crate::error::{ReconcileError, TransportError};
use crate::schema::ResourceSchema;
use crate::state::ResourceData;
use crate::transport::ApiPath;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Lifecycle phase; used for status expectations and error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Import => "import",
        }
    }
}

impl fmt::Display for Operation {
    /// Progressive form, as in "error while creating consumer".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "creating",
            Operation::Read => "reading",
            Operation::Update => "updating",
            Operation::Delete => "deleting",
            Operation::Import => "importing",
        })
    }
}

/// Nesting of a credential kind under its owning consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Owner {
    /// State field holding the owner's identity. Never serialized into the body.
    pub field: &'static str,
    /// Sub-collection under the owner, e.g. `jwt/`.
    pub collection: &'static str,
}

/// Capability set the engine needs from one entity kind.
pub trait Resource: Send + Sync + 'static {
    /// Wire shape exchanged with the Admin API.
    type Record: Serialize + DeserializeOwned + Send + Sync;

    /// Kind name used in messages, e.g. `jwt credential`.
    const KIND: &'static str;
    /// Declarative type name, e.g. `kong_consumer_jwt_credential`.
    const TYPE_NAME: &'static str;
    /// Top-level collection, e.g. `consumers/`.
    const COLLECTION: &'static str;
    const OWNER: Option<Owner> = None;

    fn schema() -> ResourceSchema;

    /// Wire record for the current state. Identity goes into `id`; empty fields are left
    /// empty so they are omitted from the body.
    fn to_record(state: &ResourceData) -> Self::Record;

    /// Write every body field of `record` into `state`. Identity and owner are handled by the engine.
    fn apply_record(record: Self::Record, state: &mut ResourceData);

    fn record_id(record: &Self::Record) -> &str;

    /// Owner reference carried by the record; empty for top-level kinds.
    fn owner(_record: &Self::Record) -> &str {
        ""
    }

    /// Request path for `operation`. Create targets the collection; everything else the item.
    /// Identity and owner are encoded as single segments.
    fn path_for(operation: Operation, id: &str, owner: &str) -> Result<ApiPath, TransportError> {
        let mut path = ApiPath::new(Self::COLLECTION);
        if let Some(nested) = Self::OWNER {
            path = path.push_value(owner)?.push("/").push(nested.collection);
        }
        match operation {
            Operation::Create => Ok(path),
            _ => path.push_value(id),
        }
    }

    /// Split an import id into (owner, identity). Top-level kinds take a single id;
    /// nested kinds require `<owner>/<id>`. Neither part may contain another `/`.
    fn split_import_id(external_id: &str) -> Result<(Option<String>, String), ReconcileError> {
        let invalid = || ReconcileError::InvalidImportId {
            kind: Self::KIND,
            id: external_id.to_string(),
        };
        if Self::OWNER.is_none() {
            if external_id.is_empty() || external_id.contains('/') {
                return Err(invalid());
            }
            return Ok((None, external_id.to_string()));
        }
        match external_id.split_once('/') {
            Some((owner, id)) if !owner.is_empty() && !id.is_empty() && !id.contains('/') => {
                Ok((Some(owner.to_string()), id.to_string()))
            }
            _ => Err(invalid()),
        }
    }
}

/// Kong reports unset optional fields as `null`; read them as empty.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
