//! Typed errors and status mapping.

use crate::response::ErrorRecord;
use crate::resource::Operation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("invalid admin url '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
}

/// The call to the Admin API could not be completed or its response could not be read.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("encode body: {0}")]
    Encode(serde_json::Error),
    #[error("decode body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid path: {0}")]
    InvalidPath(#[from] url::ParseError),
    #[error("'{0}' cannot be used as a path segment")]
    InvalidSegment(String),
    #[error("response (HTTP {status}) carries no id")]
    MissingIdentity { status: u16 },
}

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("error while {operation} {kind}")]
    Transport {
        operation: Operation,
        kind: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("{status}: {}", .body.message())]
    Remote {
        kind: &'static str,
        status: u16,
        body: ErrorRecord,
    },
    #[error("409 Conflict - use import to manage this {kind}")]
    Conflict { kind: &'static str, body: ErrorRecord },
    #[error("cannot {} {kind}: no identity (not created remotely)", .operation.as_str())]
    MissingIdentity { operation: Operation, kind: &'static str },
    #[error("cannot create {kind}: already exists remotely as '{id}'")]
    AlreadyRealized { kind: &'static str, id: String },
    #[error("{kind}: owner reference '{field}' is required")]
    MissingOwner { kind: &'static str, field: &'static str },
    #[error("invalid import id '{id}' for {kind}: expected <consumer>/<credential-id>")]
    InvalidImportId { kind: &'static str, id: String },
    #[error("cannot import {kind} '{id}': not found")]
    ImportTargetMissing { kind: &'static str, id: String },
    #[error("validation: {0}")]
    Validation(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ReconcileError {
    /// Create hit an existing remote entity; import it instead of retrying.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ReconcileError::Conflict { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ReconcileError::Transport { .. })
    }

    /// HTTP status reported by the Admin API, when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ReconcileError::Remote { status, .. } => Some(*status),
            ReconcileError::Conflict { .. } => Some(409),
            ReconcileError::Transport {
                source: TransportError::Decode { status, .. },
                ..
            } => Some(*status),
            _ => None,
        }
    }

    /// Decoded error body, if the Admin API sent one.
    pub fn body(&self) -> Option<&ErrorRecord> {
        match self {
            ReconcileError::Remote { body, .. } | ReconcileError::Conflict { body, .. } => Some(body),
            _ => None,
        }
    }
}
