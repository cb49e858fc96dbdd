//! Transport seam: composed requests in, status plus raw body out.
//! The engine owns status interpretation; transports only move bytes and decode on request.

mod http;

pub use http::HttpTransport;

use crate::error::TransportError;
use crate::response::ErrorRecord;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Relative Admin API path built by successive segment concatenation,
/// e.g. `consumers/` + `c-123/` + `jwt/` + `cred-456`. Literal collection segments go
/// through [`push`](Self::push); caller-supplied values go through
/// [`push_value`](Self::push_value) so they can never leave their segment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiPath(String);

impl ApiPath {
    pub fn new(segment: &str) -> Self {
        ApiPath(segment.to_string())
    }

    pub fn push(mut self, segment: &str) -> Self {
        self.0.push_str(segment);
        self
    }

    /// Append `value` percent-encoded as a single segment. `.` and `..` are rejected:
    /// URL resolution collapses them even when encoded.
    pub fn push_value(mut self, value: &str) -> Result<Self, TransportError> {
        if matches!(value, "." | "..") {
            return Err(TransportError::InvalidSegment(value.to_string()));
        }
        self.0.push_str(&urlencoding::encode(value));
        Ok(self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: ApiPath,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: ApiPath) -> Self {
        ApiRequest { method, path, body: None }
    }

    pub fn get(path: ApiPath) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: ApiPath) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: ApiPath) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: ApiPath) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        ApiResponse { status, body: body.into() }
    }

    pub fn json_body(status: StatusCode, body: &Value) -> Self {
        ApiResponse {
            status,
            body: body.to_string().into_bytes(),
        }
    }

    pub fn empty(status: StatusCode) -> Self {
        ApiResponse { status, body: Vec::new() }
    }

    /// Decode the body into the success shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TransportError> {
        serde_json::from_slice(&self.body).map_err(|source| TransportError::Decode {
            status: self.status.as_u16(),
            source,
        })
    }

    /// Decode the body into the open error shape. Never fails.
    pub fn error_record(&self) -> ErrorRecord {
        ErrorRecord::from_bytes(&self.body)
    }
}

/// Issues Admin API calls. Shared by concurrent callers; implementations must not
/// need external locking. Timeouts belong to the implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).execute(request).await
    }
}
