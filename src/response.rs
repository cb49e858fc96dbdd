//! Admin API response handling: open error bodies and status-code classification.

use crate::resource::Operation;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unstructured error body returned by the Admin API. The shape is not fixed across
/// Kong versions (`{"message": ..}`, `{"name": .., "fields": {..}}` or bare field errors),
/// so it stays a key-value map until a message is extracted for display.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorRecord(Map<String, Value>);

impl ErrorRecord {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => ErrorRecord(map),
            Value::Null => ErrorRecord::default(),
            Value::String(s) => Self::with_message(s),
            other => Self::with_message(other.to_string()),
        }
    }

    /// Decode a raw error body. Bodies that are not JSON are kept as text under `message`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return ErrorRecord::default();
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(v) => Self::from_value(v),
            Err(_) => Self::with_message(String::from_utf8_lossy(bytes).trim().to_string()),
        }
    }

    fn with_message(message: String) -> Self {
        let mut map = Map::new();
        map.insert("message".into(), Value::String(message));
        ErrorRecord(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Human-readable message: `message`, then `name`, then `field: value` pairs.
    pub fn message(&self) -> String {
        for key in ["message", "name"] {
            if let Some(Value::String(s)) = self.0.get(key) {
                return s.clone();
            }
        }
        if self.0.is_empty() {
            return "no error details".into();
        }
        let mut pairs: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}: {}", k, s),
                other => format!("{}: {}", k, other),
            })
            .collect();
        pairs.sort();
        pairs.join(", ")
    }
}

/// How a response status is interpreted for a lifecycle operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// Read found nothing: the entity is gone remotely.
    Absent,
    /// Create collided with an existing entity.
    Conflict,
    Unexpected,
}

/// The only status that counts as success for `operation`.
pub fn expected_status(operation: Operation) -> StatusCode {
    match operation {
        Operation::Create => StatusCode::CREATED,
        Operation::Read | Operation::Import | Operation::Update => StatusCode::OK,
        Operation::Delete => StatusCode::NO_CONTENT,
    }
}

pub fn classify(operation: Operation, status: StatusCode) -> StatusClass {
    if status == expected_status(operation) {
        return StatusClass::Success;
    }
    match (operation, status) {
        (Operation::Read | Operation::Import, StatusCode::NOT_FOUND) => StatusClass::Absent,
        (Operation::Create, StatusCode::CONFLICT) => StatusClass::Conflict,
        _ => StatusClass::Unexpected,
    }
}
