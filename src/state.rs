//! Declarative state for one entity: desired/last-known field values plus remote identity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type Fields = BTreeMap<String, Value>;

/// Caller-held state of one entity. Identity is empty until the entity exists remotely
/// (Absent) and then names it for the rest of its lifecycle (Present).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    fields: Fields,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for an entity already known remotely (e.g. an import target).
    pub fn with_id(id: impl Into<String>) -> Self {
        ResourceData {
            id: id.into(),
            fields: Fields::new(),
        }
    }

    pub fn from_fields<K, V, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        ResourceData {
            id: String::new(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True once the entity exists remotely.
    pub fn is_present(&self) -> bool {
        !self.id.is_empty()
    }

    pub(crate) fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Mark the entity as gone remotely; it needs re-creation.
    pub(crate) fn clear_id(&mut self) {
        self.id.clear();
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String value of a field; absent, null and non-string values read as empty.
    pub fn get_str(&self, name: &str) -> &str {
        self.fields.get(name).and_then(Value::as_str).unwrap_or("")
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }
}
