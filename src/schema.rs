//! Field declarations per entity kind: presence, sensitivity and descriptions.

use crate::state::Fields;
use serde::Serialize;
use serde_json::Value;

/// Placeholder shown instead of a sensitive value.
pub const REDACTED: &str = "(sensitive value)";

/// Every Admin API field handled here is a string; values are validated as such.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    pub name: &'static str,
    pub required: bool,
    /// Value must be redacted wherever field values are surfaced.
    pub sensitive: bool,
    /// Changing this field replaces the entity instead of updating it.
    pub force_new: bool,
    /// The server generates a value when none is sent.
    pub computed: bool,
    /// Accepted values; empty means unrestricted.
    #[serde(skip_serializing_if = "unrestricted")]
    pub allowed: &'static [&'static str],
    pub description: &'static str,
}

impl FieldSchema {
    pub const fn string(name: &'static str) -> Self {
        FieldSchema {
            name,
            required: false,
            sensitive: false,
            force_new: false,
            computed: false,
            allowed: &[],
            description: "",
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub const fn allowed(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = values;
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Serializable for schema export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResourceSchema {
    /// Declarative type name, e.g. `kong_consumer`.
    pub type_name: &'static str,
    pub fields: Vec<FieldSchema>,
}

impl ResourceSchema {
    pub fn new(type_name: &'static str, fields: Vec<FieldSchema>) -> Self {
        ResourceSchema { type_name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.field(name).map(|f| f.sensitive).unwrap_or(false)
    }

    pub fn sensitive_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.sensitive).map(|f| f.name)
    }

    /// Copy of `fields` with non-empty sensitive values replaced by [`REDACTED`].
    pub fn redact(&self, fields: &Fields) -> Fields {
        fields
            .iter()
            .map(|(k, v)| {
                let v = if self.is_sensitive(k) && !is_empty_value(v) {
                    Value::String(REDACTED.into())
                } else {
                    v.clone()
                };
                (k.clone(), v)
            })
            .collect()
    }
}

fn unrestricted(values: &&'static [&'static str]) -> bool {
    values.is_empty()
}

/// Null and empty strings are the "unset" value; such fields are never sent.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
