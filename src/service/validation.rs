//! Local state validation from schema declarations.

use crate::error::ReconcileError;
use crate::schema::{is_empty_value, ResourceSchema};
use crate::state::ResourceData;

pub struct StateValidator;

impl StateValidator {
    /// Validate state fields against the schema. Unknown fields are rejected and all
    /// required fields must be set. Rules the Admin API enforces itself (e.g. username
    /// or custom_id on consumers) are left to it.
    pub fn validate(state: &ResourceData, schema: &ResourceSchema) -> Result<(), ReconcileError> {
        for (name, value) in state.fields() {
            let field = schema.field(name).ok_or_else(|| {
                ReconcileError::Validation(format!("{}: unknown field {}", schema.type_name, name))
            })?;
            if value.is_null() {
                continue;
            }
            if !value.is_string() {
                return Err(ReconcileError::Validation(format!("{} must be a string", name)));
            }
            if !field.allowed.is_empty() && !is_empty_value(value) {
                let ok = value.as_str().map(|s| field.allowed.contains(&s)).unwrap_or(false);
                if !ok {
                    return Err(ReconcileError::Validation(format!(
                        "{} must be one of: {:?}",
                        name, field.allowed
                    )));
                }
            }
        }
        for field in schema.fields.iter().filter(|f| f.required) {
            if state.get(field.name).map(is_empty_value).unwrap_or(true) {
                return Err(ReconcileError::Validation(format!("{} is required", field.name)));
            }
        }
        Ok(())
    }
}
