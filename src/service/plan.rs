//! Select the lifecycle operation implied by a change between last-known and desired state.

use crate::schema::{is_empty_value, ResourceSchema, REDACTED};
use crate::state::ResourceData;
use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Noop,
    Create,
    Update,
    /// Delete then create; a force-new field changed.
    Replace,
    Delete,
}

impl Action {
    fn symbol(&self) -> &'static str {
        match self {
            Action::Noop => " ",
            Action::Create => "+",
            Action::Update => "~",
            Action::Replace => "-/+",
            Action::Delete => "-",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldChange {
    pub name: String,
    pub before: Value,
    pub after: Value,
    pub sensitive: bool,
    pub force_new: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub type_name: &'static str,
    pub action: Action,
    /// Last-known state, if the entity is tracked.
    pub prior: Option<ResourceData>,
    /// State handed to create/update. For Update it carries the prior identity.
    pub target: Option<ResourceData>,
    pub changes: Vec<FieldChange>,
}

impl Plan {
    pub fn is_noop(&self) -> bool {
        self.action == Action::Noop
    }

    /// Render the plan with sensitive values redacted.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.prior.as_ref().map(|p| p.id()).filter(|id| !id.is_empty()).unwrap_or("(new)");
        write!(f, "{} {} {}", self.action.symbol(), self.type_name, id)?;
        for c in &self.changes {
            write!(f, "\n    {}: {} => {}", c.name, show(&c.before, c.sensitive), show(&c.after, c.sensitive))?;
            if c.force_new && self.action == Action::Replace {
                f.write_str(" (forces replacement)")?;
            }
        }
        Ok(())
    }
}

fn show(value: &Value, sensitive: bool) -> String {
    if is_empty_value(value) {
        "\"\"".into()
    } else if sensitive {
        REDACTED.into()
    } else {
        value.to_string()
    }
}

fn normalized(value: Option<&Value>) -> Value {
    match value {
        Some(v) if !is_empty_value(v) => v.clone(),
        _ => Value::Null,
    }
}

/// Compare schema fields of `prior` and `desired`. Empty and absent are the same value.
/// A computed field left empty in `desired` keeps its prior (server-generated) value.
///
/// Update omits empty fields and the Admin API keeps what it is not sent, so a field
/// emptied locally cannot be cleared by an Update. Outside a Replace such a change is
/// dropped from the plan with a warning, and the target keeps the remote value.
pub fn plan(schema: &ResourceSchema, prior: Option<&ResourceData>, desired: Option<&ResourceData>) -> Plan {
    let prior = prior.filter(|p| p.is_present());
    let mut target = desired.cloned();
    let mut changes = Vec::new();

    for field in &schema.fields {
        let before = normalized(prior.and_then(|p| p.get(field.name)));
        let mut after = normalized(desired.and_then(|d| d.get(field.name)));
        if field.computed && after.is_null() && desired.is_some() {
            if let Some(t) = target.as_mut() {
                if !before.is_null() {
                    t.set(field.name, before.clone());
                }
            }
            after = before.clone();
        }
        if before != after {
            changes.push(FieldChange {
                name: field.name.to_string(),
                before,
                after,
                sensitive: field.sensitive,
                force_new: field.force_new,
            });
        }
    }

    let replace = changes.iter().any(|c| c.force_new);
    if let (Some(_), Some(t)) = (prior, target.as_mut()) {
        if !replace {
            changes.retain(|c| {
                if !c.after.is_null() {
                    return true;
                }
                tracing::warn!(
                    type_name = schema.type_name,
                    field = %c.name,
                    "emptied field is not cleared remotely by an update; keeping the remote value"
                );
                t.set(c.name.clone(), c.before.clone());
                false
            });
        }
    }

    let action = match (prior, desired) {
        (None, None) => Action::Noop,
        (None, Some(_)) => Action::Create,
        (Some(_), None) => Action::Delete,
        (Some(_), Some(_)) if replace => Action::Replace,
        (Some(_), Some(_)) if changes.is_empty() => Action::Noop,
        (Some(_), Some(_)) => Action::Update,
    };

    if let (Action::Update, Some(p), Some(t)) = (action, prior, target.as_mut()) {
        t.set_id(p.id());
    }
    if matches!(action, Action::Create | Action::Replace) {
        if let Some(t) = target.as_mut() {
            t.clear_id();
        }
    }

    Plan {
        type_name: schema.type_name,
        action,
        prior: prior.cloned(),
        target,
        changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ConsumerResource, JwtCredentialResource, Resource};
    use serde_json::json;

    fn present(id: &str, fields: &[(&str, &str)]) -> ResourceData {
        let mut s = ResourceData::with_id(id);
        for (k, v) in fields {
            s.set(*k, *v);
        }
        s
    }

    #[test]
    fn untracked_entity_is_created() {
        let desired = ResourceData::new().with("username", "alice");
        let p = plan(&ConsumerResource::schema(), None, Some(&desired));
        assert_eq!(p.action, Action::Create);
        assert_eq!(p.changes.len(), 1);
        assert_eq!(p.changes[0].after, json!("alice"));
        assert_eq!(p.target.as_ref().unwrap().id(), "");
    }

    #[test]
    fn absent_prior_counts_as_untracked() {
        let prior = ResourceData::new().with("username", "alice");
        let p = plan(&ConsumerResource::schema(), Some(&prior), Some(&prior));
        assert_eq!(p.action, Action::Create);
        assert!(p.prior.is_none());
    }

    #[test]
    fn empty_and_missing_are_equal() {
        let prior = present("u1", &[("username", "alice"), ("custom_id", "")]);
        let desired = ResourceData::new().with("username", "alice");
        let p = plan(&ConsumerResource::schema(), Some(&prior), Some(&desired));
        assert!(p.is_noop());
    }

    #[test]
    fn changed_field_updates_with_prior_identity() {
        let prior = present("u1", &[("username", "alice")]);
        let desired = ResourceData::new().with("username", "alicia");
        let p = plan(&ConsumerResource::schema(), Some(&prior), Some(&desired));
        assert_eq!(p.action, Action::Update);
        assert_eq!(p.target.as_ref().unwrap().id(), "u1");
    }

    #[test]
    fn owner_change_forces_replacement() {
        let prior = present("j1", &[("consumer", "c1"), ("algorithm", "HS256")]);
        let desired = ResourceData::new().with("consumer", "c2").with("algorithm", "HS256");
        let p = plan(&JwtCredentialResource::schema(), Some(&prior), Some(&desired));
        assert_eq!(p.action, Action::Replace);
        assert_eq!(p.target.as_ref().unwrap().id(), "");
        assert!(p.describe().contains("consumer: \"c1\" => \"c2\" (forces replacement)"));
    }

    #[test]
    fn computed_fields_keep_generated_values() {
        let prior = present("j1", &[("consumer", "c1"), ("key", "gen-key"), ("secret", "gen-secret")]);
        let desired = ResourceData::new().with("consumer", "c1");
        let p = plan(&JwtCredentialResource::schema(), Some(&prior), Some(&desired));
        assert!(p.is_noop(), "{}", p);
        assert_eq!(p.target.as_ref().unwrap().get_str("secret"), "gen-secret");
    }

    #[test]
    fn removed_entity_is_deleted() {
        let prior = present("u1", &[("username", "alice")]);
        let p = plan(&ConsumerResource::schema(), Some(&prior), None);
        assert_eq!(p.action, Action::Delete);
        assert!(p.target.is_none());
        assert_eq!(p.to_string(), "- kong_consumer u1\n    username: \"alice\" => \"\"");
    }

    #[test]
    fn describe_redacts_sensitive_values() {
        let prior = present("j1", &[("consumer", "c1"), ("secret", "old-secret")]);
        let desired = ResourceData::new().with("consumer", "c1").with("secret", "new-secret");
        let p = plan(&JwtCredentialResource::schema(), Some(&prior), Some(&desired));
        assert_eq!(p.action, Action::Update);
        let text = p.describe();
        assert!(!text.contains("old-secret") && !text.contains("new-secret"), "{}", text);
        assert!(text.contains("secret: (sensitive value) => (sensitive value)"));
    }

    #[test]
    fn emptied_field_is_not_planned_as_update() {
        let prior = present("u1", &[("username", "alice"), ("custom_id", "ext-1")]);
        let desired = ResourceData::new().with("username", "alice").with("custom_id", "");
        let p = plan(&ConsumerResource::schema(), Some(&prior), Some(&desired));
        assert!(p.is_noop(), "{}", p);
        assert_eq!(p.target.as_ref().unwrap().get_str("custom_id"), "ext-1");

        let desired = ResourceData::new().with("username", "alicia");
        let p = plan(&ConsumerResource::schema(), Some(&prior), Some(&desired));
        assert_eq!(p.action, Action::Update);
        assert_eq!(p.changes.len(), 1);
        assert_eq!(p.changes[0].name, "username");
        let target = p.target.as_ref().unwrap();
        assert_eq!(target.get_str("custom_id"), "ext-1");
        assert_eq!(target.id(), "u1");
    }

    #[test]
    fn emptied_field_is_dropped_by_replacement() {
        let prior = present("j1", &[("consumer", "c1"), ("rsa_public_key", "pem")]);
        let desired = ResourceData::new().with("consumer", "c2");
        let p = plan(&JwtCredentialResource::schema(), Some(&prior), Some(&desired));
        assert_eq!(p.action, Action::Replace);
        assert!(p.changes.iter().any(|c| c.name == "rsa_public_key"));
        assert_eq!(p.target.as_ref().unwrap().get_str("rsa_public_key"), "");
    }

    #[test]
    fn nothing_to_do_without_either_side() {
        let p = plan(&ConsumerResource::schema(), None, None);
        assert!(p.is_noop());
        assert!(p.changes.is_empty());
    }
}
