//! Reconciler: generic lifecycle engine over entity adapters.

pub mod plan;
mod reconcile;
mod validation;
pub use plan::{Action, FieldChange, Plan};
pub use reconcile::Reconciler;
pub use validation::StateValidator;
