//! Step planning, validation, and wizard navigation

mod planner;
mod validation;
mod wizard;

pub use planner::{path_kind, plan, PathKind, Step, FUTURE_PLAN, HISTORY_PLAN};
pub use validation::{borrower_guard_error, validate, FieldErrors};
pub use wizard::{ErrorMap, Transition, Wizard, WizardCommand};
