//! CF-1.6 metadata rules.
//!
//! [`plan`] compares a dataset with what CF-1.6 (and any requested variable
//! edits) want and returns the list of [`Change`]s to apply.

mod conventions;
mod plan;

pub use conventions::{
    conventions_status, normalized_conventions, ConventionsStatus, CF_CONVENTIONS,
    CONVENTIONS_ATTR,
};
pub use plan::{plan, Change, VariableEdits};
