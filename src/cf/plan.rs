//! Planning the changes a conversion makes.

use super::conventions::{
    conventions_status, normalized_conventions, ConventionsStatus, CF_CONVENTIONS,
    CONVENTIONS_ATTR,
};
use crate::data::{DatasetInfo, ValueKind, VariableInfo};
use crate::error::{ConvertError, Result};
use std::fmt;
use tracing::{debug, warn};

/// Optional metadata fixes for one data variable.
///
/// Nothing is touched unless a field is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableEdits {
    /// Variable to edit; defaults to the first data variable.
    pub variable: Option<String>,
    /// New `units` attribute.
    pub units: Option<String>,
    /// New `long_name` attribute.
    pub long_name: Option<String>,
    /// Multiply the data by this factor. `0` and `1` disable scaling.
    pub factor: Option<f64>,
}

impl VariableEdits {
    /// Whether any edit is requested.
    pub fn is_empty(&self) -> bool {
        self.units.is_none() && self.long_name.is_none() && self.effective_factor().is_none()
    }

    /// The factor to apply, if it changes anything.
    pub fn effective_factor(&self) -> Option<f64> {
        self.factor.filter(|&f| f != 0.0 && f != 1.0)
    }
}

/// One mutation applied to the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Create or overwrite a global string attribute.
    SetGlobalAttribute {
        /// Attribute name.
        name: String,
        /// Previous value, if any.
        old: Option<String>,
        /// Value written.
        new: String,
    },
    /// Create or overwrite a string attribute of a variable.
    SetVariableAttribute {
        /// Variable path.
        variable: String,
        /// Attribute name.
        name: String,
        /// Previous value, if any.
        old: Option<String>,
        /// Value written.
        new: String,
    },
    /// Multiply every valid value of a variable.
    ScaleVariable {
        /// Variable path.
        variable: String,
        /// Multiplier.
        factor: f64,
    },
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::SetGlobalAttribute { name, old, new } => match old {
                Some(old) => write!(f, ":{} {:?} -> {:?}", name, old, new),
                None => write!(f, ":{} = {:?}", name, new),
            },
            Change::SetVariableAttribute {
                variable,
                name,
                old,
                new,
            } => match old {
                Some(old) => write!(f, "{}:{} {:?} -> {:?}", variable, name, old, new),
                None => write!(f, "{}:{} = {:?}", variable, name, new),
            },
            Change::ScaleVariable { variable, factor } => {
                write!(f, "{} *= {}", variable, factor)
            }
        }
    }
}

/// Work out what a conversion of `info` has to change.
///
/// An empty result means the file already has the wanted metadata.
pub fn plan(info: &DatasetInfo, edits: &VariableEdits) -> Result<Vec<Change>> {
    let mut changes = Vec::new();

    match conventions_status(info.global_attribute(CONVENTIONS_ATTR)) {
        ConventionsStatus::Conforming => {
            debug!("{} already lists {}", CONVENTIONS_ATTR, CF_CONVENTIONS);
        }
        ConventionsStatus::Missing => changes.push(Change::SetGlobalAttribute {
            name: CONVENTIONS_ATTR.to_string(),
            old: None,
            new: CF_CONVENTIONS.to_string(),
        }),
        ConventionsStatus::NonConforming(old) => changes.push(Change::SetGlobalAttribute {
            name: CONVENTIONS_ATTR.to_string(),
            new: normalized_conventions(&old),
            old: Some(old),
        }),
    }

    if edits.is_empty() {
        if let Some(name) = &edits.variable {
            warn!(variable = %name, "variable selected without any edit; ignoring");
        }
        return Ok(changes);
    }

    let var = target_variable(info, edits)?;
    debug!(variable = %var.name, "editing variable");

    if let Some(units) = &edits.units {
        push_attr_change(&mut changes, var, "units", units);
    }
    if let Some(long_name) = &edits.long_name {
        push_attr_change(&mut changes, var, "long_name", long_name);
    }
    if let Some(factor) = edits.effective_factor() {
        check_factor(var, factor)?;
        changes.push(Change::ScaleVariable {
            variable: var.name.clone(),
            factor,
        });
    }

    Ok(changes)
}

fn target_variable<'a>(info: &'a DatasetInfo, edits: &VariableEdits) -> Result<&'a VariableInfo> {
    match &edits.variable {
        Some(name) => info
            .variable(name)
            .ok_or_else(|| ConvertError::variable_not_found(name.as_str())),
        None => info
            .default_data_variable()
            .ok_or_else(|| ConvertError::variable_not_found("<first data variable>")),
    }
}

fn push_attr_change(changes: &mut Vec<Change>, var: &VariableInfo, name: &str, new: &str) {
    let old = var.attribute(name);
    if old.and_then(|v| v.as_str()) == Some(new) {
        debug!(variable = %var.name, attribute = name, "already set");
        return;
    }
    changes.push(Change::SetVariableAttribute {
        variable: var.name.clone(),
        name: name.to_string(),
        old: old.map(|v| v.text.clone()),
        new: new.to_string(),
    });
}

fn check_factor(var: &VariableInfo, factor: f64) -> Result<()> {
    if !factor.is_finite() {
        return Err(ConvertError::invalid_edit(format!(
            "scale factor must be finite, got {}",
            factor
        )));
    }
    if var.kind != ValueKind::Float {
        return Err(ConvertError::invalid_edit(format!(
            "cannot scale '{}' of type {} in place; only float variables can be scaled",
            var.name, var.dtype
        )));
    }
    Ok(())
}
