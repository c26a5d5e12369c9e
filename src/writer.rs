//! Applying planned changes to a netCDF file.
//!
//! The file is opened in append mode and edited where it lies. Attributes are
//! written in define mode; leaving define mode
//! lets the library move the data section if the header grew, so data bytes
//! are carried over unchanged.

use crate::cf::Change;
use crate::error::{ConvertError, Result};
use crate::format::NcFormat;
use netcdf::types::{FloatType, NcVariableType};
use netcdf::AttributeValue;
use std::path::Path;
use tracing::debug;

/// Default fill values of netCDF-C (`NC_FILL_FLOAT`, `NC_FILL_DOUBLE`).
const NC_FILL_DOUBLE: f64 = 9.969_209_968_386_869e36;
const NC_FILL_FLOAT: f32 = NC_FILL_DOUBLE as f32;

/// Apply `changes` to the netCDF file at `path`.
pub fn apply_changes(path: &Path, format: NcFormat, changes: &[Change]) -> Result<()> {
    let mut file = netcdf::append(path)?;

    let (scales, attrs): (Vec<&Change>, Vec<&Change>) = changes
        .iter()
        .partition(|c| matches!(c, Change::ScaleVariable { .. }));

    // Classic files and netCDF-4 files using the classic model both refuse
    // new attributes outside define mode; the signature cannot tell the
    // latter apart, so every format goes through redef/enddef.
    if !attrs.is_empty() {
        file.redef()?;
        debug!(format = %format, classic = format.is_classic(), "entered define mode");
        for change in attrs {
            put_attribute(&mut file, change)?;
        }
        file.enddef()?;
    }

    for change in scales {
        if let Change::ScaleVariable { variable, factor } = change {
            let mut var = file
                .variable_mut(variable)
                .ok_or_else(|| ConvertError::variable_not_found(variable.as_str()))?;
            scale_variable(&mut var, *factor)?;
            debug!(variable = %variable, factor, "scaled variable");
        }
    }

    // Dropping the handle closes the file and flushes it to disk
    drop(file);
    Ok(())
}

fn put_attribute(file: &mut netcdf::FileMut, change: &Change) -> Result<()> {
    match change {
        Change::SetGlobalAttribute { name, new, .. } => {
            file.add_attribute(name, new.as_str())?;
            debug!(attribute = %name, value = %new, "set global attribute");
        }
        Change::SetVariableAttribute {
            variable,
            name,
            new,
            ..
        } => {
            let mut var = file
                .variable_mut(variable)
                .ok_or_else(|| ConvertError::variable_not_found(variable.as_str()))?;
            var.put_attribute(name, new.as_str())?;
            debug!(variable = %variable, attribute = %name, value = %new, "set variable attribute");
        }
        Change::ScaleVariable { .. } => {}
    }
    Ok(())
}

fn scale_variable(var: &mut netcdf::VariableMut<'_>, factor: f64) -> Result<()> {
    let skip: Vec<AttributeValue> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| var.attribute(name).and_then(|a| a.value().ok()))
        .collect();

    match var.vartype() {
        NcVariableType::Float(FloatType::F32) => {
            let mut values: Vec<f32> = var.get_values(..)?;
            let mut sentinels: Vec<f32> = skip.iter().filter_map(as_f32).collect();
            if sentinels.is_empty() {
                sentinels.push(NC_FILL_FLOAT);
            }
            scale_values(&mut values, factor, &sentinels);
            var.put_values(&values, ..)?;
        }
        NcVariableType::Float(FloatType::F64) => {
            let mut values: Vec<f64> = var.get_values(..)?;
            let mut sentinels: Vec<f64> = skip.iter().filter_map(as_f64).collect();
            if sentinels.is_empty() {
                sentinels.push(NC_FILL_DOUBLE);
            }
            scale_values(&mut values, factor, &sentinels);
            var.put_values(&values, ..)?;
        }
        other => {
            return Err(ConvertError::invalid_edit(format!(
                "cannot scale variable of type {:?}",
                other
            )))
        }
    }
    Ok(())
}

/// Floating point element that can be multiplied by an `f64` factor.
pub(crate) trait Scalable: Copy + PartialEq {
    fn scaled(self, factor: f64) -> Self;
    fn is_nan(self) -> bool;
}

impl Scalable for f32 {
    fn scaled(self, factor: f64) -> Self {
        (self as f64 * factor) as f32
    }

    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }
}

impl Scalable for f64 {
    fn scaled(self, factor: f64) -> Self {
        self * factor
    }

    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }
}

/// Multiply every value except NaN and the `sentinels` (fill and missing
/// values) by `factor`.
pub(crate) fn scale_values<T: Scalable>(values: &mut [T], factor: f64, sentinels: &[T]) {
    for v in values.iter_mut() {
        if v.is_nan() || sentinels.contains(v) {
            continue;
        }
        *v = v.scaled(factor);
    }
}

fn as_f32(value: &AttributeValue) -> Option<f32> {
    match value {
        AttributeValue::Float(v) => Some(*v),
        AttributeValue::Double(v) => Some(*v as f32),
        AttributeValue::Floats(v) => v.first().copied(),
        _ => None,
    }
}

fn as_f64(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Double(v) => Some(*v),
        AttributeValue::Float(v) => Some(*v as f64),
        AttributeValue::Doubles(v) => v.first().copied(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_valid_values_only() {
        let mut values = vec![1.0f32, -999.0, f32::NAN, 2.5];
        scale_values(&mut values, 2.0, &[-999.0]);
        assert_eq!(values[0], 2.0);
        assert_eq!(values[1], -999.0);
        assert!(values[2].is_nan());
        assert_eq!(values[3], 5.0);
    }

    #[test]
    fn default_fill_is_left_alone() {
        let mut values = vec![NC_FILL_DOUBLE, 0.5];
        scale_values(&mut values, 3600.0, &[NC_FILL_DOUBLE]);
        assert_eq!(values, vec![NC_FILL_DOUBLE, 1800.0]);
    }

    #[test]
    fn fill_value_attribute_converts() {
        assert_eq!(as_f32(&AttributeValue::Double(-1.0)), Some(-1.0));
        assert_eq!(as_f64(&AttributeValue::Float(0.5)), Some(0.5));
        assert_eq!(as_f64(&AttributeValue::Str("x".into())), None);
    }
}
