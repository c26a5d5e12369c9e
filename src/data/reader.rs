//! NetCDF file reader.

use super::{Attr, AttrValue, DatasetInfo, DimensionInfo, ValueKind, VariableInfo};
use crate::error::{ConvertError, Result};
use crate::format::{self, NcFormat};
use netcdf::types::NcVariableType;
use std::path::Path;
use tracing::{debug, warn};

/// NetCDF data reader.
#[derive(Debug)]
pub struct DataReader;

impl DataReader {
    /// Read the structure and metadata of a netCDF file.
    ///
    /// Fails with [`ConvertError::UnsupportedFormat`] when the signature is not
    /// netCDF or the library refuses to open the file.
    pub fn read_file(path: &Path) -> Result<DatasetInfo> {
        let format = format::sniff(path)?;
        Self::read_netcdf(path, format)
    }

    fn read_netcdf(path: &Path, format: NcFormat) -> Result<DatasetInfo> {
        let file = netcdf::open(path)
            .map_err(|e| ConvertError::unsupported_format(path, e.to_string()))?;

        let mut info = DatasetInfo::new(path.to_path_buf(), format);

        info.attributes = Self::read_attributes(file.attributes());

        for dim in file.dimensions() {
            info.dimensions.push(DimensionInfo {
                name: dim.name().to_string(),
                len: dim.len(),
                unlimited: dim.is_unlimited(),
            });
        }

        for var in file.variables() {
            info.variables.push(Self::read_variable(&var, ""));
        }

        // Classic files have no groups and report an error here
        if let Ok(groups) = file.groups() {
            for group in groups {
                Self::read_group(&group, "", &mut info.variables);
            }
        }

        debug!(
            path = %path.display(),
            %format,
            attributes = info.attributes.len(),
            variables = info.variables.len(),
            "read dataset"
        );
        Ok(info)
    }

    fn read_group(group: &netcdf::Group<'_>, parent_path: &str, out: &mut Vec<VariableInfo>) {
        let group_path = if parent_path.is_empty() {
            group.name().to_string()
        } else {
            format!("{}/{}", parent_path, group.name())
        };

        for var in group.variables() {
            out.push(Self::read_variable(&var, &group_path));
        }

        for child_group in group.groups() {
            Self::read_group(&child_group, &group_path, out);
        }
    }

    fn read_variable(var: &netcdf::Variable<'_>, parent_path: &str) -> VariableInfo {
        let var_name = var.name().to_string();
        let name = if parent_path.is_empty() {
            var_name
        } else {
            format!("{}/{}", parent_path, var_name)
        };

        let vartype = var.vartype();
        VariableInfo {
            name,
            dims: var.dimensions().iter().map(|d| d.name().to_string()).collect(),
            shape: var.dimensions().iter().map(|d| d.len()).collect(),
            dtype: format!("{:?}", vartype).to_lowercase(),
            kind: value_kind(&vartype),
            attributes: Self::read_attributes(var.attributes()),
        }
    }

    fn read_attributes<'a>(attrs: impl Iterator<Item = netcdf::Attribute<'a>>) -> Vec<Attr> {
        attrs
            .map(|attr| Attr {
                name: attr.name().to_string(),
                value: Self::attr_value(&attr),
            })
            .collect()
    }

    fn attr_value(attr: &netcdf::Attribute<'_>) -> AttrValue {
        use netcdf::AttributeValue;

        match attr.value() {
            Ok(AttributeValue::Str(v)) => AttrValue::text(v),
            Ok(AttributeValue::Strs(v)) => AttrValue::text(v.join(", ")),
            Ok(AttributeValue::Uchar(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Schar(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Ushort(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Short(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Uint(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Int(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Ulonglong(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Longlong(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Float(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Double(v)) => AttrValue::other(v.to_string()),
            Ok(AttributeValue::Uchars(v)) => AttrValue::other(format!("{:?}", v)),
            Ok(AttributeValue::Schars(v)) => AttrValue::other(format!("{:?}", v)),
            Ok(AttributeValue::Ushorts(v)) => AttrValue::other(format!("{:?}", v)),
            Ok(AttributeValue::Shorts(v)) => AttrValue::other(format!("{:?}", v)),
            Ok(AttributeValue::Uints(v)) => AttrValue::other(format!("{:?}", v)),
            Ok(AttributeValue::Ints(v)) => AttrValue::other(format!("{:?}", v)),
            Ok(AttributeValue::Ulonglongs(v)) => AttrValue::other(format!("{:?}", v)),
            Ok(AttributeValue::Longlongs(v)) => AttrValue::other(format!("{:?}", v)),
            Ok(AttributeValue::Floats(v)) => AttrValue::other(format!("{:?}", v)),
            Ok(AttributeValue::Doubles(v)) => AttrValue::other(format!("{:?}", v)),
            Err(e) => undecodable(&attr.name(), format!("{:?}", attr), &e),
        }
    }
}

/// An attribute whose value the library cannot hand back is kept as its
/// debug text, which never counts as a textual value.
fn undecodable(name: &str, raw: String, err: &impl std::fmt::Display) -> AttrValue {
    warn!(attribute = %name, error = %err, "cannot decode attribute value, treating it as non-text");
    AttrValue::other(raw)
}

fn value_kind(vartype: &NcVariableType) -> ValueKind {
    match vartype {
        NcVariableType::Float(_) => ValueKind::Float,
        NcVariableType::Int(_) => ValueKind::Integer,
        NcVariableType::Char | NcVariableType::String => ValueKind::Text,
        _ => ValueKind::Other,
    }
}
