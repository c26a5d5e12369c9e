//! Dataset information.

use crate::format::NcFormat;
use std::path::PathBuf;

/// Broad class of a variable's element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `f32` or `f64`.
    Float,
    /// Any signed or unsigned integer type.
    Integer,
    /// `char` or `string`.
    Text,
    /// Compound, enum, opaque or variable-length types.
    Other,
}

/// Attribute value as seen by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrValue {
    /// Display form of the value.
    pub text: String,
    /// Whether the attribute holds a string.
    pub is_text: bool,
}

impl AttrValue {
    /// A string attribute.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            text: value.into(),
            is_text: true,
        }
    }

    /// A non-string attribute, already formatted.
    pub fn other(display: impl Into<String>) -> Self {
        Self {
            text: display.into(),
            is_text: false,
        }
    }

    /// The string content, if this is a string attribute.
    pub fn as_str(&self) -> Option<&str> {
        self.is_text.then_some(self.text.as_str())
    }
}

/// A named attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: AttrValue,
}

/// A dimension of the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionInfo {
    /// Dimension name.
    pub name: String,
    /// Current length.
    pub len: usize,
    /// Whether this is the record dimension.
    pub unlimited: bool,
}

/// A variable of the dataset.
#[derive(Debug, Clone)]
pub struct VariableInfo {
    /// Full path of the variable, without a leading `/`.
    pub name: String,
    /// Dimension names.
    pub dims: Vec<String>,
    /// Shape.
    pub shape: Vec<usize>,
    /// Type name as reported by the library.
    pub dtype: String,
    /// Element type class.
    pub kind: ValueKind,
    /// Attributes in file order.
    pub attributes: Vec<Attr>,
}

impl VariableInfo {
    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        find_attr(&self.attributes, name)
    }

    /// A coordinate variable is one-dimensional and named after its dimension.
    pub fn is_coordinate(&self) -> bool {
        match self.dims.as_slice() {
            [dim] => dim == self.short_name(),
            _ => false,
        }
    }

    /// Name without any group prefix.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// Information about a loaded dataset.
#[derive(Debug, Clone)]
pub struct DatasetInfo {
    /// Path to the source file.
    pub file_path: PathBuf,
    /// On-disk flavour.
    pub format: NcFormat,
    /// Global attributes in file order.
    pub attributes: Vec<Attr>,
    /// Root group dimensions.
    pub dimensions: Vec<DimensionInfo>,
    /// All variables, root group first, then groups depth-first.
    pub variables: Vec<VariableInfo>,
}

impl DatasetInfo {
    /// Create a new, empty dataset info.
    pub fn new(file_path: PathBuf, format: NcFormat) -> Self {
        Self {
            file_path,
            format,
            attributes: Vec::new(),
            dimensions: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// Look up a global attribute by name.
    pub fn global_attribute(&self, name: &str) -> Option<&AttrValue> {
        find_attr(&self.attributes, name)
    }

    /// Look up a variable by path (a leading `/` is ignored).
    pub fn variable(&self, name: &str) -> Option<&VariableInfo> {
        let name = name.trim_start_matches('/');
        self.variables.iter().find(|v| v.name == name)
    }

    /// The variable edits apply to when none is named: the first variable
    /// that is not a coordinate variable, or the first variable at all.
    pub fn default_data_variable(&self) -> Option<&VariableInfo> {
        self.variables
            .iter()
            .find(|v| !v.is_coordinate())
            .or_else(|| self.variables.first())
    }
}

fn find_attr<'a>(attrs: &'a [Attr], name: &str) -> Option<&'a AttrValue> {
    attrs.iter().find(|a| a.name == name).map(|a| &a.value)
}
