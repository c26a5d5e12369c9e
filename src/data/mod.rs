//! Data reading and representation.
//!
//! This module opens netCDF files and captures the parts of their structure
//! the normalizer needs: global attributes, dimensions and variables.

mod dataset;
mod reader;

pub use dataset::{Attr, AttrValue, DatasetInfo, DimensionInfo, ValueKind, VariableInfo};
pub use reader::DataReader;
