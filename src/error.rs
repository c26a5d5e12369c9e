//! Error types for cfconvert.
//!
//! This module provides a unified error handling approach using `thiserror`.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for cfconvert operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while converting a file.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The file is not something the netCDF library can read.
    #[error("Unsupported file format: {path}: {reason}")]
    UnsupportedFormat {
        /// Offending file.
        path: PathBuf,
        /// What went wrong while recognising it.
        reason: String,
    },

    /// The destination cannot be written.
    #[error("Cannot write to {path}")]
    WritePermission {
        /// Destination (or its directory).
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Any other failure reported by the netCDF library.
    #[error("NetCDF error: {0}")]
    Library(String),

    /// A variable named on the command line is not in the dataset.
    #[error("Variable not found: {name}")]
    VariableNotFound {
        /// Requested variable name.
        name: String,
    },

    /// A requested variable edit cannot be applied.
    #[error("Invalid edit: {reason}")]
    InvalidEdit {
        /// Why the edit was rejected.
        reason: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ConvertError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an UnsupportedFormat error.
    pub fn unsupported_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a WritePermission error.
    pub fn write_permission(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::WritePermission {
            path: path.into(),
            source,
        }
    }

    /// Create a VariableNotFound error.
    pub fn variable_not_found(name: impl Into<String>) -> Self {
        Self::VariableNotFound { name: name.into() }
    }

    /// Create an InvalidEdit error.
    pub fn invalid_edit(reason: impl Into<String>) -> Self {
        Self::InvalidEdit {
            reason: reason.into(),
        }
    }

    /// Classify an I/O error raised while writing `path`.
    ///
    /// Permission problems become [`ConvertError::WritePermission`], the rest
    /// stay plain I/O errors.
    pub fn from_write(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::write_permission(path, err),
            _ => Self::Io(err),
        }
    }
}

impl From<netcdf::Error> for ConvertError {
    fn from(err: netcdf::Error) -> Self {
        Self::Library(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_is_write_permission() {
        let err = ConvertError::from_write(
            Path::new("/tmp/out.nc"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, ConvertError::WritePermission { .. }));
    }

    #[test]
    fn other_write_errors_stay_io() {
        let err = ConvertError::from_write(
            Path::new("/tmp/out.nc"),
            io::Error::from(io::ErrorKind::UnexpectedEof),
        );
        assert!(matches!(err, ConvertError::Io(_)));
    }

    #[test]
    fn messages_name_the_path() {
        let err = ConvertError::file_not_found("missing.nc");
        assert_eq!(err.to_string(), "File not found: missing.nc");
    }
}
