//! cfconvert - make netCDF files declare the CF-1.6 metadata convention.
//!
//! cfconvert opens a netCDF file, sets the global `Conventions` attribute to
//! `CF-1.6` (keeping any other conventions it lists), optionally fixes the
//! `units`, `long_name` or scaling of one data variable, and saves the result
//! in place or to a new path. Everything else in the file is left as it was.
//!
//! # Features
//!
//! - Classic, 64-bit offset, 64-bit data and netCDF-4 files
//! - Idempotent: a file that already declares CF-1.6 is not touched
//! - Atomic replacement of the destination
//! - Dry runs listing the planned changes
//!
//! # Example
//!
//! ```ignore
//! use cfconvert::{NormalizeOptions, Normalizer, Outcome};
//! use std::path::Path;
//!
//! let normalizer = Normalizer::new(NormalizeOptions::default());
//! match normalizer.convert(Path::new("apcp.nc"), Some(Path::new("apcp_cf1.nc")))? {
//!     Outcome::Rewritten { changes, .. } => println!("{} changes", changes.len()),
//!     other => println!("{:?}", other),
//! }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod cf;
pub mod data;
pub mod error;
pub mod format;
pub mod normalizer;
pub mod writer;

pub use cf::{Change, VariableEdits, CF_CONVENTIONS};
pub use error::{ConvertError, Result};
pub use format::NcFormat;
pub use normalizer::{convert, NormalizeOptions, Normalizer, Outcome};
