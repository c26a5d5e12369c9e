//! The metadata normalizer: open, plan, apply, persist.

use crate::cf::{self, Change, VariableEdits};
use crate::data::{DataReader, DatasetInfo};
use crate::error::{ConvertError, Result};
use crate::writer;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options controlling a conversion.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOptions {
    /// Metadata fixes for one data variable.
    pub edits: VariableEdits,
    /// Report the planned changes without writing anything.
    pub dry_run: bool,
}

/// What a conversion did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The file already carried the wanted metadata; nothing was written.
    Unchanged {
        /// The file that was checked.
        path: PathBuf,
    },
    /// Nothing needed changing; the source was copied verbatim.
    Copied {
        /// Destination written.
        path: PathBuf,
    },
    /// The changes were applied and the result saved.
    Rewritten {
        /// Destination written.
        path: PathBuf,
        /// Changes applied, in order.
        changes: Vec<Change>,
    },
    /// Dry run: the changes that would have been applied.
    Planned {
        /// Destination that would have been written.
        path: PathBuf,
        /// Changes that would be applied.
        changes: Vec<Change>,
    },
}

impl Outcome {
    /// The changes applied or planned.
    pub fn changes(&self) -> &[Change] {
        match self {
            Outcome::Rewritten { changes, .. } | Outcome::Planned { changes, .. } => changes,
            Outcome::Unchanged { .. } | Outcome::Copied { .. } => &[],
        }
    }
}

/// Makes netCDF files declare CF-1.6.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: NormalizeOptions,
}

impl Normalizer {
    /// Create a normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    /// Inspect `input` and list the changes a conversion would make.
    pub fn plan(&self, input: &Path) -> Result<(DatasetInfo, Vec<Change>)> {
        check_source(input)?;
        let info = DataReader::read_file(input)?;
        let changes = cf::plan(&info, &self.options.edits)?;
        Ok((info, changes))
    }

    /// Convert `input`, writing to `output` or back to `input` when `None`.
    ///
    /// The destination is only replaced once the converted file is complete;
    /// on any error it is left as it was.
    pub fn convert(&self, input: &Path, output: Option<&Path>) -> Result<Outcome> {
        let dest = output.unwrap_or(input);
        info!(input = %input.display(), output = %dest.display(), "converting");

        let (info, changes) = self.plan(input)?;
        debug!(format = %info.format, changes = changes.len(), "planned");

        if self.options.dry_run {
            return Ok(Outcome::Planned {
                path: dest.to_path_buf(),
                changes,
            });
        }

        let in_place = output.is_none() || same_file(input, dest);
        if changes.is_empty() && in_place {
            info!(path = %dest.display(), "already CF-1.6, nothing to do");
            return Ok(Outcome::Unchanged {
                path: dest.to_path_buf(),
            });
        }

        check_destination(dest)?;

        let staged = stage_copy(input, dest)?;
        if !changes.is_empty() {
            writer::apply_changes(&staged, info.format, &changes)?;
        }
        let permissions = fs::metadata(input)?.permissions();
        fs::set_permissions(&staged, permissions)?;
        staged
            .persist(dest)
            .map_err(|e| ConvertError::from_write(dest, e.error))?;

        if changes.is_empty() {
            info!(path = %dest.display(), "copied unchanged");
            Ok(Outcome::Copied {
                path: dest.to_path_buf(),
            })
        } else {
            for change in &changes {
                info!(%change, "applied");
            }
            Ok(Outcome::Rewritten {
                path: dest.to_path_buf(),
                changes,
            })
        }
    }
}

/// Convert one file with default options.
pub fn convert(input: &Path, output: Option<&Path>) -> Result<Outcome> {
    Normalizer::default().convert(input, output)
}

fn check_source(input: &Path) -> Result<()> {
    let meta = fs::metadata(input).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::file_not_found(input),
        _ => ConvertError::Io(e),
    })?;
    if !meta.is_file() {
        return Err(ConvertError::unsupported_format(input, "not a regular file"));
    }
    Ok(())
}

fn check_destination(dest: &Path) -> Result<()> {
    match fs::metadata(dest) {
        Ok(meta) if meta.is_dir() => Err(ConvertError::Io(io::Error::new(
            io::ErrorKind::Other,
            format!("destination {} is a directory", dest.display()),
        ))),
        Ok(meta) if meta.permissions().readonly() => Err(ConvertError::write_permission(
            dest,
            io::Error::new(io::ErrorKind::PermissionDenied, "destination is read-only"),
        )),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConvertError::Io(e)),
    }
}

/// Copy `input` into a temporary file beside `dest`, so the final rename
/// stays on one file system.
fn stage_copy(input: &Path, dest: &Path) -> Result<tempfile::TempPath> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".cfconvert-")
        .suffix(".nc.tmp")
        .tempfile_in(dir)
        .map_err(|e| ConvertError::from_write(dir, e))?;

    let bytes = io::copy(&mut File::open(input)?, staged.as_file_mut())
        .map_err(|e| ConvertError::from_write(staged.path(), e))?;
    staged.as_file().sync_all()?;
    debug!(path = %staged.path().display(), bytes, "staged copy");

    Ok(staged.into_temp_path())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
