//! NetCDF on-disk format detection.
//!
//! The library opens anything it can, so the file signature is checked first
//! to reject non-netCDF input early and to remember which flavour of file has
//! to be written back.

use crate::error::{ConvertError, Result};
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

const CDF_MAGIC: &[u8; 3] = b"CDF";
const HDF5_SIGNATURE: &[u8; 8] = b"\x89HDF\r\n\x1a\n";

/// HDF5 allows a user block in front of the superblock; the signature is then
/// found at 512 and every doubling after it.
const HDF5_FIRST_USER_BLOCK: u64 = 512;

/// Flavour of a netCDF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NcFormat {
    /// CDF-1, the original classic format.
    Classic,
    /// CDF-2, classic with 64-bit offsets.
    Offset64,
    /// CDF-5, classic with 64-bit data.
    Cdf5,
    /// HDF5 based netCDF-4.
    Netcdf4,
}

impl NcFormat {
    /// Whether the file uses the classic (netCDF-3) layout.
    pub fn is_classic(self) -> bool {
        !matches!(self, NcFormat::Netcdf4)
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            NcFormat::Classic => "classic",
            NcFormat::Offset64 => "64-bit offset",
            NcFormat::Cdf5 => "64-bit data",
            NcFormat::Netcdf4 => "netCDF-4",
        }
    }
}

impl fmt::Display for NcFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detect the netCDF flavour of the file at `path` from its signature.
pub fn sniff(path: &Path) -> Result<NcFormat> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::file_not_found(path),
        _ => ConvertError::Io(e),
    })?;

    let mut head = [0u8; 8];
    let n = read_up_to(&mut file, &mut head)?;

    if let Some(format) = classic_version(&head[..n]) {
        return Ok(format);
    }
    if n == head.len() && &head == HDF5_SIGNATURE {
        return Ok(NcFormat::Netcdf4);
    }

    let len = file.metadata()?.len();
    let mut offset = HDF5_FIRST_USER_BLOCK;
    while offset + HDF5_SIGNATURE.len() as u64 <= len {
        file.seek(SeekFrom::Start(offset))?;
        if read_up_to(&mut file, &mut head)? == head.len() && &head == HDF5_SIGNATURE {
            return Ok(NcFormat::Netcdf4);
        }
        offset *= 2;
    }

    Err(ConvertError::unsupported_format(
        path,
        "no netCDF or HDF5 signature found",
    ))
}

fn classic_version(head: &[u8]) -> Option<NcFormat> {
    if head.len() < 4 || &head[..3] != CDF_MAGIC {
        return None;
    }
    match head[3] {
        1 => Some(NcFormat::Classic),
        2 => Some(NcFormat::Offset64),
        5 => Some(NcFormat::Cdf5),
        _ => None,
    }
}

/// Like `read_exact`, but a short file is not an error.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
