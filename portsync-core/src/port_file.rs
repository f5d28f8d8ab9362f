//! One-shot reads of the forwarded-port file.
//!
//! The file is rewritten by an external renewal script, so a read can race
//! with a delete or a half-finished write. A missing file and an empty file
//! are reported as ordinary outcomes rather than errors.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{PortFileError, PortParseError};
use crate::types::PortValue;

/// Result of reading the port file once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortFileRead {
    /// The file does not exist (yet, or any more).
    Missing,
    /// The file exists but holds only whitespace.
    Empty,
    Port(PortValue),
}

/// Read and parse the port file at `path`.
///
/// # Errors
/// [`PortFileError::Io`] for read failures other than "not found", and
/// [`PortFileError::Invalid`] for non-numeric or out-of-range content.
pub fn read_port_file(path: &Path) -> Result<PortFileRead, PortFileError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(PortFileRead::Missing),
        Err(source) => {
            return Err(PortFileError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match raw.parse::<PortValue>() {
        Ok(port) => Ok(PortFileRead::Port(port)),
        Err(PortParseError::Empty) => Ok(PortFileRead::Empty),
        Err(source) => Err(PortFileError::Invalid {
            path: path.to_path_buf(),
            source,
        }),
    }
}
