//! Trace document serialization using `MessagePack`.
//!
//! This module provides functions for saving and loading trace documents
//! to/from files using the `MessagePack` binary format.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use steptrace_foundation::{Error, ErrorContext, Result, TraceDocument};

/// Serializes a document to bytes using `MessagePack` format.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(doc: &TraceDocument) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(doc).map_err(|e| Error::serialization(e.to_string()))
}

/// Deserializes a document from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if deserialization fails.
pub fn from_bytes(bytes: &[u8]) -> Result<TraceDocument> {
    rmp_serde::from_slice(bytes).map_err(|e| Error::serialization(e.to_string()))
}

/// Saves a document to a file using `MessagePack` format.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to,
/// or if serialization fails.
pub fn save_to_file<P: AsRef<Path>>(doc: &TraceDocument, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|e| io_error(path, &format!("failed to create file: {e}")))?;

    let mut writer = BufWriter::new(file);
    let bytes = to_bytes(doc)?;

    writer
        .write_all(&bytes)
        .map_err(|e| io_error(path, &format!("failed to write: {e}")))?;
    writer
        .flush()
        .map_err(|e| io_error(path, &format!("failed to flush: {e}")))?;

    Ok(())
}

/// Loads a document from a `MessagePack` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or if deserialization fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<TraceDocument> {
    let path = path.as_ref();
    let file =
        File::open(path).map_err(|e| io_error(path, &format!("failed to open file: {e}")))?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_error(path, &format!("failed to read: {e}")))?;

    from_bytes(&bytes).map_err(|e| e.with_context(path_context(path)))
}

fn io_error(path: &Path, message: &str) -> Error {
    Error::io(message).with_context(path_context(path))
}

fn path_context(path: &Path) -> ErrorContext {
    ErrorContext::new().with_path(path.display().to_string())
}
