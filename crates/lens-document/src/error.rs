//! Error types for loading vault documents.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when loading a document and its structure.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document could not be read from disk.
    #[error("failed to read document {path}: {source}")]
    ReadFile {
        /// Path to the document.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The document's extension is not one the vault can structure.
    #[error("unsupported document type '{extension}': {path}")]
    UnsupportedFileType {
        /// Path to the document.
        path: PathBuf,
        /// The rejected extension (empty when the file has none).
        extension: String,
    },
}
