//! Error types for document storage.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::FormatError;

/// Errors that can occur when reading or writing documents on disk.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error when reading/writing a document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid document
    #[error("{0}")]
    Format(#[from] FormatError),

    /// No document at the given path
    #[error("Document not found: {path:?}")]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The path does not name a `.excalidraw` file
    #[error("Not an .excalidraw file: {path:?}")]
    UnsupportedFile {
        /// Rejected path
        path: PathBuf,
    },

    /// The session has no open document
    #[error("No document is open")]
    NoDocument,
}
