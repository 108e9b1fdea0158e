//! Error types for template filling

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or filling a template
#[derive(Error, Debug)]
pub enum TemplateError {
    /// Template file could not be read
    #[error("Failed to read template {path}: {source}")]
    Read {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Filled document could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Template is not a readable zip archive
    #[error("Template is not a valid DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Archive lacks the main document part
    #[error("Template has no {0} part")]
    MissingPart(&'static str),

    /// Document part is not well-formed XML
    #[error("Malformed document XML: {0}")]
    Xml(String),

    /// Archive I/O while rebuilding the document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
