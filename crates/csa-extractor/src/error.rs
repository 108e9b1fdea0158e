//! Error types for the Extractor

use crate::parser::ParseFailure;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while turning an uploaded file into text
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Extension is neither `.pdf` nor `.docx`
    #[error("Unsupported file type '{0}' (expected .pdf or .docx)")]
    UnsupportedType(String),

    /// Could not read the upload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The DOCX container is not a readable zip archive
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// `word/document.xml` is missing or malformed
    #[error("DOCX content error: {0}")]
    Docx(String),

    /// The PDF could not be decoded
    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Upload could not be turned into text
    #[error("Error processing file: {0}")]
    Document(#[from] DocumentError),

    /// LLM provider error, message as reported by the provider
    #[error("{0}")]
    Llm(String),

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// No reply within the configured bound
    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),

    /// The model's reply is not a field mapping
    #[error("Error parsing model response: {0}")]
    Parse(#[from] ParseFailure),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// The model's raw reply, when the failure happened after one arrived
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            ExtractorError::Parse(failure) => Some(failure.raw()),
            _ => None,
        }
    }
}
