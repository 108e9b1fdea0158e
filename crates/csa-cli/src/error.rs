//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Contract could not be loaded
    #[error("Error processing file: {0}")]
    Document(#[from] csa_extractor::DocumentError),

    /// Extraction failed (model call, parse or limits)
    #[error("Extraction failed: {0}")]
    Extraction(#[from] csa_extractor::ExtractorError),

    /// Template could not be read or filled
    #[error("Template error: {0}")]
    Template(#[from] csa_template::TemplateError),

    /// Model provider could not be built
    #[error("Model provider error: {0}")]
    Llm(#[from] csa_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Extraction attempted without an upload
    #[error("No contract uploaded. Use 'upload <path>' first.")]
    NoDocument,

    /// Generate attempted without extracted fields
    #[error("No extracted fields. Run 'extract' first.")]
    NoMapping,
}

impl CliError {
    /// The model's reply when the failure was a rejected response
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            CliError::Extraction(e) => e.raw_response(),
            _ => None,
        }
    }
}
