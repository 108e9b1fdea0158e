//! Result types for extraction

use crate::parser::ParseStrategy;
use csa_domain::FieldMapping;

/// Result of a successful extraction
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    /// Extracted fields
    pub mapping: FieldMapping,

    /// The model's reply exactly as received, for display
    pub raw_response: String,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

/// Metadata about an extraction
#[derive(Debug, Clone)]
pub struct ExtractionMetadata {
    /// Upload name, or a caller-supplied label for raw text
    pub source_name: String,

    /// Model that produced the reply
    pub model_name: String,

    /// Parse strategy that accepted the reply
    pub strategy: ParseStrategy,

    /// Characters of contract text sent to the model
    pub text_chars: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
