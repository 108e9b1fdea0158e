//! CSA Extractor
//!
//! Turns a negotiated contract (PDF or DOCX) into a field mapping with a
//! single language-model call.
//!
//! # Architecture
//!
//! ```text
//! Upload → text → prompt → LLM → reply → parser → FieldMapping
//! ```
//!
//! The model's reply is untrusted: it is accepted only if it parses as a
//! mapping under strict JSON or the permissive literal dialect, and it is
//! never repaired.
//!
//! # Example Usage
//!
//! ```no_run
//! use csa_extractor::{ContractDocument, Extractor, ExtractorConfig};
//! use csa_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"Supplier Name": "Acme Corp"}"#);
//! let extractor = Extractor::new(llm, ExtractorConfig::default())?;
//!
//! let contract = ContractDocument::open("contract.pdf")?;
//! let outcome = extractor.extract_document(&contract).await?;
//!
//! println!("Extracted {} fields", outcome.mapping.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod document;
mod error;
mod extractor;
pub mod literal;
mod parser;
mod prompt;
mod types;


pub use config::ExtractorConfig;
pub use document::{ContractDocument, DocumentKind, DOCX_BODY_PART};
pub use error::{DocumentError, ExtractorError};
pub use extractor::Extractor;
pub use parser::{parse_response, ParseFailure, ParseFailureReason, ParseStrategy, ParsedResponse};
pub use prompt::PromptBuilder;
pub use types::{ExtractionMetadata, ExtractionOutcome};
