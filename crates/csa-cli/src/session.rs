//! Interactive session state.
//!
//! One session walks a single contract through upload, extract, review and
//! generate. The extracted mapping lives here and nowhere else: a new upload
//! clears it, a failed extraction leaves none, and generate is refused until
//! one exists.

use crate::error::{CliError, Result};
use crate::generator::{GeneratedForm, Generator};
use csa_domain::traits::LlmProvider;
use csa_domain::FieldMapping;
use csa_extractor::{ContractDocument, ExtractionOutcome, Extractor};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Where the session is in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing uploaded
    Empty,
    /// Contract uploaded, no fields yet
    Uploaded,
    /// Fields extracted; generate is available
    Extracted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Empty => f.write_str("no contract"),
            Stage::Uploaded => f.write_str("uploaded"),
            Stage::Extracted => f.write_str("extracted"),
        }
    }
}

/// Explicit session context.
#[derive(Debug, Default)]
pub struct Session {
    document: Option<ContractDocument>,
    outcome: Option<ExtractionOutcome>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        match (&self.document, &self.outcome) {
            (None, _) => Stage::Empty,
            (Some(_), None) => Stage::Uploaded,
            (Some(_), Some(_)) => Stage::Extracted,
        }
    }

    /// Accept a contract, discarding any fields from a previous one.
    pub fn upload(&mut self, document: ContractDocument) {
        info!("Uploaded '{}'", document.name());
        self.document = Some(document);
        self.outcome = None;
    }

    /// Load a contract from disk and upload it.
    ///
    /// On failure the session is unchanged.
    pub fn upload_path(&mut self, path: &Path) -> Result<&ContractDocument> {
        let document = ContractDocument::open(path)?;
        self.upload(document);
        self.document.as_ref().ok_or(CliError::NoDocument)
    }

    /// The uploaded contract.
    pub fn document(&self) -> Option<&ContractDocument> {
        self.document.as_ref()
    }

    /// The last successful extraction.
    pub fn outcome(&self) -> Option<&ExtractionOutcome> {
        self.outcome.as_ref()
    }

    /// The extracted fields.
    pub fn mapping(&self) -> Option<&FieldMapping> {
        self.outcome.as_ref().map(|outcome| &outcome.mapping)
    }

    /// Run extraction on the uploaded contract.
    ///
    /// Any previous mapping is dropped first, so a failure leaves the session
    /// without one.
    pub async fn extract<L>(&mut self, extractor: &Extractor<L>) -> Result<&ExtractionOutcome>
    where
        L: LlmProvider,
        L::Error: fmt::Display,
    {
        let document = self.document.as_ref().ok_or(CliError::NoDocument)?;
        self.outcome = None;

        let outcome = extractor.extract_document(document).await?;
        Ok(&*self.outcome.insert(outcome))
    }

    /// Fill the template from the extracted fields.
    ///
    /// Failures leave the session as it was, so generate can be retried.
    pub fn generate(&self, generator: &Generator, output: Option<&Path>) -> Result<GeneratedForm> {
        let mapping = self.mapping().ok_or(CliError::NoMapping)?;
        generator.generate(mapping, output)
    }
}
