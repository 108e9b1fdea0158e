//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::document::ContractDocument;
use crate::error::ExtractorError;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::types::{ExtractionMetadata, ExtractionOutcome};
use csa_domain::traits::LlmProvider;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Extractor turns contract text into a field mapping with one model call
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: std::fmt::Display,
{
    /// Create a new Extractor
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self {
            llm_provider,
            config,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract fields from an uploaded contract
    pub async fn extract_document(
        &self,
        document: &ContractDocument,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        info!(
            "Extracting text from '{}' ({} bytes)",
            document.name(),
            document.size()
        );
        let text = document.extract_text()?;
        self.extract_text(document.name(), &text).await
    }

    /// Extract fields from contract text
    pub async fn extract_text(
        &self,
        source_name: &str,
        text: &str,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        let text_chars = text.chars().count();
        if text_chars > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                text_chars,
                self.config.max_text_length,
            ));
        }

        let start_time = Instant::now();
        let prompt = PromptBuilder::new(text).build();
        debug!("Prompt length: {} chars", prompt.len());

        info!(
            "Requesting field extraction from model '{}'",
            self.llm_provider.model_name()
        );
        let raw_response = timeout(
            self.config.extraction_timeout(),
            self.llm_provider.generate(&prompt),
        )
        .await
        .map_err(|_| ExtractorError::Timeout(self.config.extraction_timeout()))?
        .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("LLM response length: {} chars", raw_response.len());

        let parsed = parse_response(&raw_response).inspect_err(|failure| {
            warn!("Model response rejected: {}", failure);
        })?;

        info!(
            "Parsed {} fields ({} present) using {} parse",
            parsed.mapping.len(),
            parsed.mapping.present_count(),
            parsed.strategy
        );

        let metadata = ExtractionMetadata {
            source_name: source_name.to_string(),
            model_name: self.llm_provider.model_name().to_string(),
            strategy: parsed.strategy,
            text_chars,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        Ok(ExtractionOutcome {
            mapping: parsed.mapping,
            raw_response,
            metadata,
        })
    }
}
