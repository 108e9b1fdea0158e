//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// Trait for language-model provider operations
///
/// Implemented by the infrastructure layer (csa-llm). The contract is only
/// "prompt in, text out, or an error": providers make no promise about the
/// shape of the returned text, so callers must handle arbitrary output.
pub trait LlmProvider {
    /// Error type for provider operations
    type Error;

    /// Human-readable model identifier, used in logs and metadata
    fn model_name(&self) -> &str;

    /// Generate a text completion for a prompt
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
