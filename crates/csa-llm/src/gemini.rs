//! Gemini Provider Implementation
//!
//! Talks to Google's Generative Language REST API (`generateContent`) with an
//! API key passed as the `key` query parameter.
//!
//! # Behavior
//!
//! - One request per call; there is no retry
//! - Requests are bounded by a client-side timeout
//! - Any status other than 200 becomes [`LlmError::Api`] carrying the status
//!   code and the body verbatim
//!
//! # Examples
//!
//! ```no_run
//! use csa_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::builder("my-api-key")
//!     .model("models/gemini-1.5-flash")
//!     .build()
//!     .unwrap();
//! ```

use crate::LlmError;
use csa_domain::traits::LlmProvider as LlmProviderTrait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Generative Language API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1";

/// Default model resource name
pub const DEFAULT_MODEL: &str = "models/gemini-1.5-flash";

/// Default timeout for a generation request (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini API provider
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
    client: reqwest::Client,
}

/// Builder for [`GeminiProvider`]
#[derive(Debug, Clone)]
pub struct GeminiProviderBuilder {
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`
    fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

impl GeminiProviderBuilder {
    /// Override the API base URL (no trailing `:generateContent`)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model resource name, e.g. `models/gemini-1.5-flash`
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Bound on a single request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the provider
    pub fn build(self) -> Result<GeminiProvider, LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::Configuration("API key is empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(LlmError::Configuration(
                "timeout must be greater than 0".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(GeminiProvider {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            model: self.model,
            api_key: self.api_key.trim().to_string(),
            timeout: self.timeout,
            client,
        })
    }
}

impl GeminiProvider {
    /// Start building a provider for the given API key
    pub fn builder(api_key: impl Into<String>) -> GeminiProviderBuilder {
        GeminiProviderBuilder {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Full `generateContent` URL, without the key
    pub fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }

    /// Send one generation request
    ///
    /// # Errors
    ///
    /// - [`LlmError::Api`] for any non-200 status
    /// - [`LlmError::Timeout`] when the request exceeds the configured bound
    /// - [`LlmError::Communication`] when no response arrives
    /// - [`LlmError::InvalidResponse`] when a 200 body lacks generated text
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_chars = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.without_url().to_string()))?;

        let text = parsed.into_first_text().ok_or_else(|| {
            LlmError::InvalidResponse("missing candidates[0].content.parts[0].text".to_string())
        })?;

        debug!(response_chars = text.len(), "Received generated text");
        Ok(text.trim().to_string())
    }

    // The request URL carries the key, so it is stripped from error messages.
    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout(self.timeout)
        } else {
            LlmError::Communication(format!("Request failed: {}", e.without_url()))
        }
    }
}

impl LlmProviderTrait for GeminiProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        GeminiProvider::generate(self, prompt).await
    }
}
