//! Language-model collaborator
//!
//! Extraction talks to the model only through [`LanguageModel`]; the
//! production implementation is [`OpenAiClient`].

pub mod openai;

use thiserror::Error;

pub use openai::OpenAiClient;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One chat-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub user: String,
    /// `None` leaves sampling at the provider default
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(model: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            user: user.into(),
            temperature: None,
        }
    }

    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Stateless request/response chat completion.
#[allow(async_fn_in_trait)]
pub trait LanguageModel {
    /// Generated text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}
