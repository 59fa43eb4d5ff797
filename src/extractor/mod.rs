//! Structured Extractor
//!
//! Turns normalized profile text into an [`ExtractedProfile`] with one
//! language-model call, resolving the response through the ladder in
//! [`json_repair`].

pub mod json_repair;
pub mod profile;
pub mod prompts;

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::llm::{CompletionRequest, LanguageModel};

pub use json_repair::{ResolutionStage, resolve_json, strip_json_fences};
pub use profile::ExtractedProfile;

/// Sampling temperature of the primary extraction call.
const EXTRACTION_TEMPERATURE: f32 = 0.0;

pub struct ProfileExtractor<M> {
    model: M,
    model_name: String,
    max_input_chars: usize,
    text_cache_path: Option<PathBuf>,
}

impl<M: LanguageModel> ProfileExtractor<M> {
    pub fn new(model: M, config: &ScraperConfig) -> Self {
        Self {
            model,
            model_name: config.llm().model().to_string(),
            max_input_chars: config.max_input_chars(),
            text_cache_path: config.text_cache_path().map(PathBuf::from),
        }
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn text_cache_path(&self) -> Option<&std::path::Path> {
        self.text_cache_path.as_deref()
    }

    /// Extract a profile from `text`, or from the text cache when `text` is
    /// `None` or blank.
    ///
    /// Returns `Ok(None)` only when there is no input at all: no non-blank text
    /// given and no readable, non-empty cache file. A response that survives
    /// none of the ladder stages is an error.
    pub async fn extract(&self, text: Option<&str>) -> ScrapeResult<Option<ExtractedProfile>> {
        let cached;
        let input = match text.filter(|t| !t.trim().is_empty()) {
            Some(text) => text,
            None => match self.read_cache().await {
                Some(contents) => {
                    cached = contents;
                    cached.as_str()
                }
                None => return Ok(None),
            },
        };

        if input.trim().is_empty() {
            warn!("No profile text to extract from");
            return Ok(None);
        }

        let input = truncate_chars(input, self.max_input_chars);

        let request = CompletionRequest::new(&self.model_name, prompts::extraction_prompt(input))
            .with_system(prompts::SYSTEM_PROMPT)
            .with_temperature(EXTRACTION_TEMPERATURE);

        let raw = self.model.complete(&request).await?;
        debug!("Raw model output:\n{raw}");

        let (map, stage) = resolve_json(&self.model, &self.model_name, &raw).await?;
        info!("Resolved model output as JSON ({stage:?})");

        ExtractedProfile::from_map(map)
            .map(Some)
            .map_err(|e| ScrapeError::Extraction(format!("model output is not a profile: {e}")))
    }

    async fn read_cache(&self) -> Option<String> {
        let Some(path) = self.text_cache_path.as_deref() else {
            warn!("No text supplied and no text cache configured");
            return None;
        };
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Some(contents),
            Err(e) => {
                warn!("Could not read text cache {}: {e}", path.display());
                None
            }
        }
    }
}

/// Cut `text` to at most `max_chars` characters, on a char boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            warn!(
                "Profile text exceeds {max_chars} characters, truncating before extraction"
            );
            &text[..cut]
        }
        None => text,
    }
}
