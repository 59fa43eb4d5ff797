//! Error taxonomy for the scraping pipeline.
//!
//! Whole-operation failures (login, initial search navigation, a single
//! profile scrape) surface as a `ScrapeError`. Finer-grained failures, such
//! as one optional HTML section or one candidate profile inside a search
//! batch, are absorbed by the component that owns them and never reach here.

use thiserror::Error;

use crate::llm::LlmError;

/// Convenience alias for Result with `ScrapeError`
pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Missing or invalid configuration (e.g. no credentials when a login is required)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Login did not clear, or the site redirected to a login/auth wall
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A navigation the operation depends on could not complete
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Caller supplied a URL that cannot be scraped
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Browser launch or CDP failure
    #[error("Browser error: {0}")]
    Browser(String),

    /// Model output could not be resolved into a profile mapping
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// Language-model transport or API failure
    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    /// Session store could not be read or written
    #[error("Session store error: {0}")]
    Session(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The worker executing the job went away before replying
    #[error("Scrape job was cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain
        Self::Other(format!("{err:#}"))
    }
}

impl ScrapeError {
    /// Errors that end the current run rather than a single step of it.
    #[must_use]
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Authentication(_) | Self::Cancelled
        )
    }

    /// True when the site refused the session and a fresh login is needed.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub(crate) fn browser(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Browser(format!("{context}: {err:#}"))
    }

    pub(crate) fn navigation(url: &str, err: impl std::fmt::Display) -> Self {
        Self::Navigation(format!("{url}: {err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyhow_conversion_keeps_context_chain() {
        let err = anyhow::anyhow!("socket closed").context("Failed to read page content");
        let converted = ScrapeError::from(err);
        let message = converted.to_string();
        assert!(message.contains("Failed to read page content"));
        assert!(message.contains("socket closed"));
    }

    #[test]
    fn run_fatality_follows_taxonomy() {
        assert!(ScrapeError::Configuration("no credentials".into()).is_fatal_for_run());
        assert!(ScrapeError::Authentication("authwall".into()).is_fatal_for_run());
        assert!(!ScrapeError::Navigation("timeout".into()).is_fatal_for_run());
        assert!(!ScrapeError::Extraction("not an object".into()).is_fatal_for_run());
        assert!(ScrapeError::Authentication("x".into()).requires_login());
    }
}
