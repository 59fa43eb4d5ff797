//! Environment-variable configuration source
//!
//! | Variable                | Required | Default                       |
//! |-------------------------|----------|-------------------------------|
//! | `OPENAI_API_KEY`        | yes      |                               |
//! | `OPENAI_MODEL`          | no       | `gpt-4o-mini`                 |
//! | `OPENAI_BASE_URL`       | no       | `https://api.openai.com/v1`   |
//! | `LINKEDIN_EMAIL`        | no       |                               |
//! | `LINKEDIN_PASSWORD`     | no       |                               |
//! | `LINKEDIN_SESSION_FILE` | no       | `session.json`                |
//! | `SCRAPER_HEADLESS`      | no       | `true`                        |
//!
//! Credentials are only demanded when an interactive login actually happens,
//! so their absence is not an error here.

use anyhow::{Context, Result};

use super::builder::{ScraperConfigBuilder, WithApiKey};
use super::types::ScraperConfig;

impl ScraperConfigBuilder<()> {
    /// Seed a builder from the process environment.
    pub fn from_env() -> Result<ScraperConfigBuilder<WithApiKey>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Seed a builder from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<ScraperConfigBuilder<WithApiKey>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = require(&lookup, "OPENAI_API_KEY")?;
        let mut builder = ScraperConfig::builder().llm_api_key(api_key);

        if let Some(model) = optional(&lookup, "OPENAI_MODEL") {
            builder = builder.llm_model(model);
        }
        if let Some(base_url) = optional(&lookup, "OPENAI_BASE_URL") {
            builder = builder.llm_base_url(base_url);
        }
        if let (Some(email), Some(password)) = (
            optional(&lookup, "LINKEDIN_EMAIL"),
            optional(&lookup, "LINKEDIN_PASSWORD"),
        ) {
            builder = builder.credentials(email, password);
        }
        if let Some(path) = optional(&lookup, "LINKEDIN_SESSION_FILE") {
            builder = builder.session_file(path);
        }
        if let Some(raw) = optional(&lookup, "SCRAPER_HEADLESS") {
            let headless = parse_bool(&raw)
                .with_context(|| format!("SCRAPER_HEADLESS must be a boolean, got '{raw}'"))?;
            builder = builder.headless(headless);
        }

        Ok(builder)
    }
}

impl ScraperConfig {
    /// Build a config straight from the process environment.
    pub fn from_env() -> Result<Self> {
        ScraperConfigBuilder::from_env()?.build()
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
