//! Type-safe builder for `ScraperConfig` using the typestate pattern
//!
//! The language-model API key is the only required field; `build()` exists
//! only once it has been supplied.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;
use url::Url;

use super::types::{Credentials, LlmSettings, PageTimings, ScraperConfig};
use crate::utils::{
    DEFAULT_MAX_INPUT_CHARS, DEFAULT_MAX_PROFILES, DEFAULT_MODEL, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_SESSION_FILE, SITE_URL,
};

// Type states for the builder
pub struct WithApiKey;

pub struct ScraperConfigBuilder<State = ()> {
    pub(crate) session_file: PathBuf,
    pub(crate) headless: bool,
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) llm_api_key: Option<String>,
    pub(crate) llm_base_url: String,
    pub(crate) llm_model: String,
    pub(crate) max_profiles: usize,
    pub(crate) max_input_chars: usize,
    pub(crate) text_cache_path: Option<PathBuf>,
    pub(crate) debug_dump_dir: Option<PathBuf>,
    pub(crate) include_experience_in_query: bool,
    pub(crate) site_url: String,
    pub(crate) timings: PageTimings,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScraperConfigBuilder<()> {
    fn default() -> Self {
        Self {
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            headless: true,
            chrome_data_dir: None,
            credentials: None,
            llm_api_key: None,
            llm_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            max_profiles: DEFAULT_MAX_PROFILES,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            text_cache_path: None,
            debug_dump_dir: None,
            include_experience_in_query: false,
            site_url: SITE_URL.to_string(),
            timings: PageTimings::default(),
            _phantom: PhantomData,
        }
    }
}

impl ScraperConfig {
    /// Create a builder for configuring a `ScraperConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScraperConfigBuilder<()> {
        ScraperConfigBuilder::default()
    }
}

impl ScraperConfigBuilder<()> {
    pub fn llm_api_key(self, key: impl Into<String>) -> ScraperConfigBuilder<WithApiKey> {
        ScraperConfigBuilder {
            session_file: self.session_file,
            headless: self.headless,
            chrome_data_dir: self.chrome_data_dir,
            credentials: self.credentials,
            llm_api_key: Some(key.into()),
            llm_base_url: self.llm_base_url,
            llm_model: self.llm_model,
            max_profiles: self.max_profiles,
            max_input_chars: self.max_input_chars,
            text_cache_path: self.text_cache_path,
            debug_dump_dir: self.debug_dump_dir,
            include_experience_in_query: self.include_experience_in_query,
            site_url: self.site_url,
            timings: self.timings,
            _phantom: PhantomData,
        }
    }
}

// Build method only available once the API key is set
impl ScraperConfigBuilder<WithApiKey> {
    pub fn build(self) -> Result<ScraperConfig> {
        let api_key = self
            .llm_api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("llm_api_key must not be empty"))?;

        if self.max_profiles == 0 {
            return Err(anyhow!("max_profiles must be at least 1"));
        }
        if self.max_input_chars == 0 {
            return Err(anyhow!("max_input_chars must be at least 1"));
        }
        if self.timings.scroll_step_px == 0 {
            return Err(anyhow!("scroll_step_px must be at least 1"));
        }

        Url::parse(&self.site_url)
            .map_err(|e| anyhow!("Invalid site_url '{}': {e}", self.site_url))?;
        Url::parse(&self.llm_base_url)
            .map_err(|e| anyhow!("Invalid llm_base_url '{}': {e}", self.llm_base_url))?;

        Ok(ScraperConfig {
            session_file: self.session_file,
            headless: self.headless,
            chrome_data_dir: self.chrome_data_dir,
            credentials: self.credentials,
            llm: LlmSettings {
                api_key,
                base_url: self.llm_base_url.trim_end_matches('/').to_string(),
                model: self.llm_model,
            },
            max_profiles: self.max_profiles,
            max_input_chars: self.max_input_chars,
            text_cache_path: self.text_cache_path,
            debug_dump_dir: self.debug_dump_dir,
            include_experience_in_query: self.include_experience_in_query,
            site_url: self.site_url.trim_end_matches('/').to_string(),
            timings: self.timings,
        })
    }
}

// Optional settings, available at any state
impl<State> ScraperConfigBuilder<State> {
    #[must_use]
    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chrome_data_dir = Some(dir.into());
        self
    }

    /// Set login credentials. Blank values leave the builder without credentials.
    #[must_use]
    pub fn credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Credentials::new(email, password);
        self
    }

    #[must_use]
    pub fn llm_base_url(mut self, url: impl Into<String>) -> Self {
        self.llm_base_url = url.into();
        self
    }

    #[must_use]
    pub fn llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = model.into();
        self
    }

    #[must_use]
    pub fn max_profiles(mut self, max: usize) -> Self {
        self.max_profiles = max;
        self
    }

    #[must_use]
    pub fn max_input_chars(mut self, max: usize) -> Self {
        self.max_input_chars = max;
        self
    }

    #[must_use]
    pub fn text_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.text_cache_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn debug_dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dump_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn include_experience_in_query(mut self, include: bool) -> Self {
        self.include_experience_in_query = include;
        self
    }

    #[must_use]
    pub fn site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = url.into();
        self
    }

    #[must_use]
    pub fn timings(mut self, timings: PageTimings) -> Self {
        self.timings = timings;
        self
    }
}
