//! Getter methods for `ScraperConfig`

use std::path::{Path, PathBuf};

use super::types::{Credentials, LlmSettings, PageTimings, ScraperConfig};
use crate::utils::LOGIN_PATH;

impl ScraperConfig {
    #[must_use]
    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn llm(&self) -> &LlmSettings {
        &self.llm
    }

    #[must_use]
    pub fn max_profiles(&self) -> usize {
        self.max_profiles
    }

    #[must_use]
    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    #[must_use]
    pub fn text_cache_path(&self) -> Option<&Path> {
        self.text_cache_path.as_deref()
    }

    #[must_use]
    pub fn debug_dump_dir(&self) -> Option<&Path> {
        self.debug_dump_dir.as_deref()
    }

    #[must_use]
    pub fn include_experience_in_query(&self) -> bool {
        self.include_experience_in_query
    }

    #[must_use]
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    #[must_use]
    pub fn login_url(&self) -> String {
        format!("{}{LOGIN_PATH}", self.site_url)
    }

    #[must_use]
    pub fn timings(&self) -> &PageTimings {
        &self.timings
    }
}
