//! Core configuration types for the scraper
//!
//! `ScraperConfig` is passed explicitly into every component; nothing in the
//! crate reads credentials or paths from process-global state.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration struct for scrape and search runs
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// JSON file the session cookies are loaded from and saved to
    pub(crate) session_file: PathBuf,
    pub(crate) headless: bool,

    /// Chrome user data directory. When unset each launch gets a fresh,
    /// self-deleting profile directory.
    pub(crate) chrome_data_dir: Option<PathBuf>,

    /// Account used when the stored session is missing or rejected
    pub(crate) credentials: Option<Credentials>,
    pub(crate) llm: LlmSettings,

    /// Default cap on profiles processed per search
    pub(crate) max_profiles: usize,

    /// Character ceiling applied to model input
    pub(crate) max_input_chars: usize,

    /// Where `scrape_single` writes normalized text, and where extraction
    /// falls back to when called without text
    pub(crate) text_cache_path: Option<PathBuf>,

    /// Directory for HTML snapshots written when search link collection comes up empty
    pub(crate) debug_dump_dir: Option<PathBuf>,

    /// Join the experience field into the search keywords
    pub(crate) include_experience_in_query: bool,

    /// Base URL of the target site
    pub(crate) site_url: String,
    pub(crate) timings: PageTimings,
}

/// Account identifier and secret for interactive login
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl Credentials {
    /// Returns `None` when either value is blank.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let email = email.into();
        let password = password.into();
        if email.trim().is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { email, password })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Chat-completion endpoint settings
#[derive(Clone)]
pub struct LlmSettings {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
}

impl LlmSettings {
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Static per-operation delays and timeouts.
///
/// The site renders most profile sections lazily, so every navigation is
/// followed by a fixed settle interval and an incremental scroll. None of
/// these adapt at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTimings {
    /// Wait after navigating to a profile or search page
    pub navigation_settle: Duration,
    /// Wait after navigating to a `details/...` sub-page
    pub subpage_settle: Duration,
    /// Pixels per scroll step
    pub scroll_step_px: u64,
    /// Pause after each scroll step
    pub scroll_step_delay: Duration,
    /// Wait after opening the login page
    pub login_settle: Duration,
    /// Upper bound for the login form to clear after submitting
    pub login_clear_timeout: Duration,
    /// Timeout for clicking the contact-info link and dismissing its overlay
    pub contact_click_timeout: Duration,
    /// Wait for the contact-info overlay to render
    pub contact_overlay_wait: Duration,
    /// Timeout per "expand" control click
    pub expand_click_timeout: Duration,
    /// Pause after each successful "expand" click
    pub expand_click_delay: Duration,
    /// Extra wait on the search page before the first scroll
    pub search_pre_scroll_wait: Duration,
    /// Offset of the first search-page scroll
    pub search_scroll_offset_px: u64,
    /// Wait after each search-page scroll
    pub search_post_scroll_wait: Duration,
    /// Upper bound for a results container to appear
    pub results_timeout: Duration,
}

impl Default for PageTimings {
    fn default() -> Self {
        Self {
            navigation_settle: Duration::from_secs(5),
            subpage_settle: Duration::from_secs(3),
            scroll_step_px: 800,
            scroll_step_delay: Duration::from_millis(500),
            login_settle: Duration::from_secs(2),
            login_clear_timeout: Duration::from_secs(4),
            contact_click_timeout: Duration::from_secs(3),
            contact_overlay_wait: Duration::from_secs(2),
            expand_click_timeout: Duration::from_secs(2),
            expand_click_delay: Duration::from_millis(500),
            search_pre_scroll_wait: Duration::from_secs(3),
            search_scroll_offset_px: 500,
            search_post_scroll_wait: Duration::from_secs(2),
            results_timeout: Duration::from_secs(30),
        }
    }
}

impl PageTimings {
    /// Every delay and timeout set to zero. Scroll geometry is kept.
    #[must_use]
    pub fn none() -> Self {
        Self {
            navigation_settle: Duration::ZERO,
            subpage_settle: Duration::ZERO,
            scroll_step_delay: Duration::ZERO,
            login_settle: Duration::ZERO,
            login_clear_timeout: Duration::ZERO,
            contact_click_timeout: Duration::ZERO,
            contact_overlay_wait: Duration::ZERO,
            expand_click_timeout: Duration::ZERO,
            expand_click_delay: Duration::ZERO,
            search_pre_scroll_wait: Duration::ZERO,
            search_post_scroll_wait: Duration::ZERO,
            results_timeout: Duration::ZERO,
            ..Self::default()
        }
    }
}
