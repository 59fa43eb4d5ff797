//! Shared constants for the scraper
//!
//! Defaults and site-specific markers used across the session, fetcher and
//! search components.

use std::time::Duration;

/// Chrome user agent string for stealth mode
///
/// Keep within a few releases of current stable. An outdated major version is
/// one of the cheaper signals bot detection looks at.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Base URL of the target site
pub const SITE_URL: &str = "https://www.linkedin.com";

/// Login page path, relative to `SITE_URL`
pub const LOGIN_PATH: &str = "/login";

/// People-search results path, relative to `SITE_URL`
pub const PEOPLE_SEARCH_PATH: &str = "/search/results/people/";

/// `origin` query parameter the site's own search box sends
pub const SEARCH_ORIGIN: &str = "GLOBAL_SEARCH_HEADER";

/// Substring every profile URL contains once absolutized
pub const PROFILE_URL_MARKER: &str = "linkedin.com/in/";

/// Default file the session cookies are persisted to
pub const DEFAULT_SESSION_FILE: &str = "session.json";

/// Default number of profiles processed per search
pub const DEFAULT_MAX_PROFILES: usize = 3;

/// Character ceiling applied to model input (~25k tokens)
pub const DEFAULT_MAX_INPUT_CHARS: usize = 100_000;

/// Default chat model for extraction and repair calls
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default OpenAI-compatible API root
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Timeout for a single `page.goto()` including load
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between DOM polls while waiting for a selector or URL change
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Characters of page HTML logged when a wait times out
pub const DIAGNOSTIC_SNIPPET_CHARS: usize = 500;

/// Prefix for throwaway Chrome profile directories
pub const PROFILE_DIR_PREFIX: &str = "profile_scraper_chrome";
