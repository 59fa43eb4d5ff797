//! LinkedIn profile scraping pipeline.
//!
//! A persisted session is restored or created by logging in, profile pages
//! are captured with a headless Chrome, flattened to text, and turned into
//! structured records by a language model. A people search fans out over
//! the same pipeline, one profile at a time.
//!
//! ```no_run
//! use profile_scraper::{ProfileScraper, ScraperConfig, ScraperWorker, SearchQuery};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ScraperConfig::from_env()?;
//! let worker = ScraperWorker::spawn(ProfileScraper::new(config)?)?;
//!
//! let report = worker
//!     .search(SearchQuery::new().role("Data Engineer").location("Berlin"), Some(3))
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&report.profiles)?);
//! worker.shutdown()?;
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod browser_profile;
pub mod browser_setup;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod llm;
pub mod normalizer;
pub mod pipeline;
pub mod runtime;
pub mod search;
pub mod session;
pub mod utils;

pub use browser::{BrowserPage, BrowserWrapper, ChromiumPage, Locator, Nth};
pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{Credentials, LlmSettings, PageTimings, ScraperConfig, ScraperConfigBuilder};
pub use error::{ScrapeError, ScrapeResult};
pub use extractor::{ExtractedProfile, ProfileExtractor, ResolutionStage};
pub use fetcher::{ProfileFetcher, RawProfileBundle, StepOutcome};
pub use llm::{CompletionRequest, LanguageModel, LlmError, OpenAiClient};
pub use normalizer::{NormalizedText, normalize, normalize_bundle};
pub use pipeline::{ProfilePipeline, ProfileScraper};
pub use runtime::{JobHandle, ScraperWorker};
pub use search::{ProfileFailure, SearchOrchestrator, SearchPhase, SearchQuery, SearchReport};
pub use session::{
    FileSessionStore, Session, SessionCookie, SessionManager, SessionOrigin, SessionStore,
};
