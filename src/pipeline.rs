//! Public entry points: `scrape_single` and `search`.
//!
//! Each call launches its own browser, drives a single page strictly
//! sequentially and shuts the browser down again on every exit path.

use std::path::Path;
use tracing::{info, warn};

use crate::browser::{BrowserPage, BrowserWrapper};
use crate::config::ScraperConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extractor::{ExtractedProfile, ProfileExtractor};
use crate::fetcher::ProfileFetcher;
use crate::llm::{LanguageModel, OpenAiClient};
use crate::normalizer::{NormalizedText, normalize_bundle};
use crate::search::{SearchOrchestrator, SearchQuery, SearchReport};
use crate::session::{FileSessionStore, Session, SessionManager, SessionStore};
use crate::utils::is_valid_url;

/// Fetch → normalize → extract for one profile on an already-authenticated page.
pub struct ProfilePipeline<M> {
    fetcher: ProfileFetcher,
    extractor: ProfileExtractor<M>,
}

impl<M: LanguageModel> ProfilePipeline<M> {
    pub fn new(model: M, config: &ScraperConfig) -> Self {
        Self {
            fetcher: ProfileFetcher::new(config.timings().clone()),
            extractor: ProfileExtractor::new(model, config),
        }
    }

    #[must_use]
    pub fn extractor(&self) -> &ProfileExtractor<M> {
        &self.extractor
    }

    /// Capture every section of the profile and flatten it to text.
    pub async fn capture_text<P: BrowserPage>(
        &self,
        page: &P,
        session: &Session,
        url: &str,
    ) -> ScrapeResult<NormalizedText> {
        let bundle = self.fetcher.fetch_profile(page, session, url).await?;
        let text = normalize_bundle(&bundle);
        info!(
            "Normalized {url}: {} characters from sections {:?}",
            text.char_count(),
            bundle.captured_sections()
        );
        Ok(text)
    }

    /// Extract a profile from captured text and tag it with its source URL.
    pub async fn extract_from(&self, text: &str, url: &str) -> ScrapeResult<ExtractedProfile> {
        // Blank text would make the extractor fall back to the cache of another profile
        if text.trim().is_empty() {
            return Err(ScrapeError::Extraction(format!(
                "no profile text captured from {url}"
            )));
        }
        match self.extractor.extract(Some(text)).await? {
            Some(profile) => Ok(profile.with_source_url(url)),
            None => Err(ScrapeError::Extraction(format!(
                "no profile text captured from {url}"
            ))),
        }
    }
}

/// The scraping core: session handling plus the per-profile pipeline.
pub struct ProfileScraper<M = OpenAiClient, S = FileSessionStore> {
    config: ScraperConfig,
    sessions: SessionManager<S>,
    pipeline: ProfilePipeline<M>,
}

impl ProfileScraper {
    /// Production wiring: OpenAI-compatible model and file-backed session store.
    pub fn new(config: ScraperConfig) -> ScrapeResult<Self> {
        let model = OpenAiClient::new(config.llm())?;
        let store = FileSessionStore::new(config.session_file());
        Ok(Self::with_parts(config, model, store))
    }
}

impl<M: LanguageModel, S: SessionStore> ProfileScraper<M, S> {
    pub fn with_parts(config: ScraperConfig, model: M, store: S) -> Self {
        let sessions = SessionManager::new(store, &config);
        let pipeline = ProfilePipeline::new(model, &config);
        Self {
            config,
            sessions,
            pipeline,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionManager<S> {
        &self.sessions
    }

    /// Scrape and extract one profile in a fresh browser.
    pub async fn scrape_single(&self, url: &str) -> ScrapeResult<ExtractedProfile> {
        if !is_valid_url(url) {
            return Err(ScrapeError::InvalidUrl(url.to_string()));
        }

        let browser = self.launch().await?;
        let result = match browser.new_page().await {
            Ok(page) => self.scrape_single_on(&page, url).await,
            Err(e) => Err(ScrapeError::browser("Failed to open page", e)),
        };
        release(browser).await;
        result
    }

    /// `scrape_single` on a caller-provided page.
    pub async fn scrape_single_on<P: BrowserPage>(
        &self,
        page: &P,
        url: &str,
    ) -> ScrapeResult<ExtractedProfile> {
        let session = self.sessions.acquire_session(page).await?;
        let text = self.pipeline.capture_text(page, &session, url).await?;

        if let Some(path) = self.config.text_cache_path() {
            write_text_cache(path, &text).await;
        }

        self.pipeline.extract_from(text.as_str(), url).await
    }

    /// Run a people search in a fresh browser.
    ///
    /// `max_profiles` falls back to the configured default.
    pub async fn search(
        &self,
        query: &SearchQuery,
        max_profiles: Option<usize>,
    ) -> ScrapeResult<SearchReport> {
        let browser = self.launch().await?;
        let result = match browser.new_page().await {
            Ok(page) => self.search_on(&page, query, max_profiles).await,
            Err(e) => Err(ScrapeError::browser("Failed to open page", e)),
        };
        release(browser).await;
        result
    }

    /// `search` on a caller-provided page.
    pub async fn search_on<P: BrowserPage>(
        &self,
        page: &P,
        query: &SearchQuery,
        max_profiles: Option<usize>,
    ) -> ScrapeResult<SearchReport> {
        let max_profiles = max_profiles.unwrap_or(self.config.max_profiles());
        let mut orchestrator = SearchOrchestrator::new(&self.sessions, &self.pipeline, &self.config);
        orchestrator.run(page, query, max_profiles).await
    }

    /// Extract from the text cache left by the last `scrape_single`.
    ///
    /// `Ok(None)` when no cache is configured or it cannot be read.
    pub async fn extract_cached(&self) -> ScrapeResult<Option<ExtractedProfile>> {
        self.pipeline.extractor().extract(None).await
    }

    async fn launch(&self) -> ScrapeResult<BrowserWrapper> {
        BrowserWrapper::launch(&self.config)
            .await
            .map_err(|e| ScrapeError::browser("Failed to launch browser", e))
    }
}

async fn release(browser: BrowserWrapper) {
    if let Err(e) = browser.shutdown().await {
        warn!("Browser shutdown failed: {e:#}");
    }
}

async fn write_text_cache(path: &Path, text: &NormalizedText) {
    let written = async {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, text.as_str()).await
    }
    .await;

    match written {
        Ok(()) => info!("Saved normalized text to {}", path.display()),
        Err(e) => warn!("Failed to write text cache {}: {e}", path.display()),
    }
}
