use serde::Serialize;
use std::path::Path;
use tracing::{debug, error, info, warn};

use super::links::collect_profile_links;
use super::phase::SearchPhase;
use super::query::SearchQuery;
use crate::browser::BrowserPage;
use crate::config::ScraperConfig;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extractor::ExtractedProfile;
use crate::llm::LanguageModel;
use crate::pipeline::ProfilePipeline;
use crate::session::{SessionManager, SessionStore};
use crate::utils::{DIAGNOSTIC_SNIPPET_CHARS, is_auth_wall};

/// Containers that show up once people-search results have rendered.
const RESULTS_CONTAINERS: &[&str] = &[
    "div.search-results-container",
    "main.scaffold-layout__main",
    "div.search-results__list",
];

const PROFILE_ANCHORS: &str = "a[href*='/in/'][href*='linkedin.com']";
const PROFILE_ANCHORS_LOOSE: &str = "a[href*='/in/']";

const DEBUG_DUMP_FILE: &str = "search_page_debug.html";

/// A candidate profile that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileFailure {
    pub url: String,
    pub reason: String,
}

/// Outcome of one completed search run.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub phase: SearchPhase,
    /// Candidate profile URLs that were processed, in order
    pub links: Vec<String>,
    pub profiles: Vec<ExtractedProfile>,
    pub failures: Vec<ProfileFailure>,
}

impl SearchReport {
    #[must_use]
    pub fn into_profiles(self) -> Vec<ExtractedProfile> {
        self.profiles
    }
}

/// Runs one search over a single page: login, search, link collection,
/// then each profile through the pipeline in turn.
pub struct SearchOrchestrator<'a, M, S> {
    sessions: &'a SessionManager<S>,
    pipeline: &'a ProfilePipeline<M>,
    config: &'a ScraperConfig,
    phase: SearchPhase,
}

impl<'a, M: LanguageModel, S: SessionStore> SearchOrchestrator<'a, M, S> {
    pub fn new(
        sessions: &'a SessionManager<S>,
        pipeline: &'a ProfilePipeline<M>,
        config: &'a ScraperConfig,
    ) -> Self {
        Self {
            sessions,
            pipeline,
            config,
            phase: SearchPhase::Idle,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    fn enter(&mut self, next: SearchPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal search phase transition {} -> {next}",
            self.phase
        );
        debug!("Search phase: {} -> {next}", self.phase);
        self.phase = next;
    }

    fn abort(&mut self, err: ScrapeError) -> ScrapeError {
        error!("Search aborted while {}: {err}", self.phase);
        self.enter(SearchPhase::Aborted);
        err
    }

    /// Run the search to completion.
    ///
    /// Login failures, search navigation failures and an auth-wall redirect
    /// abort the run with an error. Failures on individual profiles are
    /// recorded in the report and never abort it.
    pub async fn run<P: BrowserPage>(
        &mut self,
        page: &P,
        query: &SearchQuery,
        max_profiles: usize,
    ) -> ScrapeResult<SearchReport> {
        // Each run walks the state machine from the start
        self.phase = SearchPhase::Idle;
        self.enter(SearchPhase::LoggingIn);
        let session = match self.sessions.acquire_session(page).await {
            Ok(session) => session,
            Err(e) => return Err(self.abort(e)),
        };

        self.enter(SearchPhase::Searching);
        let search_url = match query.search_url(
            self.config.site_url(),
            self.config.include_experience_in_query(),
        ) {
            Ok(url) => url,
            Err(e) => return Err(self.abort(e)),
        };
        info!("Searching: {search_url}");

        if let Err(e) = page.goto(&search_url).await {
            return Err(self.abort(ScrapeError::navigation(&search_url, e)));
        }
        if let Err(e) = self.await_results(page).await {
            return Err(self.abort(e));
        }

        self.enter(SearchPhase::CollectingLinks);
        let links = self.collect_links(page, max_profiles).await;
        info!("Found {} profile links", links.len());

        let mut profiles = Vec::with_capacity(links.len());
        let mut failures = Vec::new();

        for (index, url) in links.iter().enumerate() {
            self.enter(SearchPhase::ProcessingProfile { index });
            info!("Processing profile {}/{}: {url}", index + 1, links.len());

            let result = async {
                let text = self.pipeline.capture_text(page, &session, url).await?;
                self.pipeline.extract_from(text.as_str(), url).await
            }
            .await;

            match result {
                Ok(profile) => profiles.push(profile),
                Err(e) => {
                    error!("Failed to process profile {url}: {e}");
                    failures.push(ProfileFailure {
                        url: url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.enter(SearchPhase::Done);
        info!(
            "Search finished: {} profiles extracted, {} failed",
            profiles.len(),
            failures.len()
        );

        Ok(SearchReport {
            phase: self.phase,
            links,
            profiles,
            failures,
        })
    }

    /// Give the results page time to render. A missing results container is
    /// tolerated unless the site redirected to a login or auth wall.
    async fn await_results<P: BrowserPage>(&self, page: &P) -> ScrapeResult<()> {
        let timings = self.config.timings();
        tokio::time::sleep(timings.navigation_settle).await;
        tokio::time::sleep(timings.search_pre_scroll_wait).await;
        if let Err(e) = page.scroll_to(timings.search_scroll_offset_px).await {
            debug!("Initial results scroll failed: {e:#}");
        }
        tokio::time::sleep(timings.search_post_scroll_wait).await;

        if page
            .wait_for_any(RESULTS_CONTAINERS, timings.results_timeout)
            .await
        {
            return Ok(());
        }

        let url = page.current_url().await;
        let title = page.title().await.unwrap_or_default();
        let snippet = match page.content().await {
            Ok(html) => html.chars().take(DIAGNOSTIC_SNIPPET_CHARS).collect(),
            Err(e) => format!("<content unavailable: {e:#}>"),
        };
        warn!(
            "Search results did not appear within {:?}, continuing anyway. URL: {url}, title: {title}, content: {snippet}",
            timings.results_timeout
        );

        if is_auth_wall(&url) {
            return Err(ScrapeError::Authentication(
                "LinkedIn requires login. Please check credentials.".to_string(),
            ));
        }
        Ok(())
    }

    async fn collect_links<P: BrowserPage>(&self, page: &P, max_profiles: usize) -> Vec<String> {
        let timings = self.config.timings();
        match page.scroll_height().await {
            Ok(height) => {
                if let Err(e) = page.scroll_to(height).await {
                    debug!("Scroll to bottom failed: {e:#}");
                }
            }
            Err(e) => debug!("Could not read page height: {e:#}"),
        }
        tokio::time::sleep(timings.search_post_scroll_wait).await;

        let mut hrefs = self.anchor_hrefs(page, PROFILE_ANCHORS).await;
        if hrefs.is_empty() {
            debug!("No anchors for {PROFILE_ANCHORS}, trying {PROFILE_ANCHORS_LOOSE}");
            hrefs = self.anchor_hrefs(page, PROFILE_ANCHORS_LOOSE).await;
        }

        if hrefs.is_empty() {
            warn!("No profile anchors found on the search results page");
            if let Some(dir) = self.config.debug_dump_dir() {
                dump_page(page, dir).await;
            }
        }

        collect_profile_links(hrefs, self.config.site_url(), max_profiles)
    }

    async fn anchor_hrefs<P: BrowserPage>(&self, page: &P, selector: &str) -> Vec<String> {
        page.attribute_values(selector, "href")
            .await
            .unwrap_or_else(|e| {
                warn!("Reading anchors for {selector} failed: {e:#}");
                Vec::new()
            })
    }
}

/// Write the current page HTML to `dir/search_page_debug.html`.
async fn dump_page<P: BrowserPage>(page: &P, dir: &Path) {
    let html = match page.content().await {
        Ok(html) => html,
        Err(e) => {
            warn!("Could not read search page for debug dump: {e:#}");
            return;
        }
    };
    let path = dir.join(DEBUG_DUMP_FILE);
    let written = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, html).await
    }
    .await;
    match written {
        Ok(()) => info!("Saved search page HTML to {}", path.display()),
        Err(e) => warn!("Failed to write {}: {e}", path.display()),
    }
}
