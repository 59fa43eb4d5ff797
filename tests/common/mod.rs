//! Test utilities shared by the profile_scraper integration tests

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use profile_scraper::{
    BrowserPage, CompletionRequest, LanguageModel, LlmError, Locator, Nth, PageTimings,
    ScrapeResult, ScraperConfig, SessionCookie, SessionStore,
};

pub const SITE: &str = "https://www.linkedin.com";
pub const LOGIN_URL: &str = "https://www.linkedin.com/login";
pub const FEED_URL: &str = "https://www.linkedin.com/feed/";
pub const SUBMIT_BUTTON: Locator = Locator::Css("button[type=submit]");
pub const PROFILE_ANCHORS: &str = "a[href*='/in/'][href*='linkedin.com']";
pub const PROFILE_ANCHORS_LOOSE: &str = "a[href*='/in/']";

/// Config with test credentials and every delay zeroed
#[allow(dead_code)]
pub fn test_config() -> ScraperConfig {
    ScraperConfig::builder()
        .llm_api_key("test-key")
        .credentials("jane@x.com", "secret")
        .timings(PageTimings::none())
        .build()
        .unwrap()
}

/// Minimal profile page whose visible text survives normalization
#[allow(dead_code)]
pub fn profile_html(name: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{name} | LinkedIn</title><script>var tracking = 1;</script></head>
<body>
    <nav><a>Home</a><a>My Network</a></nav>
    <main>
        <h1>{name}</h1>
        <div class="headline">Software Engineer</div>
        <section><h2>About</h2><p>Builds distributed systems.</p></section>
    </main>
    <footer>LinkedIn Corporation</footer>
</body>
</html>"#
    )
}

#[allow(dead_code)]
pub fn profile_json(name: &str) -> String {
    format!(r#"{{"Full Name": "{name}", "Skills": ["Rust"]}}"#)
}

#[allow(dead_code)]
pub fn cookie(name: &str, value: &str) -> SessionCookie {
    SessionCookie::new(name, value, ".linkedin.com")
}

#[derive(Default)]
struct MockState {
    current_url: String,
    documents: HashMap<String, String>,
    redirects: HashMap<String, String>,
    failing_gotos: HashSet<String>,
    counts: HashMap<Locator, usize>,
    inner_html: HashMap<Locator, String>,
    failing_clicks: HashSet<Locator>,
    click_navigations: HashMap<Locator, String>,
    hrefs: HashMap<String, Vec<String>>,
    results_visible: bool,
    cookies: Vec<SessionCookie>,
    applied_cookies: Vec<SessionCookie>,
    calls: Vec<String>,
}

/// Scripted page: documents keyed by URL, element counts and overlays keyed
/// by locator, and a log of every call made against it.
pub struct MockPage {
    state: RefCell<MockState>,
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl MockPage {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(MockState {
                current_url: "about:blank".to_string(),
                results_visible: true,
                ..MockState::default()
            }),
        }
    }

    /// Page that is already logged in: the login URL bounces to the feed
    pub fn logged_in() -> Self {
        Self::new()
            .with_redirect(LOGIN_URL, FEED_URL)
            .with_cookies(vec![cookie("li_at", "restored")])
    }

    pub fn with_document(mut self, url: &str, html: impl Into<String>) -> Self {
        self.state
            .get_mut()
            .documents
            .insert(url.to_string(), html.into());
        self
    }

    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.state
            .get_mut()
            .redirects
            .insert(from.to_string(), to.to_string());
        self
    }

    pub fn with_failing_goto(mut self, url: &str) -> Self {
        self.state.get_mut().failing_gotos.insert(url.to_string());
        self
    }

    pub fn with_count(mut self, locator: Locator, count: usize) -> Self {
        self.state.get_mut().counts.insert(locator, count);
        self
    }

    pub fn with_inner_html(mut self, locator: Locator, html: &str) -> Self {
        self.state
            .get_mut()
            .inner_html
            .insert(locator, html.to_string());
        self
    }

    pub fn with_failing_click(mut self, locator: Locator) -> Self {
        self.state.get_mut().failing_clicks.insert(locator);
        self
    }

    /// Clicking `locator` moves the page to `url`
    pub fn with_click_navigation(mut self, locator: Locator, url: &str) -> Self {
        self.state
            .get_mut()
            .click_navigations
            .insert(locator, url.to_string());
        self
    }

    pub fn with_hrefs(mut self, selector: &str, hrefs: &[&str]) -> Self {
        self.state.get_mut().hrefs.insert(
            selector.to_string(),
            hrefs.iter().map(|h| h.to_string()).collect(),
        );
        self
    }

    pub fn with_results_visible(mut self, visible: bool) -> Self {
        self.state.get_mut().results_visible = visible;
        self
    }

    pub fn with_cookies(mut self, cookies: Vec<SessionCookie>) -> Self {
        self.state.get_mut().cookies = cookies;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.state
            .borrow()
            .calls
            .iter()
            .any(|call| call.starts_with(prefix))
    }

    pub fn applied_cookies(&self) -> Vec<SessionCookie> {
        self.state.borrow().applied_cookies.clone()
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl BrowserPage for MockPage {
    async fn goto(&self, url: &str) -> Result<()> {
        self.record(format!("goto {url}"));
        let mut state = self.state.borrow_mut();
        if state.failing_gotos.contains(url) {
            return Err(anyhow!("net::ERR_CONNECTION_RESET"));
        }
        let landed = state
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        state.current_url = landed;
        Ok(())
    }

    async fn current_url(&self) -> String {
        self.state.borrow().current_url.clone()
    }

    async fn title(&self) -> Option<String> {
        Some("Mock page".to_string())
    }

    async fn content(&self) -> Result<String> {
        let state = self.state.borrow();
        Ok(state
            .documents
            .get(&state.current_url)
            .cloned()
            .unwrap_or_default())
    }

    async fn scroll_height(&self) -> Result<u64> {
        Ok(0)
    }

    async fn scroll_to(&self, y: u64) -> Result<()> {
        self.record(format!("scroll {y}"));
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        Ok(self.state.borrow().counts.get(locator).copied().unwrap_or(0))
    }

    async fn click(&self, locator: &Locator, nth: Nth, _timeout: Duration) -> Result<()> {
        self.record(format!("click {locator} {nth:?}"));
        let mut state = self.state.borrow_mut();
        if state.failing_clicks.contains(locator) {
            return Err(anyhow!("click on {locator} timeout after 0ms"));
        }
        if let Some(url) = state.click_navigations.get(locator).cloned() {
            state.current_url = url;
        }
        Ok(())
    }

    async fn inner_html(&self, locator: &Locator, _nth: Nth) -> Result<Option<String>> {
        Ok(self.state.borrow().inner_html.get(locator).cloned())
    }

    async fn fill(&self, selector: &str, _value: &str) -> Result<()> {
        self.record(format!("fill {selector}"));
        Ok(())
    }

    async fn attribute_values(&self, selector: &str, name: &str) -> Result<Vec<String>> {
        self.record(format!("attributes {selector} {name}"));
        Ok(self
            .state
            .borrow()
            .hrefs
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn wait_for_any(&self, _selectors: &[&str], _timeout: Duration) -> bool {
        self.record("wait_for_any".to_string());
        self.state.borrow().results_visible
    }

    async fn cookies(&self) -> Result<Vec<SessionCookie>> {
        Ok(self.state.borrow().cookies.clone())
    }

    async fn set_cookies(&self, cookies: &[SessionCookie]) -> Result<()> {
        self.record(format!("set_cookies {}", cookies.len()));
        self.state.borrow_mut().applied_cookies = cookies.to_vec();
        Ok(())
    }
}

/// Language model answering from a fixed queue and recording every request
#[derive(Default)]
pub struct StubModel {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

#[allow(dead_code)]
impl StubModel {
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LanguageModel for StubModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyContent)
    }
}

/// Session store kept in memory
#[derive(Default)]
pub struct MemorySessionStore {
    cookies: Mutex<Option<Vec<SessionCookie>>>,
    saves: Mutex<usize>,
}

#[allow(dead_code)]
impl MemorySessionStore {
    pub fn with_cookies(cookies: Vec<SessionCookie>) -> Self {
        Self {
            cookies: Mutex::new(Some(cookies)),
            saves: Mutex::new(0),
        }
    }

    pub fn saved(&self) -> Option<Vec<SessionCookie>> {
        self.cookies.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ScrapeResult<Option<Vec<SessionCookie>>> {
        Ok(self.cookies.lock().unwrap().clone())
    }

    fn save(&self, cookies: &[SessionCookie]) -> ScrapeResult<()> {
        *self.cookies.lock().unwrap() = Some(cookies.to_vec());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
