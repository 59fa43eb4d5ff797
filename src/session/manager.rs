use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::cookie::{Session, SessionCookie, SessionOrigin};
use super::store::SessionStore;
use crate::browser::{BrowserPage, Locator, Nth};
use crate::config::{Credentials, PageTimings, ScraperConfig};
use crate::error::{ScrapeError, ScrapeResult};
use crate::utils::{NAVIGATION_TIMEOUT, POLL_INTERVAL, is_login_page};

const USERNAME_FIELD: &str = "#username";
const PASSWORD_FIELD: &str = "#password";
const SUBMIT_BUTTON: Locator = Locator::Css("button[type=submit]");

/// Acquires an authenticated session, restoring persisted cookies when the
/// site still accepts them and falling back to a single interactive login.
pub struct SessionManager<S> {
    store: S,
    credentials: Option<Credentials>,
    login_url: String,
    timings: PageTimings,
}

impl<S: SessionStore> SessionManager<S> {
    #[must_use]
    pub fn new(store: S, config: &ScraperConfig) -> Self {
        Self {
            store,
            credentials: config.credentials().cloned(),
            login_url: config.login_url(),
            timings: config.timings().clone(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply stored cookies, open the login page and log in only if the
    /// site still shows the login form.
    ///
    /// Missing credentials at that point are a `Configuration` error; a login
    /// that does not clear within `login_clear_timeout` is an
    /// `Authentication` error. The store is overwritten only after a
    /// successful fresh login.
    pub async fn acquire_session<P: BrowserPage>(&self, page: &P) -> ScrapeResult<Session> {
        let stored = self.load_stored();
        let restored = match stored.as_deref() {
            Some(cookies) if !cookies.is_empty() => match page.set_cookies(cookies).await {
                Ok(()) => {
                    debug!("Applied {} stored cookies", cookies.len());
                    true
                }
                Err(e) => {
                    warn!("Failed to apply stored session, logging in fresh: {e:#}");
                    false
                }
            },
            _ => false,
        };

        page.goto(&self.login_url)
            .await
            .map_err(|e| ScrapeError::navigation(&self.login_url, e))?;
        tokio::time::sleep(self.timings.login_settle).await;

        let landed = page.current_url().await;
        if !is_login_page(&landed) {
            info!("Existing session accepted (landed on {landed})");
            let cookies = match page.cookies().await {
                Ok(cookies) => cookies,
                Err(e) => {
                    debug!("Could not read cookies back, keeping stored set: {e:#}");
                    stored.unwrap_or_default()
                }
            };
            if !restored {
                debug!("Site did not ask for login although no stored session was applied");
            }
            return Ok(Session::new(cookies, SessionOrigin::Restored));
        }

        info!("Login required");
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            ScrapeError::Configuration(
                "LinkedIn credentials are required for login (set LINKEDIN_EMAIL and LINKEDIN_PASSWORD)"
                    .to_string(),
            )
        })?;

        self.submit_login(page, credentials).await?;
        self.wait_for_login_to_clear(page).await?;

        let cookies = page
            .cookies()
            .await
            .map_err(|e| ScrapeError::browser("Failed to read cookies after login", e))?;

        if let Err(e) = self.store.save(&cookies) {
            warn!("Logged in but failed to persist session: {e}");
        }

        info!("Login successful");
        Ok(Session::new(cookies, SessionOrigin::FreshLogin))
    }

    fn load_stored(&self) -> Option<Vec<SessionCookie>> {
        match self.store.load() {
            Ok(cookies) => cookies,
            Err(e) => {
                warn!("Failed to load session, treating as absent: {e}");
                None
            }
        }
    }

    async fn submit_login<P: BrowserPage>(
        &self,
        page: &P,
        credentials: &Credentials,
    ) -> ScrapeResult<()> {
        let auth_err = |e: anyhow::Error| ScrapeError::Authentication(format!("{e:#}"));

        page.fill(USERNAME_FIELD, credentials.email())
            .await
            .map_err(auth_err)?;
        page.fill(PASSWORD_FIELD, credentials.password())
            .await
            .map_err(auth_err)?;
        page.click(&SUBMIT_BUTTON, Nth::First, NAVIGATION_TIMEOUT)
            .await
            .map_err(auth_err)?;
        Ok(())
    }

    /// Poll the URL until it leaves the login form. Checks at least once.
    async fn wait_for_login_to_clear<P: BrowserPage>(&self, page: &P) -> ScrapeResult<()> {
        let deadline = Instant::now() + self.timings.login_clear_timeout;

        loop {
            let url = page.current_url().await;
            if !is_login_page(&url) {
                debug!("Login cleared, now at {url}");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::Authentication(format!(
                    "login page did not clear within {:?} (still at {url})",
                    self.timings.login_clear_timeout
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
