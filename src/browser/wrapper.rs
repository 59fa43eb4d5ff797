//! Browser lifecycle management
//!
//! `BrowserWrapper` owns the Chrome process, its CDP handler task and its
//! profile directory for the duration of one scrape or search call.

use anyhow::{Context, Result};
use chromiumoxide::browser::Browser;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::ChromiumPage;
use super::stealth::{StealthProfile, enhance_page};
use crate::browser_profile::{BrowserProfile, create_unique_profile};
use crate::browser_setup::launch_browser;
use crate::config::ScraperConfig;

/// Wrapper for Browser, its event handler task and profile directory
///
/// Call `shutdown()` on every normal exit path. `Drop` is the fallback: it
/// aborts the handler and removes a throwaway profile, and chromiumoxide
/// kills the Chrome child when `Browser` drops.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    profile: Option<BrowserProfile>,
    stealth: StealthProfile,
}

impl BrowserWrapper {
    /// Launch Chrome according to `config`.
    pub async fn launch(config: &ScraperConfig) -> Result<Self> {
        let profile = match config.chrome_data_dir() {
            Some(dir) => BrowserProfile::persistent(dir)?,
            None => create_unique_profile()?,
        };

        let (browser, handler) = launch_browser(config.headless(), profile.path()).await?;

        Ok(Self {
            browser,
            handler,
            profile: Some(profile),
            stealth: StealthProfile::default(),
        })
    }

    /// Open a blank page and apply stealth before any site is loaded.
    pub async fn new_page(&self) -> Result<ChromiumPage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;

        if let Err(e) = enhance_page(&page, &self.stealth).await {
            warn!("Stealth injection failed, continuing without it: {e}");
        }

        Ok(ChromiumPage::new(page))
    }

    /// Close Chrome, wait for the process to exit, then release the profile.
    ///
    /// The profile is only removed after `wait()` so Chrome has released its
    /// file handles.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Shutting down browser");

        let closed = self.browser.close().await;
        let waited = self.browser.wait().await;
        self.handler.abort();
        drop(self.profile.take());

        closed.context("Failed to close browser")?;
        waited.context("Failed to wait for browser exit")?;
        Ok(())
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        self.handler.abort();
        if self.profile.is_some() {
            warn!("BrowserWrapper dropped without shutdown - releasing profile in Drop");
            drop(self.profile.take());
        }
    }
}
