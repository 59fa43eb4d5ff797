use tracing::{debug, info, warn};

use super::bundle::{RawProfileBundle, StepOutcome};
use super::locators::{
    CONTACT_INFO_LINKS, CONTACT_INFO_OVERLAYS, EXPAND_LABELS, OVERLAY_DISMISS, expand_control,
    first_present,
};
use crate::browser::{BrowserPage, Nth, scroll_full_page};
use crate::config::PageTimings;
use crate::error::{ScrapeError, ScrapeResult};
use crate::session::Session;
use crate::utils::profile_base_url;

/// Sub-pages captured after the main profile page, relative to its base URL.
const SKILLS_SUBPAGE: &str = "details/skills/";
const EXPERIENCE_SUBPAGE: &str = "details/experience/";

/// Drives one page through a profile and its sub-pages.
///
/// Only a failure to load the main profile page is an error. Every optional
/// step reports a `StepOutcome` instead.
#[derive(Debug, Clone)]
pub struct ProfileFetcher {
    timings: PageTimings,
}

impl ProfileFetcher {
    #[must_use]
    pub fn new(timings: PageTimings) -> Self {
        Self { timings }
    }

    pub async fn fetch_profile<P: BrowserPage>(
        &self,
        page: &P,
        session: &Session,
        profile_url: &str,
    ) -> ScrapeResult<RawProfileBundle> {
        info!(
            "Fetching profile {profile_url} ({:?} session)",
            session.origin()
        );

        page.goto(profile_url)
            .await
            .map_err(|e| ScrapeError::navigation(profile_url, e))?;
        self.settle_and_scroll(page, self.timings.navigation_settle)
            .await;

        let contact = self.capture_contact_info(page).await;
        if let StepOutcome::Skipped(reason) = &contact {
            warn!("Contact info not captured: {reason}");
        }

        if let Err(e) = self.scroll(page).await {
            debug!("Re-scroll before expanding failed: {e:#}");
        }
        let expanded_clicks = self.expand_sections(page).await;

        let main_html = page
            .content()
            .await
            .map_err(|e| ScrapeError::browser("Failed to read main profile HTML", e))?;

        let base = profile_base_url(profile_url);
        let skills = self
            .capture_subpage(page, &format!("{base}/{SKILLS_SUBPAGE}"))
            .await;
        let experience = self
            .capture_subpage(page, &format!("{base}/{EXPERIENCE_SUBPAGE}"))
            .await;

        let bundle = RawProfileBundle {
            profile_url: profile_url.to_string(),
            main_html,
            contact,
            skills,
            experience,
            expanded_clicks,
        };
        info!(
            "Captured {profile_url}: main page + {:?}, {expanded_clicks} sections expanded",
            bundle.captured_sections()
        );
        Ok(bundle)
    }

    async fn settle_and_scroll<P: BrowserPage>(&self, page: &P, settle: std::time::Duration) {
        tokio::time::sleep(settle).await;
        if let Err(e) = self.scroll(page).await {
            debug!("Scroll failed: {e:#}");
        }
    }

    async fn scroll<P: BrowserPage>(&self, page: &P) -> anyhow::Result<()> {
        scroll_full_page(
            page,
            self.timings.scroll_step_px,
            self.timings.scroll_step_delay,
        )
        .await
    }

    /// Open the contact-info overlay, copy its HTML, close it again.
    ///
    /// Failing to dismiss the overlay does not discard what was captured.
    async fn capture_contact_info<P: BrowserPage>(&self, page: &P) -> StepOutcome {
        let Some(link) = first_present(page, CONTACT_INFO_LINKS).await else {
            return StepOutcome::Skipped("contact info link not found".to_string());
        };
        debug!("Opening contact info via {link}");

        if let Err(e) = page
            .click(&link, Nth::First, self.timings.contact_click_timeout)
            .await
        {
            return StepOutcome::Skipped(format!("contact info click failed: {e:#}"));
        }
        tokio::time::sleep(self.timings.contact_overlay_wait).await;

        let mut captured = None;
        for (overlay, nth) in CONTACT_INFO_OVERLAYS {
            match page.inner_html(overlay, *nth).await {
                Ok(Some(html)) => {
                    debug!("Contact overlay found via {overlay}");
                    captured = Some(html);
                    break;
                }
                Ok(None) => continue,
                Err(e) => debug!("Contact overlay probe {overlay} failed: {e:#}"),
            }
        }

        let Some(html) = captured else {
            return StepOutcome::Skipped("contact info overlay not found".to_string());
        };

        if let Err(e) = page
            .click(
                &OVERLAY_DISMISS,
                Nth::First,
                self.timings.contact_click_timeout,
            )
            .await
        {
            debug!("Could not dismiss contact overlay: {e:#}");
        }

        StepOutcome::from_html(html, "contact info overlay")
    }

    /// Click every instance of every expand label. Returns successful clicks.
    async fn expand_sections<P: BrowserPage>(&self, page: &P) -> usize {
        let mut clicks = 0;

        for &label in EXPAND_LABELS {
            let control = expand_control(label);
            let count = match page.count(&control).await {
                Ok(count) => count,
                Err(e) => {
                    debug!("Could not count {control}: {e:#}");
                    continue;
                }
            };

            for index in 0..count {
                match page
                    .click(&control, Nth::Index(index), self.timings.expand_click_timeout)
                    .await
                {
                    Ok(()) => {
                        clicks += 1;
                        tokio::time::sleep(self.timings.expand_click_delay).await;
                    }
                    Err(e) => debug!("Expand click {control} #{index} failed: {e:#}"),
                }
            }
        }

        clicks
    }

    async fn capture_subpage<P: BrowserPage>(&self, page: &P, url: &str) -> StepOutcome {
        if let Err(e) = page.goto(url).await {
            warn!("Sub-page {url} not captured: {e:#}");
            return StepOutcome::Skipped(format!("navigation to {url} failed: {e:#}"));
        }
        self.settle_and_scroll(page, self.timings.subpage_settle)
            .await;

        match page.content().await {
            Ok(html) => StepOutcome::from_html(html, url),
            Err(e) => {
                warn!("Sub-page {url} content unavailable: {e:#}");
                StepOutcome::Skipped(format!("content of {url} unavailable: {e:#}"))
            }
        }
    }
}
