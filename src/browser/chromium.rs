//! `BrowserPage` over a chromiumoxide `Page`
//!
//! Element lookups that need text matching or "last match" semantics run as
//! page-side JavaScript; anything that has to produce real input events
//! (clicking, typing) goes through chromiumoxide's element API after the
//! target has been tagged with a marker attribute.

use anyhow::{Context, Result, anyhow};
use chromiumoxide::cdp::browser_protocol::network::{
    Cookie, CookieParam, CookieSameSite, SetCookiesParams, TimeSinceEpoch,
};
use chromiumoxide::page::Page;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::page_helpers::{get_page_title_for_debug, get_page_url_with_fallback};
use super::timeout::with_page_timeout;
use super::{BrowserPage, Locator, Nth};
use crate::session::SessionCookie;
use crate::utils::{NAVIGATION_TIMEOUT, POLL_INTERVAL};

/// Attribute used to hand a JS-resolved element over to the element API
const TARGET_ATTR: &str = "data-profile-scraper-target";

#[derive(Debug, Deserialize)]
struct HtmlProbe {
    found: bool,
    #[serde(default)]
    html: String,
}

/// A live Chrome tab.
#[derive(Debug, Clone)]
pub struct ChromiumPage {
    page: Page,
}

impl ChromiumPage {
    #[must_use]
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    #[must_use]
    pub fn inner(&self) -> &Page {
        &self.page
    }

    /// Tag the resolved match with `TARGET_ATTR`. Returns false when there is no such element.
    async fn mark_target(&self, locator: &Locator, nth: Nth) -> Result<bool> {
        let script = mark_target_script(locator, nth);

        self.page
            .evaluate(script.as_str())
            .await
            .with_context(|| format!("Failed to resolve {locator}"))?
            .into_value::<bool>()
            .context("Unexpected locator probe result")
    }
}

impl BrowserPage for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<()> {
        debug!("Navigating to {url}");
        with_page_timeout(
            async {
                self.page
                    .goto(url)
                    .await
                    .with_context(|| format!("Failed to navigate to {url}"))?;
                self.page
                    .wait_for_navigation()
                    .await
                    .context("Failed to wait for page load")?;
                Ok(())
            },
            NAVIGATION_TIMEOUT,
            "Navigation",
        )
        .await
    }

    async fn current_url(&self) -> String {
        get_page_url_with_fallback(&self.page).await
    }

    async fn title(&self) -> Option<String> {
        get_page_title_for_debug(&self.page).await
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .context("Failed to read page content")
    }

    async fn scroll_height(&self) -> Result<u64> {
        let height = self
            .page
            .evaluate(
                "Math.max(document.body ? document.body.scrollHeight : 0, \
                 document.documentElement ? document.documentElement.scrollHeight : 0)",
            )
            .await
            .context("Failed to read scroll height")?
            .into_value::<f64>()
            .context("Scroll height was not a number")?;
        Ok(height.max(0.0) as u64)
    }

    async fn scroll_to(&self, y: u64) -> Result<()> {
        let script = format!("window.scrollTo(0, {y})");
        self.page
            .evaluate(script.as_str())
            .await
            .context("Failed to scroll")?;
        Ok(())
    }

    async fn count(&self, locator: &Locator) -> Result<usize> {
        let script = format!("({}).length", matches_expr(locator));
        self.page
            .evaluate(script.as_str())
            .await
            .with_context(|| format!("Failed to count {locator}"))?
            .into_value::<usize>()
            .context("Match count was not a number")
    }

    async fn click(&self, locator: &Locator, nth: Nth, timeout: Duration) -> Result<()> {
        with_page_timeout(
            async {
                if !self.mark_target(locator, nth).await? {
                    return Err(anyhow!("No element matches {locator} at {nth:?}"));
                }
                let element = self
                    .page
                    .find_element(format!("[{TARGET_ATTR}]"))
                    .await
                    .with_context(|| format!("Marked element for {locator} disappeared"))?;
                element
                    .click()
                    .await
                    .with_context(|| format!("Failed to click {locator}"))?;
                Ok(())
            },
            timeout,
            "Click",
        )
        .await
    }

    async fn inner_html(&self, locator: &Locator, nth: Nth) -> Result<Option<String>> {
        let script = inner_html_script(locator, nth);

        let probe = self
            .page
            .evaluate(script.as_str())
            .await
            .with_context(|| format!("Failed to read inner HTML of {locator}"))?
            .into_value::<HtmlProbe>()
            .context("Unexpected inner HTML probe result")?;

        Ok(probe.found.then_some(probe.html))
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .with_context(|| format!("No input matches {selector}"))?;
        // Typing appends, so drop any prefilled value first
        self.page
            .evaluate(clear_value_script(selector).as_str())
            .await
            .with_context(|| format!("Failed to clear {selector}"))?;
        element
            .click()
            .await
            .with_context(|| format!("Failed to focus {selector}"))?;
        element
            .type_str(value)
            .await
            .with_context(|| format!("Failed to type into {selector}"))?;
        Ok(())
    }

    async fn attribute_values(&self, selector: &str, name: &str) -> Result<Vec<String>> {
        let script = format!(
            "Array.from(document.querySelectorAll({css}))\
             .map(n => n.getAttribute({attr}))\
             .filter(v => v !== null)",
            css = js_string(selector),
            attr = js_string(name),
        );

        self.page
            .evaluate(script.as_str())
            .await
            .with_context(|| format!("Failed to read {name} of {selector}"))?
            .into_value::<Vec<String>>()
            .context("Attribute values were not strings")
    }

    async fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        loop {
            for selector in selectors {
                if self.page.find_element(*selector).await.is_ok() {
                    debug!("Found {selector}");
                    return true;
                }
            }

            if Instant::now() >= deadline {
                trace!("None of {selectors:?} appeared within {timeout:?}");
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn cookies(&self) -> Result<Vec<SessionCookie>> {
        let cookies = self
            .page
            .get_cookies()
            .await
            .context("Failed to read browser cookies")?;
        Ok(cookies.into_iter().map(session_cookie_from_cdp).collect())
    }

    async fn set_cookies(&self, cookies: &[SessionCookie]) -> Result<()> {
        let params = cookies
            .iter()
            .map(cookie_param_from_session)
            .collect::<Result<Vec<_>>>()?;

        // Network.setCookies directly: Page::set_cookies refuses about:blank
        self.page
            .execute(SetCookiesParams::new(params))
            .await
            .context("Failed to install session cookies")?;
        Ok(())
    }
}

/// Tag the resolved match with `TARGET_ATTR`, evaluating to whether it exists.
fn mark_target_script(locator: &Locator, nth: Nth) -> String {
    format!(
        r"(() => {{
            document.querySelectorAll('[{TARGET_ATTR}]').forEach(n => n.removeAttribute('{TARGET_ATTR}'));
            const matches = {matches};
            const target = matches[{index}];
            if (!target) return false;
            target.setAttribute('{TARGET_ATTR}', '1');
            return true;
        }})()",
        matches = matches_expr(locator),
        index = index_expr(nth),
    )
}

fn inner_html_script(locator: &Locator, nth: Nth) -> String {
    format!(
        r"(() => {{
            const matches = {matches};
            const target = matches[{index}];
            return target ? {{ found: true, html: target.innerHTML }} : {{ found: false }};
        }})()",
        matches = matches_expr(locator),
        index = index_expr(nth),
    )
}

/// Empty the first input matching `selector`, firing `input` like a user edit.
fn clear_value_script(selector: &str) -> String {
    format!(
        r"(() => {{
            const input = document.querySelector({css});
            if (!input) return false;
            input.value = '';
            input.dispatchEvent(new Event('input', {{ bubbles: true }}));
            return true;
        }})()",
        css = js_string(selector),
    )
}

/// JS expression evaluating to the array of elements `locator` matches.
fn matches_expr(locator: &Locator) -> String {
    let all = format!(
        "Array.from(document.querySelectorAll({}))",
        js_string(locator.css())
    );
    match locator.text() {
        None => all,
        Some(text) => format!(
            "{all}.filter(n => (n.innerText || n.textContent || '').toLowerCase().includes({}))",
            js_string(&text.to_lowercase())
        ),
    }
}

/// JS index expression into the `matches` array.
fn index_expr(nth: Nth) -> String {
    match nth {
        Nth::First => "0".to_string(),
        Nth::Last => "matches.length - 1".to_string(),
        Nth::Index(i) => i.to_string(),
    }
}

fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn session_cookie_from_cdp(cookie: Cookie) -> SessionCookie {
    SessionCookie {
        name: cookie.name,
        value: cookie.value,
        domain: cookie.domain,
        path: cookie.path,
        expires: if cookie.session { -1.0 } else { cookie.expires },
        http_only: cookie.http_only,
        secure: cookie.secure,
        same_site: cookie.same_site.map(|s| same_site_label(&s).to_string()),
    }
}

fn cookie_param_from_session(cookie: &SessionCookie) -> Result<CookieParam> {
    let mut builder = CookieParam::builder()
        .name(cookie.name.clone())
        .value(cookie.value.clone())
        .domain(cookie.domain.clone())
        .path(cookie.path.clone())
        .http_only(cookie.http_only)
        .secure(cookie.secure);

    if !cookie.is_session_only() {
        builder = builder.expires(TimeSinceEpoch::new(cookie.expires));
    }
    if let Some(same_site) = cookie.same_site.as_deref().and_then(parse_same_site) {
        builder = builder.same_site(same_site);
    }

    builder
        .build()
        .map_err(|e| anyhow!("Invalid cookie {}: {e}", cookie.name))
}

fn same_site_label(same_site: &CookieSameSite) -> &'static str {
    match same_site {
        CookieSameSite::Strict => "Strict",
        CookieSameSite::Lax => "Lax",
        CookieSameSite::None => "None",
    }
}

fn parse_same_site(raw: &str) -> Option<CookieSameSite> {
    match raw.to_ascii_lowercase().as_str() {
        "strict" => Some(CookieSameSite::Strict),
        "lax" => Some(CookieSameSite::Lax),
        "none" => Some(CookieSameSite::None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_match_scripts_bind_matches_before_indexing() {
        let locator = Locator::Text {
            css: "div",
            text: "Contact info",
        };
        for script in [
            inner_html_script(&locator, Nth::Last),
            mark_target_script(&locator, Nth::Last),
        ] {
            let binding = script.find("const matches =").expect("matches is declared");
            let usage = script.find("matches.length - 1").expect("last index is used");
            assert!(binding < usage, "matches used before declaration in {script}");
        }
    }

    #[test]
    fn clear_value_script_targets_selector() {
        let script = clear_value_script("#username");
        assert!(script.contains("document.querySelector(\"#username\")"));
        assert!(script.contains("input.value = '';"));
    }

    #[test]
    fn text_locator_filters_case_insensitively() {
        let expr = matches_expr(&Locator::Text {
            css: "button",
            text: "Show All Skills",
        });
        assert!(expr.contains("querySelectorAll(\"button\")"));
        assert!(expr.contains(".includes(\"show all skills\")"));
    }

    #[test]
    fn css_with_quotes_is_escaped() {
        let expr = matches_expr(&Locator::Css("a[id='top-card-text-details-contact-info']"));
        assert_eq!(
            expr,
            "Array.from(document.querySelectorAll(\"a[id='top-card-text-details-contact-info']\"))"
        );
    }

    #[test]
    fn cookie_param_carries_expiry_and_same_site() {
        let mut cookie = SessionCookie::new("li_at", "token", ".linkedin.com");
        cookie.expires = 1_900_000_000.0;
        cookie.same_site = Some("None".to_string());
        cookie.secure = true;

        let param = cookie_param_from_session(&cookie).expect("valid cookie");
        assert_eq!(param.name, "li_at");
        assert_eq!(param.domain.as_deref(), Some(".linkedin.com"));
        assert!(param.expires.is_some());
        assert!(matches!(param.same_site, Some(CookieSameSite::None)));
    }

    #[test]
    fn session_only_cookie_has_no_expiry() {
        let cookie = SessionCookie::new("JSESSIONID", "ajax:1", ".www.linkedin.com");
        let param = cookie_param_from_session(&cookie).expect("valid cookie");
        assert!(param.expires.is_none());
        assert!(param.same_site.is_none());
    }
}
