//! Helper functions for consistent chromiumoxide Page error handling
//!
//! These cover page reads that are only ever used for decisions or
//! diagnostics, where a failure should degrade to a placeholder instead of
//! propagating.

use chromiumoxide::page::Page;
use tracing::trace;

/// Get page URL with diagnostic fallback
///
/// Returns `"about:blank"` both when the browser call fails and when the page
/// has not navigated yet.
pub async fn get_page_url_with_fallback(page: &Page) -> String {
    match page.url().await {
        Ok(Some(url)) => url,
        Ok(None) => {
            trace!("Page URL is None (page not yet navigated)");
            "about:blank".to_string()
        }
        Err(e) => {
            trace!("Failed to get page URL (browser communication error): {}", e);
            "about:blank".to_string()
        }
    }
}

/// Get page title, `None` on any failure
pub async fn get_page_title_for_debug(page: &Page) -> Option<String> {
    match page.get_title().await {
        Ok(title) => title,
        Err(e) => {
            trace!("Failed to get page title: {}", e);
            None
        }
    }
}
