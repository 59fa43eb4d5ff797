//! Browser automation surface
//!
//! Every component that drives a page does so through [`BrowserPage`], so the
//! session, fetcher and search logic run unchanged against the chromiumoxide
//! implementation or a scripted test double.

pub mod chromium;
pub mod page_helpers;
pub mod stealth;
pub mod timeout;
pub mod wrapper;

use anyhow::Result;
use std::fmt;
use std::time::Duration;

use crate::session::SessionCookie;

pub use chromium::ChromiumPage;
pub use timeout::with_page_timeout;
pub use wrapper::BrowserWrapper;

/// How to find elements on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locator {
    /// Plain CSS selector
    Css(&'static str),
    /// Elements matching `css` whose rendered text contains `text`, case-insensitively
    Text {
        css: &'static str,
        text: &'static str,
    },
}

impl Locator {
    #[must_use]
    pub const fn css(&self) -> &'static str {
        match self {
            Self::Css(css) | Self::Text { css, .. } => css,
        }
    }

    #[must_use]
    pub const fn text(&self) -> Option<&'static str> {
        match self {
            Self::Css(_) => None,
            Self::Text { text, .. } => Some(text),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(css) => write!(f, "{css}"),
            Self::Text { css, text } => write!(f, "{css}:has-text(\"{text}\")"),
        }
    }
}

/// Which of several matching elements to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nth {
    First,
    Last,
    Index(usize),
}

impl Nth {
    /// Resolve against a match count. `None` when out of range.
    #[must_use]
    pub fn resolve(self, count: usize) -> Option<usize> {
        match self {
            Self::First if count > 0 => Some(0),
            Self::Last if count > 0 => Some(count - 1),
            Self::Index(i) if i < count => Some(i),
            _ => None,
        }
    }
}

/// A single cookie-bearing page that can be navigated and inspected.
///
/// Implementations are driven strictly sequentially; no method is called
/// while another is in flight.
#[allow(async_fn_in_trait)]
pub trait BrowserPage {
    /// Navigate and wait for the load event.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Current URL, `about:blank` when unavailable.
    async fn current_url(&self) -> String;

    async fn title(&self) -> Option<String>;

    /// Full rendered HTML of the document.
    async fn content(&self) -> Result<String>;

    async fn scroll_height(&self) -> Result<u64>;

    async fn scroll_to(&self, y: u64) -> Result<()>;

    /// Number of elements matching `locator`.
    async fn count(&self, locator: &Locator) -> Result<usize>;

    /// Click one match, giving up after `timeout`.
    async fn click(&self, locator: &Locator, nth: Nth, timeout: Duration) -> Result<()>;

    /// Inner HTML of one match, `None` when there is no such element.
    async fn inner_html(&self, locator: &Locator, nth: Nth) -> Result<Option<String>>;

    /// Replace the value of the first input matching `selector` with `value`,
    /// typed as key events.
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Values of attribute `name` across all elements matching `selector`, in document order.
    async fn attribute_values(&self, selector: &str, name: &str) -> Result<Vec<String>>;

    /// Wait until any of `selectors` is present. Returns false on timeout.
    async fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> bool;

    async fn cookies(&self) -> Result<Vec<SessionCookie>>;

    async fn set_cookies(&self, cookies: &[SessionCookie]) -> Result<()>;
}

/// Scroll from top to bottom in fixed steps so lazily rendered sections load.
pub async fn scroll_full_page<P: BrowserPage>(
    page: &P,
    step_px: u64,
    step_delay: Duration,
) -> Result<()> {
    let height = page.scroll_height().await?;
    let step = step_px.max(1);

    let mut y = 0;
    while y < height {
        page.scroll_to(y).await?;
        tokio::time::sleep(step_delay).await;
        y += step;
    }
    Ok(())
}
