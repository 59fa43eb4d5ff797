//! Ordered locator strategies for the profile page layouts the site serves.
//!
//! Every list is evaluated front to back and the first strategy with a match
//! wins, so layout fallbacks are changed here and nowhere else.

use tracing::trace;

use crate::browser::{BrowserPage, Locator, Nth};

/// Link that opens the contact-info overlay: known id, then href fragment,
/// then visible text.
pub const CONTACT_INFO_LINKS: &[Locator] = &[
    Locator::Css("a[id='top-card-text-details-contact-info']"),
    Locator::Css("a[href*='overlay/contact-info']"),
    Locator::Text {
        css: "a",
        text: "Contact info",
    },
];

/// Where the opened overlay's HTML lives. The text fallback matches every
/// enclosing `div`, so the innermost (last) match is taken.
pub const CONTACT_INFO_OVERLAYS: &[(Locator, Nth)] = &[
    (Locator::Css("div[role='dialog']"), Nth::First),
    (
        Locator::Text {
            css: "div",
            text: "Contact info",
        },
        Nth::Last,
    ),
];

/// Close button of the contact-info overlay.
pub const OVERLAY_DISMISS: Locator = Locator::Css("button[aria-label='Dismiss']");

/// Labels of the controls that reveal collapsed profile content.
pub const EXPAND_LABELS: &[&str] = &[
    "Show more",
    "See more",
    "Show all experiences",
    "Show all education",
    "Show all activities",
    "Show all about",
    "Show all projects",
    "Show all recommendations",
    "Show all skills",
];

/// Button locator for one expand label.
#[must_use]
pub const fn expand_control(label: &'static str) -> Locator {
    Locator::Text {
        css: "button",
        text: label,
    }
}

/// First locator in `candidates` with at least one match on the page.
///
/// A locator whose count cannot be evaluated is treated as absent.
pub async fn first_present<P: BrowserPage>(page: &P, candidates: &[Locator]) -> Option<Locator> {
    for locator in candidates {
        match page.count(locator).await {
            Ok(n) if n > 0 => return Some(*locator),
            Ok(_) => trace!("No match for {locator}"),
            Err(e) => trace!("Could not evaluate {locator}: {e:#}"),
        }
    }
    None
}
