use std::collections::HashSet;

use crate::utils::{PROFILE_URL_MARKER, absolutize, strip_query};

/// Normalize raw anchor hrefs into at most `max` distinct profile URLs,
/// keeping first-seen order.
///
/// Each href is made absolute on `site_url` and its query string dropped;
/// anything that is not a profile URL afterwards is ignored.
pub fn collect_profile_links<I, S>(hrefs: I, site_url: &str, max: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs {
        if links.len() >= max {
            break;
        }
        let href = href.as_ref().trim();
        if href.is_empty() {
            continue;
        }
        let absolute = absolutize(href, site_url);
        let link = strip_query(&absolute);
        if !link.contains(PROFILE_URL_MARKER) {
            continue;
        }
        if seen.insert(link.to_string()) {
            links.push(link.to_string());
        }
    }

    links
}
