//! URL helpers for profile and search pages.

use url::Url;

/// Check if a URL can be navigated to by the scraper
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}

/// Drop everything from the first `?` onward.
#[must_use]
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Canonical profile base URL: query string removed, trailing slashes trimmed.
///
/// `https://www.linkedin.com/in/jane-doe/?trk=x` becomes
/// `https://www.linkedin.com/in/jane-doe`, onto which `details/...` sub-page
/// paths are appended.
#[must_use]
pub fn profile_base_url(url: &str) -> &str {
    strip_query(url).trim_end_matches('/')
}

/// Turn a site-relative href into an absolute URL on `site_url`.
#[must_use]
pub fn absolutize(href: &str, site_url: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", site_url.trim_end_matches('/'), href)
    }
}

/// The page is (still) the login form.
#[must_use]
pub fn is_login_page(url: &str) -> bool {
    strip_query(url).contains("login")
}

/// The site bounced us to a login or auth-wall interstitial.
///
/// Only the path is inspected so search keywords in the query string cannot
/// trigger a false positive.
#[must_use]
pub fn is_auth_wall(url: &str) -> bool {
    let path = strip_query(url);
    path.contains("login") || path.contains("authwall")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_navigable_urls() {
        assert!(is_valid_url("https://www.linkedin.com/in/jane-doe"));
        assert!(is_valid_url("http://localhost:8080/in/x"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("linkedin.com/in/jane"));
    }

    #[test]
    fn base_url_strips_query_and_trailing_slash() {
        assert_eq!(
            profile_base_url("https://www.linkedin.com/in/jane-doe/?miniProfileUrn=abc"),
            "https://www.linkedin.com/in/jane-doe"
        );
        assert_eq!(
            profile_base_url("https://www.linkedin.com/in/jane-doe"),
            "https://www.linkedin.com/in/jane-doe"
        );
    }

    #[test]
    fn absolutize_prefixes_relative_paths() {
        assert_eq!(
            absolutize("/in/jane", "https://www.linkedin.com/"),
            "https://www.linkedin.com/in/jane"
        );
        assert_eq!(
            absolutize("https://example.com/in/jane", "https://www.linkedin.com"),
            "https://example.com/in/jane"
        );
    }

    #[test]
    fn auth_wall_ignores_query_string() {
        assert!(is_auth_wall("https://www.linkedin.com/authwall?trk=people"));
        assert!(is_auth_wall("https://www.linkedin.com/uas/login?session_redirect=x"));
        assert!(!is_auth_wall(
            "https://www.linkedin.com/search/results/people/?keywords=login+engineer"
        ));
        assert!(is_login_page("https://www.linkedin.com/login"));
        assert!(!is_login_page("https://www.linkedin.com/feed/"));
    }
}
