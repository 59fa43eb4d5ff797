//! Persisted cookie shape and the session value built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One browser cookie as stored in the session file.
///
/// Field names follow the cookie array Playwright's `storage_state` writes,
/// so existing session files load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Unix seconds; `-1` marks a session cookie
    #[serde(default = "session_expiry")]
    pub expires: f64,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

fn default_path() -> String {
    "/".to_string()
}

fn session_expiry() -> f64 {
    -1.0
}

impl SessionCookie {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: default_path(),
            expires: session_expiry(),
            http_only: false,
            secure: false,
            same_site: None,
        }
    }

    /// Cookie has no expiry and lives only as long as the browser.
    #[must_use]
    pub fn is_session_only(&self) -> bool {
        self.expires <= 0.0
    }
}

/// Where the cookies of a `Session` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionOrigin {
    /// Loaded from the store and accepted by the site
    Restored,
    /// Produced by an interactive login during this run
    FreshLogin,
}

/// An authenticated cookie set bound to the target site.
///
/// Validity is only ever discovered lazily: a navigation that lands back on
/// the login page means the site no longer accepts it.
#[derive(Debug, Clone)]
pub struct Session {
    cookies: Vec<SessionCookie>,
    origin: SessionOrigin,
    acquired_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn new(cookies: Vec<SessionCookie>, origin: SessionOrigin) -> Self {
        Self {
            cookies,
            origin,
            acquired_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn cookies(&self) -> &[SessionCookie] {
        &self.cookies
    }

    #[must_use]
    pub fn origin(&self) -> SessionOrigin {
        self.origin
    }

    #[must_use]
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_playwright_cookie_array() {
        let raw = r#"[
            {"name": "li_at", "value": "AQED", "domain": ".www.linkedin.com", "path": "/",
             "expires": 1767225600.5, "httpOnly": true, "secure": true, "sameSite": "None"},
            {"name": "lang", "value": "v=2&lang=en-us", "domain": ".linkedin.com"}
        ]"#;

        let cookies: Vec<SessionCookie> = serde_json::from_str(raw).expect("valid cookie array");
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].http_only);
        assert_eq!(cookies[0].same_site.as_deref(), Some("None"));
        assert!(!cookies[0].is_session_only());
        assert_eq!(cookies[1].path, "/");
        assert!(cookies[1].is_session_only());
    }

    #[test]
    fn writes_camel_case_keys() {
        let mut cookie = SessionCookie::new("li_at", "token", ".linkedin.com");
        cookie.http_only = true;
        let json = serde_json::to_string(&cookie).expect("serializable");
        assert!(json.contains("\"httpOnly\":true"));
        assert!(!json.contains("sameSite"));
    }
}
