use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ScrapeError, ScrapeResult};
use crate::utils::{PEOPLE_SEARCH_PATH, SEARCH_ORIGIN};

/// Free-text people search. All fields are optional; callers require at
/// least a role or skills (see [`SearchQuery::is_actionable`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub role: Option<String>,
    pub skills: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
}

impl SearchQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn skills(mut self, skills: impl Into<String>) -> Self {
        self.skills = Some(skills.into());
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = Some(experience.into());
        self
    }

    /// At least one of role or skills is non-blank.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        [&self.role, &self.skills]
            .iter()
            .any(|field| field.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }

    /// Role, skills and location joined by single spaces, blanks skipped.
    /// Experience is appended only when `include_experience` is set.
    #[must_use]
    pub fn keywords(&self, include_experience: bool) -> String {
        let experience = if include_experience {
            self.experience.as_deref()
        } else {
            None
        };

        [
            self.role.as_deref(),
            self.skills.as_deref(),
            self.location.as_deref(),
            experience,
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// People-search results URL on `site_url` with percent-encoded keywords.
    pub fn search_url(&self, site_url: &str, include_experience: bool) -> ScrapeResult<String> {
        let base = format!("{}{PEOPLE_SEARCH_PATH}", site_url.trim_end_matches('/'));
        let mut url = Url::parse(&base)
            .map_err(|e| ScrapeError::InvalidUrl(format!("{base}: {e}")))?;
        url.query_pairs_mut()
            .append_pair("keywords", &self.keywords(include_experience))
            .append_pair("origin", SEARCH_ORIGIN);
        Ok(url.into())
    }
}
