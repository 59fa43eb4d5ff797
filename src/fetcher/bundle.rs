use serde::Serialize;

pub const CONTACT_INFO_MARKER: &str = "\n\n<!-- CONTACT INFO START -->\n\n";
pub const SKILLS_PAGE_MARKER: &str = "\n\n<!-- SKILLS PAGE START -->\n\n";
pub const EXPERIENCE_PAGE_MARKER: &str = "\n\n<!-- EXPERIENCE PAGE START -->\n\n";

/// Result of one optional capture step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    Captured(String),
    Skipped(String),
}

impl StepOutcome {
    #[must_use]
    pub fn html(&self) -> Option<&str> {
        match self {
            Self::Captured(html) => Some(html),
            Self::Skipped(_) => None,
        }
    }

    #[must_use]
    pub fn is_captured(&self) -> bool {
        matches!(self, Self::Captured(_))
    }

    /// Empty captures count as skipped.
    pub(crate) fn from_html(html: String, what: &str) -> Self {
        if html.trim().is_empty() {
            Self::Skipped(format!("{what} was empty"))
        } else {
            Self::Captured(html)
        }
    }
}

/// Raw HTML captured for one profile: the main page plus up to three
/// optional sources.
#[derive(Debug, Clone, Serialize)]
pub struct RawProfileBundle {
    pub profile_url: String,
    pub main_html: String,
    pub contact: StepOutcome,
    pub skills: StepOutcome,
    pub experience: StepOutcome,
    /// Number of expand controls successfully clicked
    pub expanded_clicks: usize,
}

impl RawProfileBundle {
    /// Main HTML followed by each captured source behind its marker comment.
    /// Skipped sources contribute an empty section.
    #[must_use]
    pub fn to_html(&self) -> String {
        let sections = [
            (CONTACT_INFO_MARKER, &self.contact),
            (SKILLS_PAGE_MARKER, &self.skills),
            (EXPERIENCE_PAGE_MARKER, &self.experience),
        ];

        let extra: usize = sections
            .iter()
            .map(|(marker, outcome)| marker.len() + outcome.html().map_or(0, str::len))
            .sum();
        let mut html = String::with_capacity(self.main_html.len() + extra);
        html.push_str(&self.main_html);
        for (marker, outcome) in sections {
            html.push_str(marker);
            html.push_str(outcome.html().unwrap_or_default());
        }
        html
    }

    /// Names of the optional sources that were captured.
    #[must_use]
    pub fn captured_sections(&self) -> Vec<&'static str> {
        [
            ("contact", &self.contact),
            ("skills", &self.skills),
            ("experience", &self.experience),
        ]
        .into_iter()
        .filter(|(_, outcome)| outcome.is_captured())
        .map(|(name, _)| name)
        .collect()
    }
}
