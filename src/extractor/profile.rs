use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured profile record as returned by the model.
///
/// Every field is optional and loosely typed: the model may answer with a
/// list, free text, or nested records. Keys outside the known set are kept
/// in `extra` so nothing the model returned is lost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedProfile {
    #[serde(rename = "Full Name", default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<Value>,

    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Value>,

    #[serde(rename = "Phone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<Value>,

    #[serde(rename = "Skills", default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Value>,

    #[serde(rename = "Education", default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Value>,

    #[serde(rename = "Experience", default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Value>,

    #[serde(rename = "Projects", default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Value>,

    #[serde(rename = "URLs", default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Value>,

    /// Profile page the record was extracted from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExtractedProfile {
    /// Build from a resolved JSON object. Explicit `null`s read as absent.
    pub fn from_map(map: Map<String, Value>) -> serde_json::Result<Self> {
        let cleaned: Map<String, Value> = map.into_iter().filter(|(_, v)| !v.is_null()).collect();
        serde_json::from_value(Value::Object(cleaned))
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.linkedin_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        non_blank_str(self.full_name.as_ref())
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        non_blank_str(self.email.as_ref())
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        non_blank_str(self.phone.as_ref())
    }

    /// Skills as a flat list, whether the model answered with an array or
    /// comma-separated text.
    #[must_use]
    pub fn skills_list(&self) -> Vec<String> {
        match &self.skills {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(text)) => text
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// True when none of the eight profile fields carries a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.full_name,
            &self.email,
            &self.phone,
            &self.skills,
            &self.education,
            &self.experience,
            &self.projects,
            &self.urls,
        ]
        .iter()
        .all(|field| field.as_ref().is_none_or(is_empty_value))
    }
}

fn non_blank_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: Value) -> ExtractedProfile {
        match value {
            Value::Object(map) => ExtractedProfile::from_map(map).expect("valid profile"),
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn reads_source_field_names() {
        let p = profile(json!({
            "Full Name": "Jane Doe",
            "Email": "jane@x.com",
            "Skills": ["Go", "Python"]
        }));
        assert_eq!(p.full_name(), Some("Jane Doe"));
        assert_eq!(p.email(), Some("jane@x.com"));
        assert_eq!(p.skills_list(), vec!["Go", "Python"]);
        assert!(p.phone.is_none());
        assert!(p.education.is_none());
        assert!(p.extra.is_empty());
    }

    #[test]
    fn skills_from_comma_text() {
        let p = profile(json!({ "Skills": "Rust, Tokio ,, SQL " }));
        assert_eq!(p.skills_list(), vec!["Rust", "Tokio", "SQL"]);
    }

    #[test]
    fn keeps_unknown_keys_and_serializes_them_back() {
        let p = profile(json!({ "Full Name": "Jane", "Headline": "Engineer" }))
            .with_source_url("https://www.linkedin.com/in/jane");
        assert_eq!(p.extra["Headline"], "Engineer");

        let out = serde_json::to_value(&p).expect("serialize");
        assert_eq!(out["Headline"], "Engineer");
        assert_eq!(out["linkedin_url"], "https://www.linkedin.com/in/jane");
        assert!(out.get("Email").is_none());
    }

    #[test]
    fn nulls_and_blanks_are_empty() {
        let p = profile(json!({ "Full Name": null, "Email": "  ", "Skills": [] }));
        assert!(p.full_name.is_none());
        assert_eq!(p.email(), None);
        assert!(p.is_empty());
    }

    #[test]
    fn free_text_experience_is_preserved() {
        let p = profile(json!({ "Experience": "Acme 2019-2024" }));
        assert_eq!(p.experience, Some(json!("Acme 2019-2024")));
        assert!(!p.is_empty());
    }
}
