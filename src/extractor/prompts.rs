/// Fields the model is asked to fill, in prompt order.
pub const PROFILE_FIELDS: &[&str] = &[
    "Full Name",
    "Email",
    "Phone",
    "Skills",
    "Education",
    "Experience",
    "Projects",
    "URLs",
];

pub const SYSTEM_PROMPT: &str = "You are an AI assistant that extracts LinkedIn profile data from raw text.
Extract the following fields into a pure JSON object:
- Full Name
- Email
- Phone
- Skills
- Education
- Experience
- Projects
- URLs";

/// Primary extraction request for `text`.
#[must_use]
pub fn extraction_prompt(text: &str) -> String {
    let fields: String = PROFILE_FIELDS
        .iter()
        .map(|field| format!("- {field}\n"))
        .collect();
    format!(
        "Extract the following fields from the LinkedIn text and return JSON only:\n{fields}\nTEXT:\n{text}\n"
    )
}

/// Follow-up request asking the model to turn its own malformed output into JSON.
#[must_use]
pub fn repair_prompt(raw: &str) -> String {
    format!("Convert the following into valid JSON only:\n{raw}")
}
