//! Resolution ladder from raw model output to a JSON object.
//!
//! 1. parse the whole response
//! 2. parse the outermost brace-delimited span
//! 3. ask the model once to rewrite its output as JSON, then parse that
//!
//! Only the third stage calls the model again, and it is allowed to fail.

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::prompts::repair_prompt;
use crate::error::{ScrapeError, ScrapeResult};
use crate::llm::{CompletionRequest, LanguageModel};

/// First `{` through last `}`, across lines.
static BRACED_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{.*\}").expect("BRACED_SPAN: hardcoded regex is valid")
});

/// Which ladder stage produced the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionStage {
    Direct,
    Embedded,
    Repaired,
}

/// Stage 1: the whole (trimmed) response is a JSON object.
#[must_use]
pub fn parse_direct(raw: &str) -> Option<Map<String, Value>> {
    as_object(raw.trim())
}

/// Stage 2: a JSON object is embedded somewhere in prose.
#[must_use]
pub fn parse_embedded(raw: &str) -> Option<Map<String, Value>> {
    BRACED_SPAN
        .find(raw)
        .and_then(|span| as_object(span.as_str()))
}

fn as_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
#[must_use]
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map_or(stripped, str::trim)
        }
        None => text,
    }
}

/// Run the full ladder over `raw`.
///
/// `model_name` is used for the repair call, which carries no system
/// instruction and default sampling.
pub async fn resolve_json<M: LanguageModel>(
    model: &M,
    model_name: &str,
    raw: &str,
) -> ScrapeResult<(Map<String, Value>, ResolutionStage)> {
    if let Some(map) = parse_direct(raw) {
        return Ok((map, ResolutionStage::Direct));
    }
    debug!("Model output is not bare JSON, trying embedded object");

    if let Some(map) = parse_embedded(raw) {
        return Ok((map, ResolutionStage::Embedded));
    }
    warn!("No parseable JSON object in model output, asking model to repair it");

    let request = CompletionRequest::new(model_name, repair_prompt(raw.trim()));
    let repaired = model.complete(&request).await?;
    debug!("Repaired model output: {repaired}");

    let cleaned = strip_json_fences(&repaired);
    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => Ok((map, ResolutionStage::Repaired)),
        Ok(other) => Err(ScrapeError::Extraction(format!(
            "repaired model output is JSON but not an object: {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ScrapeError::Extraction(format!(
            "model output is still not valid JSON after repair: {e}"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
