//! Response interpretation helpers shared by every step.
use super::transport::HttpResponse;
use super::{PipelineError, PipelineStep};
use serde_json::Value;

/// Produce one displayable message for a failed response.
///
/// Prefers a JSON `message`, then a JSON `error`, then the plain-text body,
/// and falls back to `"<status> <statusText>"`. Never fails.
pub fn read_error_message(response: &HttpResponse) -> String {
    let fallback = format!("{} {}", response.status, response.status_text)
        .trim()
        .to_string();

    let content_type = response.header("content-type").unwrap_or_default();
    if content_type.contains("application/json") {
        let Ok(json) = response.json() else {
            return fallback;
        };
        return non_blank_field(&json, "message")
            .or_else(|| non_blank_field(&json, "error"))
            .map(str::to_string)
            .unwrap_or(fallback);
    }

    match response.text() {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => fallback,
    }
}

fn non_blank_field<'a>(json: &'a Value, key: &str) -> Option<&'a str> {
    json.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

/// Require `value` to be a non-blank string; returns it untrimmed.
pub fn require_string(
    value: Option<&Value>,
    label: &str,
    step: PipelineStep,
) -> Result<String, PipelineError> {
    match value.and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(PipelineError::new(
            step,
            format!("Invalid {label} returned by API."),
        )),
    }
}
