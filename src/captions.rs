//! Display helpers for caption records.
//!
//! Records are opaque; these helpers only look for a few well-known keys and
//! fall back to the raw JSON.
use crate::pipeline::CaptionRecord;
use serde_json::Value;

const TEXT_KEYS: [&str; 4] = ["caption", "content", "text", "title"];
const ID_KEYS: [&str; 2] = ["id", "captionId"];

pub fn caption_text(record: &CaptionRecord) -> String {
    TEXT_KEYS
        .iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|text| !text.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Value::Object(record.clone()).to_string())
}

pub fn caption_id(record: &CaptionRecord, index: usize) -> String {
    ID_KEYS
        .iter()
        .find_map(|key| match record.get(*key)? {
            Value::Null => None,
            Value::String(id) => Some(id.clone()),
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| index.to_string())
}
