//! Result rendering.
use crate::captions::{caption_id, caption_text};
use crate::pipeline::PipelineResult;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

pub fn render_result(result: &PipelineResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("cdnUrl: {}\n", result.cdn_url));
    out.push_str(&format!("imageId: {}\n", result.image_id));
    if result.captions.is_empty() {
        out.push_str("No captions returned.\n");
        return out;
    }
    out.push_str(&format!("Captions ({}):\n", result.captions.len()));
    for (index, record) in result.captions.iter().enumerate() {
        out.push_str(&format!(
            "  [{}] {}\n",
            caption_id(record, index),
            caption_text(record)
        ));
    }
    out
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize result")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
