//! Image content types accepted by the caption service.
use anyhow::{anyhow, Result};
use std::path::Path;

pub const SUPPORTED_CONTENT_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/heic",
];

/// Guess a content type from the file extension.
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

pub fn is_supported(content_type: &str) -> bool {
    SUPPORTED_CONTENT_TYPES.contains(&content_type)
}

/// Pick the content type for an upload: explicit override first, then the
/// extension. Rejects anything the service does not accept.
pub fn resolve_content_type(path: &Path, explicit: Option<&str>) -> Result<String> {
    let content_type = explicit
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .or_else(|| content_type_for_path(path).map(str::to_string));

    match content_type {
        Some(content_type) if is_supported(&content_type) => Ok(content_type),
        other => Err(anyhow!(
            "Unsupported file type: {}. Supported: {}",
            other.as_deref().unwrap_or("unknown"),
            SUPPORTED_CONTENT_TYPES.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_lookup_ignores_case() {
        assert_eq!(content_type_for_path(Path::new("a.JPG")), Some("image/jpeg"));
        assert_eq!(content_type_for_path(Path::new("dir/b.jpeg")), Some("image/jpeg"));
        assert_eq!(content_type_for_path(Path::new("c.HeIc")), Some("image/heic"));
        assert_eq!(content_type_for_path(Path::new("d.bmp")), None);
        assert_eq!(content_type_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn explicit_type_overrides_extension() {
        let content_type =
            resolve_content_type(Path::new("photo.png"), Some(" Image/WEBP ")).expect("webp");
        assert_eq!(content_type, "image/webp");
    }

    #[test]
    fn unsupported_types_are_rejected_with_the_supported_list() {
        let err = resolve_content_type(Path::new("scan.tiff"), None).expect_err("tiff");
        assert_eq!(
            err.to_string(),
            "Unsupported file type: unknown. Supported: image/jpeg, image/jpg, image/png, image/webp, image/gif, image/heic"
        );

        let err = resolve_content_type(Path::new("a.png"), Some("image/svg+xml"))
            .expect_err("svg");
        assert!(err.to_string().starts_with("Unsupported file type: image/svg+xml."));
    }
}
