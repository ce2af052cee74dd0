//! The four remote operations, one function per step.
//!
//! Each function performs exactly one network call and validates what it
//! needs from the reply before anything downstream trusts it.
use super::client::{
    ApiClient, GENERATE_CAPTIONS_PATH, GENERATE_PRESIGNED_URL_PATH, UPLOAD_IMAGE_FROM_URL_PATH,
};
use super::response::{read_error_message, require_string};
use super::transport::{redact_query, HttpRequest, Method};
use super::{CaptionRecord, PipelineError, PipelineStep};
use serde::Serialize;
use serde_json::Value;

const UPLOAD_FAILED: &str = "Upload failed";

/// Destination returned by step 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub presigned_url: String,
    pub cdn_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PresignRequest<'a> {
    content_type: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest<'a> {
    image_url: &'a str,
    is_common_use: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CaptionsRequest<'a> {
    image_id: &'a str,
}

/// Step 1: ask the service where to upload an image of `content_type`.
pub fn generate_presigned_url(
    api: &ApiClient<'_>,
    content_type: &str,
) -> Result<UploadTarget, PipelineError> {
    let step = PipelineStep::PresignUpload;
    let reply = api.post_json(
        GENERATE_PRESIGNED_URL_PATH,
        &PresignRequest { content_type },
        step,
    )?;
    Ok(UploadTarget {
        presigned_url: require_string(reply.get("presignedUrl"), "presignedUrl", step)?,
        cdn_url: require_string(reply.get("cdnUrl"), "cdnUrl", step)?,
    })
}

/// Step 2: PUT the raw bytes to the presigned URL.
///
/// No bearer token is sent; the URL itself authorizes the write.
pub fn upload_image_bytes(
    api: &ApiClient<'_>,
    presigned_url: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<(), PipelineError> {
    let step = PipelineStep::UploadBytes;
    tracing::debug!(
        step = step.number(),
        url = %redact_query(presigned_url),
        bytes = bytes.len(),
        "PUT"
    );

    let response = api
        .transport
        .send(HttpRequest {
            method: Method::Put,
            url: presigned_url.to_string(),
            headers: vec![("Content-Type", content_type.to_string())],
            body: bytes,
        })
        .map_err(|err| {
            let reason = err.reason();
            if reason.trim().is_empty() {
                PipelineError::new(step, UPLOAD_FAILED)
            } else {
                PipelineError::new(step, reason)
            }
        })?;

    tracing::debug!(step = step.number(), status = response.status, "response");
    if !response.is_success() {
        return Err(PipelineError::new(step, read_error_message(&response)));
    }
    Ok(())
}

/// Step 3: register the uploaded CDN URL and return the new image id.
pub fn register_image(api: &ApiClient<'_>, cdn_url: &str) -> Result<String, PipelineError> {
    let step = PipelineStep::RegisterImage;
    let reply = api.post_json(
        UPLOAD_IMAGE_FROM_URL_PATH,
        &RegisterRequest {
            image_url: cdn_url,
            is_common_use: false,
        },
        step,
    )?;
    require_string(reply.get("imageId"), "imageId", step)
}

/// Step 4: generate captions for a registered image.
///
/// Entries that are not JSON objects are dropped; order is preserved.
pub fn generate_captions(
    api: &ApiClient<'_>,
    image_id: &str,
) -> Result<Vec<CaptionRecord>, PipelineError> {
    let step = PipelineStep::GenerateCaptions;
    let reply = api.post_json(GENERATE_CAPTIONS_PATH, &CaptionsRequest { image_id }, step)?;
    let Value::Array(entries) = reply else {
        return Err(PipelineError::new(
            step,
            "Invalid captions response returned by API.",
        ));
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::Object(record) => Some(record),
            _ => None,
        })
        .collect())
}
