//! Bearer-authenticated JSON calls against the pipeline API.
use super::response::read_error_message;
use super::transport::{HttpRequest, Method, Transport};
use super::{PipelineError, PipelineStep};
use serde::Serialize;
use serde_json::Value;

/// JSON endpoints under the API base URL.
pub const GENERATE_PRESIGNED_URL_PATH: &str = "/pipeline/generate-presigned-url";
pub const UPLOAD_IMAGE_FROM_URL_PATH: &str = "/pipeline/upload-image-from-url";
pub const GENERATE_CAPTIONS_PATH: &str = "/pipeline/generate-captions";

/// API access shared by the JSON steps of one run.
pub struct ApiClient<'a> {
    pub transport: &'a dyn Transport,
    pub base_url: &'a str,
    pub token: &'a str,
}

impl ApiClient<'_> {
    /// POST `body` as JSON to `{base_url}{path}` and decode the JSON reply.
    ///
    /// Any failure is attributed to `step`; exactly one request is issued.
    pub fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        step: PipelineStep,
    ) -> Result<Value, PipelineError> {
        let payload = serde_json::to_vec(body)
            .map_err(|err| PipelineError::new(step, format!("encode request body: {err}")))?;
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(step = step.number(), %url, "POST");

        let response = self
            .transport
            .send(HttpRequest {
                method: Method::Post,
                url,
                headers: vec![
                    ("Authorization", format!("Bearer {}", self.token)),
                    ("Content-Type", "application/json".to_string()),
                ],
                body: &payload,
            })
            .map_err(|err| PipelineError::from_transport(step, &err))?;

        tracing::debug!(step = step.number(), status = response.status, "response");
        if !response.is_success() {
            return Err(PipelineError::new(step, read_error_message(&response)));
        }

        response.json().map_err(|err| {
            PipelineError::new(
                step,
                format!("Invalid JSON returned by API: {}", err.reason()),
            )
        })
    }
}
