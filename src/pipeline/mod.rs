//! Caption-generation pipeline.
//!
//! A run drives one image through four dependent remote operations, in
//! order, and stops at the first failure:
//!
//! 1. obtain a presigned upload destination,
//! 2. transfer the image bytes to it,
//! 3. register the uploaded image with the service,
//! 4. generate captions for the registered image.
//!
//! Every status change is reported to an optional [`StepObserver`]. Nothing
//! is shared between runs except the transport and the base URL.
mod client;
mod error;
mod response;
mod run;
mod steps;
pub(crate) mod transport;

pub use error::{PipelineError, TransportError};
pub use run::{run_caption_pipeline, PipelineRequest};
pub use transport::UreqTransport;

use serde::{Serialize, Serializer};

/// Default origin for all JSON endpoints.
pub const DEFAULT_API_BASE_URL: &str = "https://api.almostcrackd.ai";

/// One of the four ordered pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStep {
    PresignUpload,
    UploadBytes,
    RegisterImage,
    GenerateCaptions,
}

impl PipelineStep {
    pub const ALL: [PipelineStep; 4] = [
        PipelineStep::PresignUpload,
        PipelineStep::UploadBytes,
        PipelineStep::RegisterImage,
        PipelineStep::GenerateCaptions,
    ];

    /// Ordinal in `1..=4`.
    pub fn number(self) -> u8 {
        match self {
            PipelineStep::PresignUpload => 1,
            PipelineStep::UploadBytes => 2,
            PipelineStep::RegisterImage => 3,
            PipelineStep::GenerateCaptions => 4,
        }
    }

    /// Human label used by progress displays.
    pub fn label(self) -> &'static str {
        match self {
            PipelineStep::PresignUpload => "Generate presigned upload URL",
            PipelineStep::UploadBytes => "Upload image bytes",
            PipelineStep::RegisterImage => "Register uploaded image URL",
            PipelineStep::GenerateCaptions => "Generate captions",
        }
    }
}

impl Serialize for PipelineStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

/// Per-step status. `Success` and `Error` are terminal within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStepStatus {
    #[default]
    Idle,
    Running,
    Success,
    Error,
}

impl PipelineStepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStepStatus::Idle => "idle",
            PipelineStepStatus::Running => "running",
            PipelineStepStatus::Success => "success",
            PipelineStepStatus::Error => "error",
        }
    }
}

/// Event emitted on every step status change.
///
/// `message` is only set on `Error` transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepUpdate {
    pub step: PipelineStep,
    pub status: PipelineStepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StepUpdate {
    pub fn running(step: PipelineStep) -> Self {
        Self {
            step,
            status: PipelineStepStatus::Running,
            message: None,
        }
    }

    pub fn success(step: PipelineStep) -> Self {
        Self {
            step,
            status: PipelineStepStatus::Success,
            message: None,
        }
    }

    pub fn error(step: PipelineStep, message: impl Into<String>) -> Self {
        Self {
            step,
            status: PipelineStepStatus::Error,
            message: Some(message.into()),
        }
    }
}

/// Receives step updates during a run. Side-effect only: the pipeline
/// behaves identically with or without an observer.
pub trait StepObserver {
    fn on_step_update(&mut self, update: &StepUpdate);
}

impl<F> StepObserver for F
where
    F: FnMut(&StepUpdate),
{
    fn on_step_update(&mut self, update: &StepUpdate) {
        self(update)
    }
}

/// Opaque caption record; the schema belongs to the remote service.
pub type CaptionRecord = serde_json::Map<String, serde_json::Value>;

/// Output of a fully successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub cdn_url: String,
    pub image_id: String,
    pub captions: Vec<CaptionRecord>,
}
