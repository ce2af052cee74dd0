//! Error types for the caption pipeline.
//!
//! `PipelineError` is the only error the orchestrator hands back to callers.
//! `TransportError` describes failures below the HTTP status line and is
//! always wrapped with step attribution before it leaves the pipeline.
use super::PipelineStep;
use thiserror::Error;

/// A failure attributed to the pipeline step that produced it.
///
/// Displays as the bare message so callers can show it verbatim next to
/// their own step label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PipelineError {
    pub step: PipelineStep,
    pub message: String,
}

impl PipelineError {
    pub fn new(step: PipelineStep, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }

    /// Wrap a transport failure, keeping its text as the message.
    pub fn from_transport(step: PipelineStep, err: &TransportError) -> Self {
        Self::new(step, err.to_string())
    }
}

/// Failures raised by a [`Transport`](super::transport::Transport) or while
/// decoding a response body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("read response body: {0}")]
    Body(String),
    #[error("decode response JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    /// The underlying reason without the URL prefix.
    pub fn reason(&self) -> String {
        match self {
            TransportError::Request { reason, .. } => reason.clone(),
            TransportError::Body(reason) => reason.clone(),
            TransportError::Json(err) => err.to_string(),
        }
    }
}
