//! Orchestrates one pipeline run.
use super::client::ApiClient;
use super::steps::{generate_captions, generate_presigned_url, register_image, upload_image_bytes};
use super::transport::Transport;
use super::{PipelineError, PipelineResult, PipelineStep, StepObserver, StepUpdate};
use std::time::Instant;

const MISSING_TOKEN: &str = "Missing access token. Please sign in again.";

/// Inputs for a single run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineRequest<'a> {
    pub base_url: &'a str,
    pub token: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// Drive an image through all four steps and assemble the result.
///
/// Steps run strictly in order. The first failure is reported to the
/// observer as an `error` update and returned; later steps never start.
/// Nothing already done remotely is rolled back and nothing is retried.
pub fn run_caption_pipeline(
    transport: &dyn Transport,
    request: &PipelineRequest<'_>,
    observer: Option<&mut dyn StepObserver>,
) -> Result<PipelineResult, PipelineError> {
    if request.token.trim().is_empty() {
        return Err(PipelineError::new(PipelineStep::PresignUpload, MISSING_TOKEN));
    }

    let api = ApiClient {
        transport,
        base_url: request.base_url,
        token: request.token,
    };
    let mut tracker = StepTracker { observer };

    let target = tracker.run(PipelineStep::PresignUpload, || {
        generate_presigned_url(&api, request.content_type)
    })?;
    tracker.run(PipelineStep::UploadBytes, || {
        upload_image_bytes(
            &api,
            &target.presigned_url,
            request.content_type,
            request.bytes,
        )
    })?;
    let image_id = tracker.run(PipelineStep::RegisterImage, || {
        register_image(&api, &target.cdn_url)
    })?;
    let captions = tracker.run(PipelineStep::GenerateCaptions, || {
        generate_captions(&api, &image_id)
    })?;

    tracing::info!(
        image_id = %image_id,
        captions = captions.len(),
        "caption pipeline complete"
    );
    Ok(PipelineResult {
        cdn_url: target.cdn_url,
        image_id,
        captions,
    })
}

/// Emits `running` before a step and exactly one terminal update after it.
struct StepTracker<'o> {
    observer: Option<&'o mut dyn StepObserver>,
}

impl StepTracker<'_> {
    fn run<T>(
        &mut self,
        step: PipelineStep,
        body: impl FnOnce() -> Result<T, PipelineError>,
    ) -> Result<T, PipelineError> {
        self.emit(StepUpdate::running(step));
        let start = Instant::now();
        match body() {
            Ok(value) => {
                tracing::info!(
                    step = step.number(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "step succeeded"
                );
                self.emit(StepUpdate::success(step));
                Ok(value)
            }
            Err(err) => {
                // Step functions attribute their own errors; pin the step here
                // so an update and the returned error never disagree.
                let err = PipelineError::new(step, err.message);
                tracing::warn!(
                    step = step.number(),
                    elapsed_ms = start.elapsed().as_millis(),
                    error = %err,
                    "step failed"
                );
                self.emit(StepUpdate::error(step, err.message.clone()));
                Err(err)
            }
        }
    }

    fn emit(&mut self, update: StepUpdate) {
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.on_step_update(&update);
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
