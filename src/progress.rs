//! Step board shown while a run is in flight.
//!
//! Holds one entry per pipeline step and mirrors every update it observes.
//! Rendering goes to stderr so stdout stays reserved for the result.
use crate::pipeline::{PipelineStep, PipelineStepStatus, StepObserver, StepUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// One readable line per transition.
    Human,
    /// One JSON object per transition.
    JsonLines,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEntry {
    pub step: PipelineStep,
    pub status: PipelineStepStatus,
    pub message: Option<String>,
}

impl StepEntry {
    pub fn label(&self) -> String {
        format!("{}. {}", self.step.number(), self.step.label())
    }
}

pub struct StepBoard {
    entries: Vec<StepEntry>,
    style: ProgressStyle,
}

impl StepBoard {
    pub fn new(style: ProgressStyle) -> Self {
        let entries = PipelineStep::ALL
            .into_iter()
            .map(|step| StepEntry {
                step,
                status: PipelineStepStatus::Idle,
                message: None,
            })
            .collect();
        Self { entries, style }
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[StepEntry] {
        &self.entries
    }

    /// Replace the matching entry's status and message.
    pub fn apply(&mut self, update: &StepUpdate) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.step == update.step) {
            entry.status = update.status;
            entry.message = update.message.clone();
        }
    }

    fn render(&self, update: &StepUpdate) -> String {
        match self.style {
            ProgressStyle::JsonLines => {
                serde_json::to_string(update).unwrap_or_else(|_| format!("{update:?}"))
            }
            ProgressStyle::Human => {
                let Some(entry) = self.entries.iter().find(|entry| entry.step == update.step)
                else {
                    return String::new();
                };
                format_entry(entry)
            }
        }
    }
}

impl StepObserver for StepBoard {
    fn on_step_update(&mut self, update: &StepUpdate) {
        self.apply(update);
        eprintln!("{}", self.render(update));
    }
}

/// `[2/4] 2. Upload image bytes ... error: <message>`
pub fn format_entry(entry: &StepEntry) -> String {
    let mut line = format!(
        "[{}/{}] {} ... {}",
        entry.step.number(),
        PipelineStep::ALL.len(),
        entry.label(),
        entry.status.as_str()
    );
    if let Some(message) = &entry.message {
        line.push_str(": ");
        line.push_str(message);
    }
    line
}
