//! Pipeline state machine types and per-run reports.
//!
//! ## Design
//! - One `PipelineState` instance, owned by the orchestrator, mutated
//!   only through its transitions; everyone else reads value snapshots
//! - Step updates ({stt, classify, route, infer, tts}) flow to the
//!   observer collaborator for visualization, never back into core logic
//! - Each run produces a `PipelineReport` with the synthetic metrics the
//!   demo surfaces (complexity, confidence, latency)

use serde::{Deserialize, Serialize};

use crate::classify::ComplexityResult;
use crate::intent::IntentTag;
use crate::route::RoutingDecision;
use crate::tools::ToolCall;

pub mod orchestrator;

pub use orchestrator::Orchestrator;

// ── Pipeline state ───────────────────────────────────────────────

/// State of the single assistant pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Initial and terminal state — ready for a new utterance.
    Idle,
    /// Speech capture in progress.
    Listening,
    /// Classifying and routing on-device.
    Thinking,
    /// Escalated to the cloud path.
    Escalating,
    /// Rendering cards and speaking confirmations.
    Responding,
    /// Capture failed; auto-recovers to Idle after a cool-down.
    Error,
}

impl PipelineState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Thinking => "thinking",
            Self::Escalating => "escalating",
            Self::Responding => "responding",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Visualizer steps ─────────────────────────────────────────────

/// Steps shown by the pipeline visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Stt,
    Classify,
    Route,
    Infer,
    Tts,
}

impl PipelineStep {
    /// All steps in pipeline order.
    pub const ALL: &'static [PipelineStep] = &[
        PipelineStep::Stt,
        PipelineStep::Classify,
        PipelineStep::Route,
        PipelineStep::Infer,
        PipelineStep::Tts,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Stt => "stt",
            Self::Classify => "classify",
            Self::Route => "route",
            Self::Infer => "infer",
            Self::Tts => "tts",
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display state of one visualizer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepState {
    /// Step running on the local path.
    Active,
    /// Step running on the escalated cloud path.
    CloudActive,
    /// Step finished.
    Done,
}

impl StepState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::CloudActive => "cloud-active",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for StepState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Run report ───────────────────────────────────────────────────

/// Everything one pipeline run produced. Synthetic timings included —
/// these are demo display values, not measurements.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// The processed utterance.
    pub utterance: String,
    /// Detected intent tags (sorted for stable output).
    pub intents: Vec<IntentTag>,
    /// Complexity tier and threshold used for routing.
    pub complexity: ComplexityResult,
    /// Sampled confidence and chosen target.
    pub decision: RoutingDecision,
    /// Synthesized tool calls, in emission order.
    pub calls: Vec<ToolCall>,
    /// Synthetic inference latency shown on cards (ms).
    pub infer_latency_ms: u64,
    /// Wall-clock duration of the whole run (ms).
    pub total_ms: u64,
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_labels() {
        assert_eq!(PipelineState::Idle.label(), "idle");
        assert_eq!(PipelineState::Escalating.to_string(), "escalating");
    }

    #[test]
    fn steps_in_pipeline_order() {
        let ids: Vec<&str> = PipelineStep::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(ids, ["stt", "classify", "route", "infer", "tts"]);
    }

    #[test]
    fn step_state_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&StepState::CloudActive).unwrap(),
            "\"cloud-active\""
        );
    }
}
