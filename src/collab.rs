//! Collaborator contracts for the pipeline's I/O edges.
//!
//! Speech capture, confirmation playback, card rendering, and pipeline
//! visualization are external adapters around platform audio/display
//! capabilities. The core only sees these trait seams; `console.rs`
//! provides the terminal implementations the demo runs with.

use async_trait::async_trait;

use crate::pipeline::{PipelineStep, StepState};
use crate::route::RoutingTarget;
use crate::tools::ToolCall;

// ── Capture errors ───────────────────────────────────────────────

/// Error reported by the speech capture collaborator.
///
/// Mirrors the error codes a platform speech recognizer emits. Only
/// non-cancellation errors put the pipeline into the visible Error state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    /// Capture was deliberately stopped by the user.
    #[error("speech capture aborted")]
    Aborted,
    /// The recognizer heard nothing usable.
    #[error("no speech detected")]
    NoSpeech,
    /// Microphone could not be opened.
    #[error("audio capture unavailable")]
    AudioCapture,
    /// Recognizer backend failure.
    #[error("speech service error: {0}")]
    Service(String),
}

impl CaptureError {
    /// Cancellations return the machine to idle without entering Error.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

// ── Collaborator traits ──────────────────────────────────────────

/// Confirmation playback collaborator.
#[async_trait]
pub trait SpeechPlayback: Send + Sync {
    /// Speak the confirmation text.
    ///
    /// Implementations complete rather than error — a failed playback is
    /// reported by logging and resolving. The orchestrator owns the hard
    /// timeout ceiling, so an unreliable backend cannot stall the machine.
    async fn speak(&self, text: &str);
}

/// Result card renderer. Called once per tool call, in emission order.
#[async_trait]
pub trait CardRenderer: Send + Sync {
    async fn render(&self, call: &ToolCall, target: RoutingTarget, latency_ms: u64);
}

/// Pipeline step visualizer. Purely observational — nothing it does
/// feeds back into core logic.
pub trait PipelineObserver: Send + Sync {
    fn step_update(&self, step: PipelineStep, state: StepState, elapsed_ms: Option<u64>);
}

/// Observer that discards all updates (headless runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn step_update(&self, _step: PipelineStep, _state: StepState, _elapsed_ms: Option<u64>) {}
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_is_a_cancellation() {
        assert!(CaptureError::Aborted.is_cancellation());
        assert!(!CaptureError::NoSpeech.is_cancellation());
        assert!(!CaptureError::AudioCapture.is_cancellation());
        assert!(!CaptureError::Service("network".into()).is_cancellation());
    }

    #[test]
    fn capture_error_messages() {
        assert_eq!(
            CaptureError::Service("network".into()).to_string(),
            "speech service error: network"
        );
        assert_eq!(CaptureError::NoSpeech.to_string(), "no speech detected");
    }
}
