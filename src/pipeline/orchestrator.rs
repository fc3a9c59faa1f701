//! Pipeline orchestration: capture → classify → route → infer → respond.
//!
//! Owns the single `PipelineState` and drives one utterance at a time
//! through the simulated suspend points. At most one run is ever active:
//! submissions while the machine is not idle are rejected under the state
//! lock, never interleaved. Confirmation playback is raced against a hard
//! timeout and a voice-toggle cancellation so an unreliable audio
//! collaborator can never stall the machine.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::time::{sleep, timeout};

use super::{PipelineReport, PipelineState, PipelineStep, StepState};
use crate::classify::classify;
use crate::collab::{CaptureError, CardRenderer, PipelineObserver, SpeechPlayback};
use crate::config::Config;
use crate::intent::detect_intents;
use crate::route::{self, Sampler};
use crate::tools::{synthesize, ToolCatalog};

/// Synthetic latency reported on cards for the escalated path (ms).
const CLOUD_REPORTED_MS: std::ops::Range<u64> = 200..500;
/// Synthetic latency reported on cards for the on-device path (ms).
const DEVICE_REPORTED_MS: std::ops::Range<u64> = 50..130;

// ── Orchestrator ─────────────────────────────────────────────────

/// Drives the assistant pipeline and owns its state machine.
pub struct Orchestrator {
    /// The single pipeline state. Mutated only here; observers get
    /// copies via [`Orchestrator::state`].
    state: Mutex<PipelineState>,
    /// Confirmation voice toggle, flippable between suspend points.
    voice_enabled: AtomicBool,
    /// Wakes an in-flight playback wait when the voice is disabled.
    voice_cancel: Notify,
    config: Config,
    sampler: Box<dyn Sampler>,
    playback: Box<dyn SpeechPlayback>,
    renderer: Box<dyn CardRenderer>,
    observer: Box<dyn PipelineObserver>,
}

impl Orchestrator {
    pub fn new(
        config: Config,
        sampler: Box<dyn Sampler>,
        playback: Box<dyn SpeechPlayback>,
        renderer: Box<dyn CardRenderer>,
        observer: Box<dyn PipelineObserver>,
    ) -> Self {
        Self {
            state: Mutex::new(PipelineState::Idle),
            voice_enabled: AtomicBool::new(config.voice.enabled),
            voice_cancel: Notify::new(),
            config,
            sampler,
            playback,
            renderer,
            observer,
        }
    }

    /// Snapshot of the current pipeline state.
    pub fn state(&self) -> PipelineState {
        *self.state.lock()
    }

    /// Whether confirmations are currently spoken.
    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled.load(Ordering::SeqCst)
    }

    /// Toggle the confirmation voice. Disabling cancels any playback
    /// already in progress.
    pub fn set_voice_enabled(&self, enabled: bool) {
        self.voice_enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.voice_cancel.notify_waiters();
        }
        tracing::info!(enabled, "Confirmation voice toggled");
    }

    fn set_state(&self, next: PipelineState) {
        let mut state = self.state.lock();
        tracing::debug!(from = %*state, to = %next, "Pipeline state transition");
        *state = next;
    }

    /// Atomically move `from` → `to`; `false` when the machine is in a
    /// different state (the request is dropped, not queued).
    fn try_transition(&self, from: PipelineState, to: PipelineState) -> bool {
        let mut state = self.state.lock();
        if *state != from {
            return false;
        }
        tracing::debug!(from = %from, to = %to, "Pipeline state transition");
        *state = to;
        true
    }

    // ── Capture collaborator signals ─────────────────────────────

    /// Speech capture started. Ignored unless idle.
    pub fn capture_started(&self) -> bool {
        if !self.try_transition(PipelineState::Idle, PipelineState::Listening) {
            tracing::debug!(state = %self.state(), "Capture start ignored — pipeline busy");
            return false;
        }
        self.observer
            .step_update(PipelineStep::Stt, StepState::Active, None);
        true
    }

    /// Interim transcript. Observational only.
    pub fn capture_partial(&self, text: &str) {
        tracing::trace!(len = text.len(), "Partial transcript");
    }

    /// A finalized utterance arrived from capture; runs the pipeline.
    pub async fn capture_final(&self, text: &str) -> anyhow::Result<PipelineReport> {
        if !self.try_transition(PipelineState::Listening, PipelineState::Thinking) {
            anyhow::bail!("capture finalized while not listening — dropped");
        }
        self.observer
            .step_update(PipelineStep::Stt, StepState::Done, None);
        Ok(self.run(text).await)
    }

    /// Capture ended. Listening with no finalized utterance returns to
    /// idle; any other state is untouched.
    pub fn capture_ended(&self) {
        if self.try_transition(PipelineState::Listening, PipelineState::Idle) {
            tracing::info!("Capture ended without an utterance");
        }
    }

    /// Capture reported an error. Cancellations fall back to idle;
    /// anything else shows the error state, then auto-recovers after the
    /// configured cool-down.
    pub async fn capture_error(&self, error: CaptureError) {
        if error.is_cancellation() {
            self.capture_ended();
            return;
        }
        tracing::warn!(%error, "Speech capture failed");
        self.set_state(PipelineState::Error);
        sleep(Duration::from_millis(self.config.delays.error_cooldown_ms)).await;
        self.set_state(PipelineState::Idle);
    }

    // ── Direct text submission ───────────────────────────────────

    /// Run the pipeline on typed input. Rejected while a run is active.
    pub async fn submit(&self, text: &str) -> anyhow::Result<PipelineReport> {
        if !self.try_transition(PipelineState::Idle, PipelineState::Thinking) {
            anyhow::bail!("pipeline busy ({}) — submission rejected", self.state());
        }
        self.observer
            .step_update(PipelineStep::Stt, StepState::Done, Some(0));
        Ok(self.run(text).await)
    }

    // ── Run sequence ─────────────────────────────────────────────

    /// One pipeline run. Entered in Thinking; always exits in Idle.
    /// Infallible by design — every missing match degrades to a default.
    async fn run(&self, text: &str) -> PipelineReport {
        let started = Instant::now();
        let delays = &self.config.delays;

        // Classify
        self.observer
            .step_update(PipelineStep::Classify, StepState::Active, None);
        sleep(Duration::from_millis(delays.classify_ms)).await;
        let intents = detect_intents(text);
        let catalog = ToolCatalog::builtin();
        let complexity = classify(intents.len(), catalog.len());
        self.observer.step_update(
            PipelineStep::Classify,
            StepState::Done,
            Some(elapsed_ms(started)),
        );
        tracing::info!(
            num_intents = intents.len(),
            level = %complexity.level,
            threshold = complexity.threshold,
            "Classified utterance"
        );

        // Route
        self.observer
            .step_update(PipelineStep::Route, StepState::Active, None);
        sleep(Duration::from_millis(delays.route_ms)).await;
        let decision = route::decide(&complexity, self.sampler.as_ref());
        self.observer.step_update(
            PipelineStep::Route,
            StepState::Done,
            Some(elapsed_ms(started)),
        );

        // Infer (simulated)
        let infer_latency_ms = if decision.escalates() {
            self.set_state(PipelineState::Escalating);
            self.observer
                .step_update(PipelineStep::Infer, StepState::CloudActive, None);
            let wait = self
                .sampler
                .latency_ms(delays.cloud_infer_min_ms..delays.cloud_infer_max_ms);
            sleep(Duration::from_millis(wait)).await;
            self.sampler.latency_ms(CLOUD_REPORTED_MS)
        } else {
            self.observer
                .step_update(PipelineStep::Infer, StepState::Active, None);
            let wait = self
                .sampler
                .latency_ms(delays.device_infer_min_ms..delays.device_infer_max_ms);
            sleep(Duration::from_millis(wait)).await;
            self.sampler.latency_ms(DEVICE_REPORTED_MS)
        };
        self.observer.step_update(
            PipelineStep::Infer,
            StepState::Done,
            Some(infer_latency_ms),
        );

        // Synthesize + respond
        let calls = synthesize(text);
        self.set_state(PipelineState::Responding);
        for call in &calls {
            self.renderer
                .render(call, decision.target, infer_latency_ms)
                .await;
            sleep(Duration::from_millis(delays.card_ms)).await;
        }

        // Spoken confirmation
        self.observer
            .step_update(PipelineStep::Tts, StepState::Active, None);
        let confirmation = calls
            .iter()
            .map(|c| c.confirmation.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        self.speak_confirmation(&confirmation).await;
        self.observer
            .step_update(PipelineStep::Tts, StepState::Done, None);

        let total_ms = elapsed_ms(started);
        self.set_state(PipelineState::Idle);
        tracing::info!(
            target_path = %decision.target,
            confidence = decision.confidence,
            calls = calls.len(),
            total_ms,
            "Pipeline run complete"
        );

        let mut intents: Vec<_> = intents.into_iter().collect();
        intents.sort_by_key(|t| t.id());

        PipelineReport {
            utterance: text.to_string(),
            intents,
            complexity,
            decision,
            calls,
            infer_latency_ms,
            total_ms,
        }
    }

    /// Playback raced against the hard ceiling and the voice toggle.
    /// Every outcome is treated as step completion.
    async fn speak_confirmation(&self, text: &str) {
        if text.is_empty() {
            return;
        }
        // Register for the cancel wake before re-reading the toggle; a
        // flip landing between the check and the select would otherwise
        // miss its `notify_waiters` and wait out the full ceiling.
        let cancelled = self.voice_cancel.notified();
        tokio::pin!(cancelled);
        cancelled.as_mut().enable();
        if !self.voice_enabled() {
            return;
        }
        let ceiling = Duration::from_millis(self.config.voice.playback_timeout_ms);
        tokio::select! {
            result = timeout(ceiling, self.playback.speak(text)) => {
                if result.is_err() {
                    tracing::warn!(
                        timeout_ms = self.config.voice.playback_timeout_ms,
                        "Confirmation playback timed out — treating as complete"
                    );
                }
            }
            _ = &mut cancelled => {
                tracing::debug!("Confirmation playback canceled — voice disabled");
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// ── Tests ────────────────────────────────────────────────────────
