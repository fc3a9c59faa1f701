//! Terminal collaborators: result cards, spoken-confirmation simulation,
//! and a step ticker for the pipeline visualization.

use async_trait::async_trait;
use std::time::Duration;

use crate::collab::{CardRenderer, PipelineObserver, SpeechPlayback};
use crate::pipeline::{PipelineStep, StepState};
use crate::route::RoutingTarget;
use crate::tools::ToolCall;

/// Simulated speaking pace for confirmation playback.
const PLAYBACK_MS_PER_WORD: u64 = 330;

// ── Result cards ─────────────────────────────────────────────────

/// Renders one boxed card per tool call on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRenderer;

#[async_trait]
impl CardRenderer for ConsoleRenderer {
    async fn render(&self, call: &ToolCall, target: RoutingTarget, latency_ms: u64) {
        for line in card_lines(call, target, latency_ms) {
            println!("{line}");
        }
    }
}

/// Card text, one entry per output line. Split out from the renderer so
/// the layout stays testable.
fn card_lines(call: &ToolCall, target: RoutingTarget, latency_ms: u64) -> Vec<String> {
    let (icon, title) = card_kind(&call.name);
    let mut lines = vec![
        String::new(),
        format!("  ┌─ {icon} {title}  [{target} · {latency_ms} ms]"),
    ];
    for body in card_body(call) {
        lines.push(format!("  │ {body}"));
    }
    lines.push("  └─".to_string());
    lines
}

fn card_kind(name: &str) -> (&'static str, &'static str) {
    match name {
        "get_weather" => ("🌡️", "Weather"),
        "set_alarm" => ("⏰", "Alarm Set"),
        "set_timer" => ("⏱️", "Timer Set"),
        "send_message" => ("💬", "Message Sent"),
        "play_music" => ("🎵", "Now Playing"),
        "search_contacts" => ("🔍", "Search"),
        _ => ("🔧", "Tool Call"),
    }
}

fn card_body(call: &ToolCall) -> Vec<String> {
    match call.name.as_str() {
        "get_weather" => vec![
            call.arg_str("location").unwrap_or("Unknown").to_string(),
            call.confirmation.clone(),
        ],
        "set_alarm" => vec![format!(
            "{}  ({})",
            call.arg_str("time").unwrap_or("?"),
            call.arg_str("label").unwrap_or("Alarm"),
        )],
        "set_timer" => vec![format!(
            "{} min  ({})",
            call.arg_i64("duration_minutes").unwrap_or(0),
            call.arg_str("label").unwrap_or("Timer"),
        )],
        "send_message" => vec![format!(
            "To {}: \"{}\"",
            call.arg_str("contact").unwrap_or("?"),
            call.arg_str("message").unwrap_or(""),
        )],
        "play_music" => vec![call.arg_str("query").unwrap_or("?").to_string()],
        // Searches and unknown tools show the raw invocation.
        _ => {
            let args = serde_json::to_string(&call.arguments)
                .unwrap_or_else(|_| "{}".to_string());
            vec![format!("{}()", call.name), args]
        }
    }
}

// ── Spoken confirmations ─────────────────────────────────────────

/// Prints the confirmation and simulates playback at a fixed speaking
/// pace. The orchestrator's ceiling bounds the sleep, so a very long
/// confirmation just gets cut off.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePlayback;

#[async_trait]
impl SpeechPlayback for ConsolePlayback {
    async fn speak(&self, text: &str) {
        println!("  🔊 \"{text}\"");
        let words = text.split_whitespace().count() as u64;
        tokio::time::sleep(Duration::from_millis(words * PLAYBACK_MS_PER_WORD)).await;
    }
}

// ── Step ticker ──────────────────────────────────────────────────

/// Prints one line per pipeline step update.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleObserver;

impl PipelineObserver for ConsoleObserver {
    fn step_update(&self, step: PipelineStep, state: StepState, elapsed_ms: Option<u64>) {
        let marker = match state {
            StepState::Active => "▸",
            StepState::CloudActive => "⇪",
            StepState::Done => "✓",
        };
        match elapsed_ms {
            Some(ms) => println!("  {marker} {step} ({ms} ms)"),
            None => println!("  {marker} {step}"),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
