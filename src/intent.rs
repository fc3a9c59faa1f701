//! Keyword-based intent detection.
//!
//! Scans raw utterance text for intent signals using fast substring
//! matching — no model call, no scoring. An intent tag is included when
//! any of its keywords appears anywhere in the lowered text.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Intent tags ──────────────────────────────────────────────────

/// Intent categories the detector can recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentTag {
    Weather,
    Alarm,
    Message,
    Reminder,
    Search,
    Music,
    Timer,
}

impl IntentTag {
    /// All intent tags in the fixed vocabulary.
    pub const ALL: &'static [IntentTag] = &[
        IntentTag::Weather,
        IntentTag::Alarm,
        IntentTag::Message,
        IntentTag::Reminder,
        IntentTag::Search,
        IntentTag::Music,
        IntentTag::Timer,
    ];

    /// Identifier used in logs and API payloads.
    pub fn id(self) -> &'static str {
        match self {
            IntentTag::Weather => "weather",
            IntentTag::Alarm => "alarm",
            IntentTag::Message => "message",
            IntentTag::Reminder => "reminder",
            IntentTag::Search => "search",
            IntentTag::Music => "music",
            IntentTag::Timer => "timer",
        }
    }
}

impl std::fmt::Display for IntentTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// ── Keyword table ────────────────────────────────────────────────

/// Keyword signals per intent. Substring match on lowered text.
const INTENT_KEYWORDS: &[(IntentTag, &[&str])] = &[
    (
        IntentTag::Weather,
        &["weather", "temperature", "forecast", "degrees"],
    ),
    (IntentTag::Alarm, &["alarm", "wake me", "wake up"]),
    (IntentTag::Message, &["send", "text", "message", "tell"]),
    (IntentTag::Reminder, &["remind", "reminder"]),
    (
        IntentTag::Search,
        &["find", "look up", "search", "contacts"],
    ),
    (IntentTag::Music, &["play", "music", "song"]),
    (IntentTag::Timer, &["timer", "countdown", "minutes"]),
];

// ── Detection ────────────────────────────────────────────────────

/// Detect the set of intents signalled by an utterance.
///
/// Membership is boolean: one keyword hit is enough, duplicates collapse,
/// order is irrelevant. Total function — never fails, empty set is a
/// valid result.
pub fn detect_intents(text: &str) -> HashSet<IntentTag> {
    let lower = text.to_lowercase();
    let mut detected = HashSet::new();

    for (intent, keywords) in INTENT_KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            detected.insert(*intent);
        }
    }

    detected
}

// ── Tests ────────────────────────────────────────────────────────
