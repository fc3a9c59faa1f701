//! Mock tool-call synthesis — the demo's "inference" step.
//!
//! Pattern-matches an utterance against the fixed catalog and extracts
//! structured arguments. Matching is a first-match-wins ladder of
//! recognizers ([`Recognizer::LADDER`]), followed by a multi-intent
//! fallback and a catch-all contact search, so synthesis always yields
//! at least one call and never fails.
//!
//! The direct-match ladder is evaluated before the multi-intent fallback
//! even though their triggering substrings overlap; that precedence is
//! observable behavior and must not be reordered.

use rand::RngExt;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

use super::ToolCall;

// ── Extraction defaults ──────────────────────────────────────────

const DEFAULT_LOCATION: &str = "San Francisco";
const DEFAULT_ALARM_TIME: &str = "7:00 AM";
const DEFAULT_TIMER_MINUTES: i64 = 5;
const DEFAULT_CONTACT: &str = "Maggie";
const DEFAULT_MESSAGE: &str = "Hey! I'll be there soon.";
const DEFAULT_MUSIC_QUERY: &str = "Lo-fi beats";

/// Weather conditions shown on the synthesized report.
const CONDITIONS: &[&str] = &["Sunny", "Partly Cloudy", "Clear", "Overcast", "Breezy"];

/// Filler words stripped by the location entity heuristic.
const STOP_WORDS: &[&str] = &[
    "what", "is", "the", "in", "whats", "what's", "weather", "for", "a", "an", "tell", "me",
    "about", "get", "how", "check",
];

// ── Compiled patterns ────────────────────────────────────────────

fn weather_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"weather\s+(?:in\s+)?([a-z\s]+?)(?:\?|$|\.)").expect("static pattern")
    })
}

fn alarm_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"alarm\s+(?:for\s+)?(\d{1,2}(?::\d{2})?\s*(?:am|pm)?)").expect("static pattern")
    })
}

fn timer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:timer|countdown)\s+(?:for\s+)?(\d+)\s*(?:min|minute)")
            .expect("static pattern")
    })
}

fn message_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:send|text|message)\s+(\w+)\s+(.+)").expect("static pattern"))
}

fn music_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)play\s+(.+)").expect("static pattern"))
}

// ── Recognizer ladder ────────────────────────────────────────────

/// One rung of the recognizer ladder.
///
/// Expressed as a tagged variant rather than nested conditionals so the
/// precedence order is auditable in one place and each rung is testable
/// in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recognizer {
    Weather,
    Alarm,
    Timer,
    Message,
    Music,
}

impl Recognizer {
    /// Evaluation order. First match wins.
    const LADDER: &'static [Recognizer] = &[
        Recognizer::Weather,
        Recognizer::Alarm,
        Recognizer::Timer,
        Recognizer::Message,
        Recognizer::Music,
    ];

    /// Try to recognize this rung against the utterance.
    ///
    /// `text` is the original-cased utterance (message bodies and song
    /// titles keep their casing); `lower` is the lowered copy the
    /// keyword checks and time/location patterns run against.
    fn recognize(self, text: &str, lower: &str) -> Option<ToolCall> {
        match self {
            Recognizer::Weather => {
                let captured = weather_re()
                    .captures(lower)
                    .map(|c| c[1].trim().to_string())
                    .filter(|loc| !loc.is_empty());
                if captured.is_none()
                    && !lower.contains("weather")
                    && !lower.contains("temperature")
                {
                    return None;
                }
                let location = title_case(&captured.unwrap_or_else(|| extract_location(text)));
                Some(weather_call(&location))
            }
            Recognizer::Alarm => {
                let captured = alarm_re().captures(lower).map(|c| c[1].trim().to_string());
                if captured.is_none() && !lower.contains("wake me") && !lower.contains("alarm") {
                    return None;
                }
                let time = captured.unwrap_or_else(|| DEFAULT_ALARM_TIME.to_string());
                Some(alarm_call(&time, "Alarm"))
            }
            Recognizer::Timer => {
                let captured = timer_re()
                    .captures(lower)
                    .and_then(|c| c[1].parse::<i64>().ok());
                if captured.is_none() && !lower.contains("timer") {
                    return None;
                }
                let minutes = captured.unwrap_or(DEFAULT_TIMER_MINUTES);
                Some(timer_call(minutes, "Timer"))
            }
            Recognizer::Message => {
                // Keyword must sit in command position; "text" as a trailing
                // noun ("asdkfj random text") falls through to the catch-all.
                let verb_leads = ["send", "text", "message"]
                    .iter()
                    .any(|v| lower == *v || lower.starts_with(&format!("{v} ")));
                let captured = message_re().captures(text);
                if captured.is_none() && !verb_leads {
                    return None;
                }
                let (contact, body) = match captured {
                    Some(c) => (title_case(&c[1]), c[2].to_string()),
                    None => (DEFAULT_CONTACT.to_string(), DEFAULT_MESSAGE.to_string()),
                };
                Some(message_call(&contact, &body))
            }
            Recognizer::Music => {
                if !lower.contains("play") && !lower.contains("music") {
                    return None;
                }
                let query = music_re()
                    .captures(text)
                    .map(|c| c[1].trim().to_string())
                    .unwrap_or_else(|| DEFAULT_MUSIC_QUERY.to_string());
                Some(music_call(&query))
            }
        }
    }
}

// ── Synthesis entry point ────────────────────────────────────────

/// Produce an ordered, non-empty sequence of tool calls for an utterance.
///
/// 1. Direct-match ladder, first match wins — one call.
/// 2. Multi-intent fallback — one call per matching substring, possibly
///    several.
/// 3. Catch-all contact search over the raw text.
pub fn synthesize(text: &str) -> Vec<ToolCall> {
    let lower = text.to_lowercase();

    for recognizer in Recognizer::LADDER {
        if let Some(call) = recognizer.recognize(text, &lower) {
            tracing::debug!(rule = ?recognizer, tool = %call.name, "Direct recognizer matched");
            return vec![call];
        }
    }

    let fallback = multi_intent_fallback(&lower);
    if !fallback.is_empty() {
        tracing::debug!(calls = fallback.len(), "Multi-intent fallback matched");
        return fallback;
    }

    tracing::debug!("No rule matched — degrading to contact search");
    vec![search_call(text)]
}

/// Emit one default call per multi-intent substring hit.
fn multi_intent_fallback(lower: &str) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    if lower.contains("weather") {
        calls.push(weather_call(DEFAULT_LOCATION));
    }
    if lower.contains("alarm") || lower.contains("wake") {
        calls.push(alarm_call(DEFAULT_ALARM_TIME, "Morning"));
    }
    if lower.contains("timer") {
        calls.push(timer_call(10, "Cooking"));
    }
    calls
}

// ── Entity extraction heuristic ──────────────────────────────────

/// Fallback location extraction: strip stop words, keep the last two
/// remaining tokens. Yields the default city when nothing survives.
fn extract_location(text: &str) -> String {
    let entities: Vec<&str> = text
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(&w.to_lowercase().as_str()) && w.len() > 1)
        .collect();

    let tail_start = entities.len().saturating_sub(2);
    let joined = entities[tail_start..].join(" ");
    if joined.is_empty() {
        DEFAULT_LOCATION.to_string()
    } else {
        joined
    }
}

/// Uppercase the first character of each space-separated word.
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Call builders ────────────────────────────────────────────────

fn build(name: &str, args: &[(&str, Value)], confirmation: String) -> ToolCall {
    let mut arguments = Map::new();
    for (k, v) in args {
        arguments.insert((*k).to_string(), v.clone());
    }
    ToolCall {
        name: name.to_string(),
        arguments,
        confirmation,
    }
}

fn weather_call(location: &str) -> ToolCall {
    // Display values only — the call's semantic payload is the location.
    let temp: i64 = rand::rng().random_range(55..=90);
    let conditions = CONDITIONS[rand::rng().random_range(0..CONDITIONS.len())];
    build(
        "get_weather",
        &[("location", json!(location))],
        format!("It's currently {temp} degrees in {location}. {conditions}."),
    )
}

fn alarm_call(time: &str, label: &str) -> ToolCall {
    build(
        "set_alarm",
        &[("time", json!(time)), ("label", json!(label))],
        format!("Alarm set for {time}."),
    )
}

fn timer_call(minutes: i64, label: &str) -> ToolCall {
    build(
        "set_timer",
        &[("duration_minutes", json!(minutes)), ("label", json!(label))],
        format!("Timer set for {minutes} minutes."),
    )
}

fn message_call(contact: &str, body: &str) -> ToolCall {
    build(
        "send_message",
        &[("contact", json!(contact)), ("message", json!(body))],
        format!("Message sent to {contact}."),
    )
}

fn music_call(query: &str) -> ToolCall {
    build(
        "play_music",
        &[("query", json!(query))],
        format!("Now playing {query}."),
    )
}

fn search_call(query: &str) -> ToolCall {
    build(
        "search_contacts",
        &[("query", json!(query))],
        format!("Searching for {query}."),
    )
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolCatalog;

    #[test]
    fn weather_with_explicit_location() {
        let calls = synthesize("what's the weather in Boston");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].arg_str("location"), Some("Boston"));
    }

    #[test]
    fn weather_location_stops_at_punctuation() {
        let calls = synthesize("weather in new york?");
        assert_eq!(calls[0].arg_str("location"), Some("New York"));
    }

    #[test]
    fn weather_keyword_without_pattern_uses_entity_heuristic() {
        let calls = synthesize("check the temperature over Tokyo");
        assert_eq!(calls[0].name, "get_weather");
        // Stop words stripped, tail tokens kept.
        assert_eq!(calls[0].arg_str("location"), Some("Over Tokyo"));
    }

    #[test]
    fn weather_defaults_to_san_francisco() {
        // Every token is a stop word, so the entity heuristic yields nothing.
        let calls = synthesize("what is the weather");
        assert_eq!(calls[0].arg_str("location"), Some("San Francisco"));
    }

    #[test]
    fn weather_confirmation_mentions_location_and_degrees() {
        let calls = synthesize("weather in denver");
        assert!(calls[0].confirmation.contains("degrees in Denver"));
    }

    #[test]
    fn alarm_extracts_time_token() {
        let calls = synthesize("set an alarm for 7:30 am");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "set_alarm");
        assert_eq!(calls[0].arg_str("time"), Some("7:30 am"));
        assert_eq!(calls[0].arg_str("label"), Some("Alarm"));
        assert_eq!(calls[0].confirmation, "Alarm set for 7:30 am.");
    }

    #[test]
    fn alarm_keyword_defaults_time() {
        let calls = synthesize("wake me tomorrow");
        assert_eq!(calls[0].name, "set_alarm");
        assert_eq!(calls[0].arg_str("time"), Some("7:00 AM"));
    }

    #[test]
    fn ladder_precedence_alarm_beats_multi_intent_fallback() {
        // Two intents present, but the direct alarm pattern is evaluated
        // before the fallback — a single alarm call with the captured
        // time, not alarm(7:00 AM, "Morning") + timer.
        let calls = synthesize("set an alarm for 7:30 am and a timer for 10 minutes");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "set_alarm");
        assert_eq!(calls[0].arg_str("time"), Some("7:30 am"));
        assert_eq!(calls[0].arg_str("label"), Some("Alarm"));
    }

    #[test]
    fn timer_extracts_minutes() {
        let calls = synthesize("timer for 25 minutes please");
        assert_eq!(calls[0].name, "set_timer");
        assert_eq!(calls[0].arg_i64("duration_minutes"), Some(25));
        assert_eq!(calls[0].confirmation, "Timer set for 25 minutes.");
    }

    #[test]
    fn timer_keyword_defaults_to_five() {
        let calls = synthesize("start a timer");
        assert_eq!(calls[0].arg_i64("duration_minutes"), Some(5));
        assert_eq!(calls[0].arg_str("label"), Some("Timer"));
    }

    #[test]
    fn message_extracts_contact_and_body() {
        let calls = synthesize("send maggie I'm running late");
        assert_eq!(calls[0].name, "send_message");
        assert_eq!(calls[0].arg_str("contact"), Some("Maggie"));
        assert_eq!(calls[0].arg_str("message"), Some("I'm running late"));
        assert_eq!(calls[0].confirmation, "Message sent to Maggie.");
    }

    #[test]
    fn message_keyword_without_pattern_uses_defaults() {
        let calls = synthesize("message");
        assert_eq!(calls[0].arg_str("contact"), Some("Maggie"));
        assert_eq!(calls[0].arg_str("message"), Some("Hey! I'll be there soon."));
    }

    #[test]
    fn music_extracts_query_with_original_casing() {
        let calls = synthesize("play Bohemian Rhapsody");
        assert_eq!(calls[0].name, "play_music");
        assert_eq!(calls[0].arg_str("query"), Some("Bohemian Rhapsody"));
        assert_eq!(calls[0].confirmation, "Now playing Bohemian Rhapsody.");
    }

    #[test]
    fn music_keyword_defaults_query() {
        let calls = synthesize("some music");
        assert_eq!(calls[0].arg_str("query"), Some("Lo-fi beats"));
    }

    #[test]
    fn catch_all_searches_with_raw_text() {
        let calls = synthesize("asdkfj random text");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "search_contacts");
        assert_eq!(calls[0].arg_str("query"), Some("asdkfj random text"));
    }

    #[test]
    fn catch_all_guarantees_non_empty_output() {
        assert!(!synthesize("").is_empty());
        assert!(!synthesize("   ").is_empty());
    }

    #[test]
    fn fallback_fires_for_wake_without_direct_match() {
        // "wake" alone doesn't satisfy the direct alarm rule ("wake me" /
        // "alarm"), so the multi-intent fallback handles it.
        let calls = synthesize("wake up early");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "set_alarm");
        assert_eq!(calls[0].arg_str("time"), Some("7:00 AM"));
        assert_eq!(calls[0].arg_str("label"), Some("Morning"));
    }

    #[test]
    fn multi_intent_fallback_emits_one_call_per_substring() {
        let calls = multi_intent_fallback("weather alarm timer");
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].arg_str("location"), Some("San Francisco"));
        assert_eq!(calls[1].name, "set_alarm");
        assert_eq!(calls[1].arg_str("label"), Some("Morning"));
        assert_eq!(calls[2].name, "set_timer");
        assert_eq!(calls[2].arg_i64("duration_minutes"), Some(10));
        assert_eq!(calls[2].arg_str("label"), Some("Cooking"));
    }

    #[test]
    fn every_synthesized_call_satisfies_its_schema() {
        let catalog = ToolCatalog::builtin();
        let corpus = [
            "what's the weather in Boston",
            "set an alarm for 7:30 am and a timer for 10 minutes",
            "asdkfj random text",
            "wake up early",
            "send maggie hello",
            "play something upbeat",
            "timer for 3 min",
            "text",
            "",
            "weather",
            "find my contacts",
        ];
        for utterance in corpus {
            let calls = synthesize(utterance);
            assert!(!calls.is_empty(), "empty synthesis for {utterance:?}");
            for call in &calls {
                assert_eq!(
                    catalog.validate(call),
                    Ok(()),
                    "schema violation for {utterance:?}: {call:?}"
                );
                assert!(!call.confirmation.is_empty());
            }
        }
    }

    #[test]
    fn extract_location_keeps_last_two_tokens() {
        assert_eq!(extract_location("what is the weather like around Lake Tahoe"), "Lake Tahoe");
        assert_eq!(extract_location("what is the weather"), "San Francisco");
    }

    #[test]
    fn title_case_capitalizes_words() {
        assert_eq!(title_case("new york"), "New York");
        assert_eq!(title_case("boston"), "Boston");
        assert_eq!(title_case(""), "");
    }
}
