//! Tool schemas and mock tool-call synthesis.
//!
//! ## Design
//! - Fixed 6-tool catalog built once at startup ([`ToolCatalog::builtin`])
//! - First-match-wins recognizer ladder over regex/keyword rules
//! - Every call satisfies its schema's required fields — missing
//!   extractions take policy fallbacks, never omission
//! - Synthesis is total: unmatched text degrades to a contact search

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod catalog;
pub mod synthesize;

pub use catalog::{ParamKind, ParamSpec, ToolCatalog, ToolSchema, ValidationError};
pub use synthesize::synthesize;

// ── Tool call ────────────────────────────────────────────────────

/// A structured tool invocation produced by the synthesizer.
///
/// Consumed by the card renderer and confirmation playback, then
/// discarded — nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of a [`ToolSchema`] in the catalog.
    pub name: String,
    /// Parameter name → value. Required fields are always present.
    pub arguments: Map<String, Value>,
    /// Spoken confirmation phrase describing the outcome.
    pub confirmation: String,
}

impl ToolCall {
    /// Convenience accessor for a string argument.
    pub fn arg_str(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).and_then(Value::as_str)
    }

    /// Convenience accessor for an integer argument.
    pub fn arg_i64(&self, name: &str) -> Option<i64> {
        self.arguments.get(name).and_then(Value::as_i64)
    }
}
