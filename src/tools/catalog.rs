//! Static tool schema catalog.
//!
//! The fixed set of tool definitions the synthesizer may produce calls
//! against. Built once at first access, immutable for the process
//! lifetime — the demo never registers tools at runtime.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use super::ToolCall;

// ── Parameter schema ─────────────────────────────────────────────

/// Primitive type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Integer,
}

impl ParamKind {
    /// Whether a JSON value matches this parameter type.
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
        }
    }
}

/// A single named parameter of a tool schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name as it appears in `ToolCall::arguments`.
    pub name: &'static str,
    /// Primitive type.
    pub kind: ParamKind,
    /// Whether the synthesizer must always populate this field.
    pub required: bool,
    /// Short human-readable description.
    pub description: &'static str,
}

// ── Tool schema ──────────────────────────────────────────────────

/// Static catalog entry for one tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier.
    pub name: &'static str,
    /// What the tool does.
    pub description: &'static str,
    /// Named parameters.
    pub parameters: Vec<ParamSpec>,
}

impl ToolSchema {
    /// Names of all required parameters.
    pub fn required_params(&self) -> impl Iterator<Item = &ParamSpec> {
        self.parameters.iter().filter(|p| p.required)
    }
}

// ── Catalog ──────────────────────────────────────────────────────

/// The fixed, process-wide tool catalog.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCatalog {
    tools: Vec<ToolSchema>,
}

impl ToolCatalog {
    /// The built-in 6-tool catalog, constructed on first access.
    pub fn builtin() -> &'static ToolCatalog {
        static CATALOG: OnceLock<ToolCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| ToolCatalog {
            tools: vec![
                ToolSchema {
                    name: "get_weather",
                    description: "Get current weather for a location",
                    parameters: vec![ParamSpec {
                        name: "location",
                        kind: ParamKind::String,
                        required: true,
                        description: "City name",
                    }],
                },
                ToolSchema {
                    name: "set_alarm",
                    description: "Set an alarm",
                    parameters: vec![
                        ParamSpec {
                            name: "time",
                            kind: ParamKind::String,
                            required: true,
                            description: "Time in HH:MM format",
                        },
                        ParamSpec {
                            name: "label",
                            kind: ParamKind::String,
                            required: false,
                            description: "Alarm label",
                        },
                    ],
                },
                ToolSchema {
                    name: "set_timer",
                    description: "Set a countdown timer",
                    parameters: vec![
                        ParamSpec {
                            name: "duration_minutes",
                            kind: ParamKind::Integer,
                            required: true,
                            description: "Duration in minutes",
                        },
                        ParamSpec {
                            name: "label",
                            kind: ParamKind::String,
                            required: false,
                            description: "Timer label",
                        },
                    ],
                },
                ToolSchema {
                    name: "send_message",
                    description: "Send a message to a contact",
                    parameters: vec![
                        ParamSpec {
                            name: "contact",
                            kind: ParamKind::String,
                            required: true,
                            description: "Contact name",
                        },
                        ParamSpec {
                            name: "message",
                            kind: ParamKind::String,
                            required: true,
                            description: "Message content",
                        },
                    ],
                },
                ToolSchema {
                    name: "search_contacts",
                    description: "Search contacts by name",
                    parameters: vec![ParamSpec {
                        name: "query",
                        kind: ParamKind::String,
                        required: true,
                        description: "Search query",
                    }],
                },
                ToolSchema {
                    name: "play_music",
                    description: "Play a song or artist",
                    parameters: vec![ParamSpec {
                        name: "query",
                        kind: ParamKind::String,
                        required: true,
                        description: "Song or artist name",
                    }],
                },
            ],
        })
    }

    /// Number of tools in the catalog.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All schemas in catalog order.
    pub fn schemas(&self) -> &[ToolSchema] {
        &self.tools
    }

    /// Look up a schema by tool name.
    pub fn get(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Check that a tool call references a known schema and populates
    /// every required field with a value of the declared type.
    pub fn validate(&self, call: &ToolCall) -> Result<(), ValidationError> {
        let schema = self
            .get(&call.name)
            .ok_or_else(|| ValidationError::UnknownTool(call.name.clone()))?;

        for param in schema.required_params() {
            match call.arguments.get(param.name) {
                None => {
                    return Err(ValidationError::MissingArgument {
                        tool: schema.name,
                        param: param.name,
                    })
                }
                Some(value) if !param.kind.accepts(value) => {
                    return Err(ValidationError::WrongType {
                        tool: schema.name,
                        param: param.name,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Schema violation found by [`ToolCatalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("{tool}: required argument `{param}` missing")]
    MissingArgument {
        tool: &'static str,
        param: &'static str,
    },
    #[error("{tool}: argument `{param}` has the wrong type")]
    WrongType {
        tool: &'static str,
        param: &'static str,
    },
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn call(name: &str, args: &[(&str, Value)]) -> ToolCall {
        let mut arguments = Map::new();
        for (k, v) in args {
            arguments.insert((*k).to_string(), v.clone());
        }
        ToolCall {
            name: name.to_string(),
            arguments,
            confirmation: String::new(),
        }
    }

    #[test]
    fn builtin_catalog_has_six_tools() {
        let catalog = ToolCatalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert!(!catalog.is_empty());
        assert!(catalog.get("get_weather").is_some());
        assert!(catalog.get("play_music").is_some());
        assert!(catalog.get("nonexistent").is_none());
    }

    #[test]
    fn builtin_is_the_same_instance() {
        let a = ToolCatalog::builtin() as *const ToolCatalog;
        let b = ToolCatalog::builtin() as *const ToolCatalog;
        assert_eq!(a, b);
    }

    #[test]
    fn validate_accepts_complete_call() {
        let catalog = ToolCatalog::builtin();
        let call = call("get_weather", &[("location", json!("Boston"))]);
        assert_eq!(catalog.validate(&call), Ok(()));
    }

    #[test]
    fn validate_rejects_missing_required_argument() {
        let catalog = ToolCatalog::builtin();
        let call = call("send_message", &[("contact", json!("Maggie"))]);
        assert_eq!(
            catalog.validate(&call),
            Err(ValidationError::MissingArgument {
                tool: "send_message",
                param: "message",
            })
        );
    }

    #[test]
    fn validate_rejects_wrong_type() {
        let catalog = ToolCatalog::builtin();
        let call = call("set_timer", &[("duration_minutes", json!("five"))]);
        assert_eq!(
            catalog.validate(&call),
            Err(ValidationError::WrongType {
                tool: "set_timer",
                param: "duration_minutes",
            })
        );
    }

    #[test]
    fn validate_rejects_unknown_tool() {
        let catalog = ToolCatalog::builtin();
        let call = call("launch_rocket", &[]);
        assert!(matches!(
            catalog.validate(&call),
            Err(ValidationError::UnknownTool(_))
        ));
    }

    #[test]
    fn optional_labels_are_not_required() {
        let catalog = ToolCatalog::builtin();
        let call = call("set_alarm", &[("time", json!("7:00 AM"))]);
        assert_eq!(catalog.validate(&call), Ok(()));
    }
}
