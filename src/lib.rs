//! echoroute — a voice-first hybrid assistant demo.
//!
//! Takes one utterance at a time through intent detection, complexity
//! classification, confidence-based routing (on-device vs cloud), tool
//! call synthesis, and a spoken confirmation, with every inference and
//! network hop simulated by configurable delays.
//!
//! ## Design
//! - One state machine, one run at a time: [`pipeline::Orchestrator`]
//!   owns the state and rejects input while busy.
//! - Injectable randomness: routing confidence and synthetic latency go
//!   through the [`route::Sampler`] trait so tests pin outcomes.
//! - Collaborator seams ([`collab`]) keep the terminal front end
//!   ([`console`]) swappable and the core headless-testable.

pub mod classify;
pub mod collab;
pub mod config;
pub mod console;
pub mod intent;
pub mod pipeline;
pub mod route;
pub mod tools;

pub use classify::{classify, Complexity, ComplexityResult};
pub use config::Config;
pub use intent::{detect_intents, IntentTag};
pub use pipeline::{Orchestrator, PipelineReport, PipelineState};
pub use route::{RandomSampler, RoutingDecision, RoutingTarget, Sampler};
pub use tools::{synthesize, ToolCall, ToolCatalog};
