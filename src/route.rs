//! Hybrid routing: on-device vs cloud escalation.
//!
//! Draws a synthetic confidence value and compares it against the
//! complexity tier's threshold. The confidence sample is the only
//! stochastic step in the core pipeline, so it comes from a supplied
//! [`Sampler`] rather than a hidden global — tests swap in a fixed one.

use crate::classify::ComplexityResult;
use rand::RngExt;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Inclusive bounds of the synthetic confidence distribution.
pub const CONFIDENCE_MIN: f64 = 0.35;
pub const CONFIDENCE_MAX: f64 = 0.90;

// ── Routing target ───────────────────────────────────────────────

/// Where a request is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingTarget {
    /// Fast local model.
    OnDevice,
    /// Slower remote model (escalation).
    Cloud,
}

impl RoutingTarget {
    pub fn label(self) -> &'static str {
        match self {
            Self::OnDevice => "on-device",
            Self::Cloud => "cloud",
        }
    }
}

impl std::fmt::Display for RoutingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Routing decision ─────────────────────────────────────────────

/// Result of the routing step: deterministic given the sampled confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Sampled local-model confidence (0.35 – 0.90).
    pub confidence: f64,
    /// Chosen execution path.
    pub target: RoutingTarget,
}

impl RoutingDecision {
    /// Whether this request escalates to the cloud path.
    pub fn escalates(&self) -> bool {
        self.target == RoutingTarget::Cloud
    }
}

// ── Sampler (injectable randomness) ──────────────────────────────

/// Source of the synthetic confidence sample and latency jitter.
///
/// Production uses [`RandomSampler`]; tests supply fixed values so the
/// router and orchestrator are deterministic.
pub trait Sampler: Send + Sync {
    /// Draw a confidence value uniformly from [0.35, 0.90].
    fn confidence(&self) -> f64;

    /// Draw a simulated latency from a half-open millisecond range.
    fn latency_ms(&self, range: Range<u64>) -> u64;
}

/// Sampler backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSampler;

impl Sampler for RandomSampler {
    fn confidence(&self) -> f64 {
        rand::rng().random_range(CONFIDENCE_MIN..=CONFIDENCE_MAX)
    }

    fn latency_ms(&self, range: Range<u64>) -> u64 {
        if range.is_empty() {
            return range.start;
        }
        rand::rng().random_range(range)
    }
}

// ── Router ───────────────────────────────────────────────────────

/// Decide the execution path for a classified utterance.
///
/// `Cloud` iff the sampled confidence is strictly below the tier
/// threshold; a sample exactly equal to the threshold stays on-device.
/// Never blocks, always terminates.
pub fn decide(complexity: &ComplexityResult, sampler: &dyn Sampler) -> RoutingDecision {
    let confidence = sampler.confidence();
    let target = if confidence < complexity.threshold {
        RoutingTarget::Cloud
    } else {
        RoutingTarget::OnDevice
    };

    tracing::debug!(
        level = %complexity.level,
        threshold = complexity.threshold,
        confidence,
        target = %target,
        "Routing decision"
    );

    RoutingDecision { confidence, target }
}

// ── Test fixtures ────────────────────────────────────────────────

/// Deterministic sampler: fixed confidence, minimum latency.
#[cfg(test)]
pub(crate) struct FixedSampler {
    pub confidence: f64,
}

#[cfg(test)]
impl Sampler for FixedSampler {
    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn latency_ms(&self, range: Range<u64>) -> u64 {
        range.start
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify, Complexity};

    #[test]
    fn low_confidence_escalates_to_cloud() {
        let complexity = classify(1, 6); // MEDIUM, threshold 0.50
        let decision = decide(&complexity, &FixedSampler { confidence: 0.42 });
        assert_eq!(decision.target, RoutingTarget::Cloud);
        assert!(decision.escalates());
        assert_eq!(decision.confidence, 0.42);
    }

    #[test]
    fn high_confidence_stays_on_device() {
        let complexity = classify(1, 6);
        let decision = decide(&complexity, &FixedSampler { confidence: 0.80 });
        assert_eq!(decision.target, RoutingTarget::OnDevice);
        assert!(!decision.escalates());
    }

    #[test]
    fn confidence_equal_to_threshold_stays_on_device() {
        // Strict `<` boundary: 0.40 vs threshold 0.40 does not escalate.
        let complexity = classify(1, 1);
        assert_eq!(complexity.level, Complexity::Easy);
        assert_eq!(complexity.threshold, 0.40);

        let decision = decide(&complexity, &FixedSampler { confidence: 0.40 });
        assert_eq!(decision.target, RoutingTarget::OnDevice);
    }

    #[test]
    fn hard_tier_lowers_the_bar() {
        let complexity = classify(3, 6); // HARD, threshold 0.30
        let decision = decide(&complexity, &FixedSampler { confidence: 0.35 });
        assert_eq!(decision.target, RoutingTarget::OnDevice);

        let decision = decide(&complexity, &FixedSampler { confidence: 0.29 });
        assert_eq!(decision.target, RoutingTarget::Cloud);
    }

    #[test]
    fn random_sampler_stays_in_bounds() {
        let sampler = RandomSampler;
        for _ in 0..200 {
            let c = sampler.confidence();
            assert!((CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&c));
        }
    }

    #[test]
    fn random_sampler_latency_in_range() {
        let sampler = RandomSampler;
        for _ in 0..50 {
            let ms = sampler.latency_ms(60..140);
            assert!((60..140).contains(&ms));
        }
        // Degenerate range must not panic.
        assert_eq!(sampler.latency_ms(100..100), 100);
    }

    #[test]
    fn target_labels() {
        assert_eq!(RoutingTarget::OnDevice.label(), "on-device");
        assert_eq!(RoutingTarget::Cloud.to_string(), "cloud");
    }
}
