//! Assistant configuration.
//!
//! TOML file resolved under the platform config directory
//! (`~/.config/echoroute/config.toml` on Linux), with full defaults when
//! the file is absent — the demo runs out of the box. Every field tunes
//! the simulation only; none of the timings here are measurements.

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ── Config root ──────────────────────────────────────────────────

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confirmation voice settings.
    pub voice: VoiceSettings,
    /// Simulated suspend-point durations.
    pub delays: Delays,
}

/// Confirmation playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Whether confirmations are spoken. Toggleable at runtime.
    pub enabled: bool,
    /// Hard ceiling on one playback before the step is treated as
    /// complete anyway.
    pub playback_timeout_ms: u64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            playback_timeout_ms: 8_000,
        }
    }
}

/// Simulated delays for each pipeline suspend point (milliseconds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delays {
    /// Classification step.
    pub classify_ms: u64,
    /// Routing step.
    pub route_ms: u64,
    /// Escalated inference wait, sampled from [min, max).
    pub cloud_infer_min_ms: u64,
    pub cloud_infer_max_ms: u64,
    /// On-device inference wait, sampled from [min, max).
    pub device_infer_min_ms: u64,
    pub device_infer_max_ms: u64,
    /// Pause between rendered cards.
    pub card_ms: u64,
    /// Error state cool-down before auto-recovery to idle.
    pub error_cooldown_ms: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            classify_ms: 150,
            route_ms: 200,
            cloud_infer_min_ms: 800,
            cloud_infer_max_ms: 1_200,
            device_infer_min_ms: 60,
            device_infer_max_ms: 140,
            card_ms: 100,
            error_cooldown_ms: 2_000,
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl Config {
    /// Load configuration from an explicit path, or from the default
    /// location. A missing file yields defaults; a malformed file is an
    /// error rather than a silent fallback.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Config::default()),
            },
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file — using defaults");
            return Ok(Config::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Default config file path under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "echoroute").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

// ── Tests ────────────────────────────────────────────────────────
