//! Harness configuration
//!
//! An explicit settings value handed to the harness at construction.
//! Layering when loaded: defaults → optional JSON file → `MIDAS_*` env.

use std::path::Path;

use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{HarnessError, HarnessResult};
use crate::{
    DEFAULT_STABILITY_WINDOW, DEFAULT_TURNS, DRIFT_COLLAPSE_THRESHOLD, PRESERVATION_STREAK,
    PRESERVATION_THRESHOLD,
};

/// Environment prefix for overrides (e.g. `MIDAS_TURNS=10`)
pub const ENV_PREFIX: &str = "MIDAS_";

/// Runtime configuration for one interaction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Number of turns to attempt. Zero or a negative count runs nothing.
    #[serde(deserialize_with = "deserialize_turns")]
    pub turns: usize,

    /// Gate for contradiction correction and resurfaced-state carry.
    pub invariants_enabled: bool,

    /// Collapse if D(t) exceeds this.
    /// Default: 0.5
    pub drift_collapse_threshold: f64,

    /// P(t) below this counts toward a streak.
    /// Default: 0.8
    pub preservation_threshold: f64,

    /// Consecutive low-P turns that collapse the run.
    /// Default: 3
    pub preservation_streak: usize,

    /// Reserved.
    pub stability_window: usize,

    // Per-category invariant toggles. Declared for extensions; the loop
    // only consults `invariants_enabled`.
    pub correction_immediacy: bool,
    pub exact_resurfacing: bool,
    pub continuity_of_state: bool,
    pub channel_separation: bool,

    // Logging toggles, reserved in the same way.
    pub log_intermediate_states: bool,
    pub log_metrics: bool,
}

/// Map a signed turn count onto the loop bound. Non-positive counts run nothing.
pub fn clamp_turns(turns: i64) -> usize {
    usize::try_from(turns).unwrap_or(0)
}

fn deserialize_turns<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_turns)
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            turns: DEFAULT_TURNS,
            invariants_enabled: true,
            drift_collapse_threshold: DRIFT_COLLAPSE_THRESHOLD,
            preservation_threshold: PRESERVATION_THRESHOLD,
            preservation_streak: PRESERVATION_STREAK,
            stability_window: DEFAULT_STABILITY_WINDOW,
            correction_immediacy: true,
            exact_resurfacing: true,
            continuity_of_state: true,
            channel_separation: true,
            log_intermediate_states: true,
            log_metrics: true,
        }
    }
}

impl HarnessConfig {
    /// Defaults with a given turn count and invariant gate
    pub fn new(turns: usize, invariants_enabled: bool) -> Self {
        Self {
            turns,
            invariants_enabled,
            ..Self::default()
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> HarnessResult<()> {
        if !self.drift_collapse_threshold.is_finite() {
            return Err(HarnessError::Config(format!(
                "drift_collapse_threshold must be finite, got {}",
                self.drift_collapse_threshold
            )));
        }
        if !self.preservation_threshold.is_finite() {
            return Err(HarnessError::Config(format!(
                "preservation_threshold must be finite, got {}",
                self.preservation_threshold
            )));
        }
        if self.preservation_streak < 1 {
            return Err(HarnessError::Config(format!(
                "preservation_streak must be >= 1, got {}",
                self.preservation_streak
            )));
        }
        if self.stability_window < 1 {
            return Err(HarnessError::Config(format!(
                "stability_window must be >= 1, got {}",
                self.stability_window
            )));
        }
        Ok(())
    }

    /// Load from JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> HarnessResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| HarnessError::Config(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load with layering: defaults, then `path` if given, then `MIDAS_*` env vars.
    pub fn load(path: Option<&Path>) -> HarnessResult<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if !path.exists() {
                return Err(HarnessError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Json::file(path));
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| HarnessError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// TESTS
// =============================================================================
