//! MIDAS: dual-model evaluation harness
//!
//! Runs a fixed number of turns between two text generators, measures
//! drift and preservation fidelity per turn, optionally enforces
//! invariants, and halts early on collapse.
//!
//! Pipeline per turn: Generator A → Generator B → metrics → detectors → event sink

pub mod core;
pub mod types;

// =============================================================================
// INTERACTION SETTINGS
// =============================================================================

/// Default number of interaction turns
pub const DEFAULT_TURNS: usize = 50;

/// Default stability window (reserved, not consulted by the loop)
pub const DEFAULT_STABILITY_WINDOW: usize = 5;

// =============================================================================
// METRIC THRESHOLDS
// =============================================================================

/// Drift strictly above this collapses the run
pub const DRIFT_COLLAPSE_THRESHOLD: f64 = 0.5;

/// Preservation strictly below this counts toward a low-preservation streak
pub const PRESERVATION_THRESHOLD: f64 = 0.8;

/// Consecutive low-preservation turns required for collapse
pub const PRESERVATION_STREAK: usize = 3;

/// Window handed to the repetition detector
pub const REPETITION_WINDOW: usize = 3;

// =============================================================================
// PROMPT TEMPLATES
// =============================================================================

/// Prefix of the resurfacing prompt sent to Generator B
pub const RESURFACE_PREFIX: &str = "Repeat exactly:\n";

/// Reason attached to every collapse event
pub const COLLAPSE_REASON: &str = "collapse condition met";

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.5.0";
