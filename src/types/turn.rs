//! Turn model
//!
//! - Turn record = one execution of the loop body, 1-based
//! - Metric sequences = append-only P and D, one entry per completed turn

use serde::{Deserialize, Serialize};

/// Everything a single turn produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// 1-based turn index
    pub turn: usize,
    /// S_t after any correction
    pub generated: String,
    /// R_t, Generator B's resurfaced copy
    pub resurfaced: String,
    /// D(t)
    pub drift: f64,
    /// P(t)
    pub preservation: f64,
    /// Whether the correction branch rewrote S_t
    pub corrected: bool,
}

/// Append-only preservation and drift histories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSequences {
    preservation: Vec<f64>,
    drift: Vec<f64>,
}

impl MetricSequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one turn's values; both sequences grow together
    pub fn push(&mut self, preservation: f64, drift: f64) {
        self.preservation.push(preservation);
        self.drift.push(drift);
    }

    /// P, in turn order
    pub fn preservation(&self) -> &[f64] {
        &self.preservation
    }

    /// D, in turn order
    pub fn drift(&self) -> &[f64] {
        &self.drift
    }

    /// Number of completed turns
    pub fn len(&self) -> usize {
        self.preservation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preservation.is_empty()
    }

    /// Index of the most recent entry, if any
    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.preservation, self.drift)
    }
}

// =============================================================================
// TESTS
// =============================================================================
