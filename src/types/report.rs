//! End-of-run report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CollapseEvent, HarnessState};

/// Which collapse condition fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollapseCause {
    /// D(t) above the drift threshold
    Drift,
    /// P below threshold for the configured streak
    PreservationStreak,
    /// Repetition detector fired
    Repetition,
}

impl CollapseCause {
    pub fn code(&self) -> &'static str {
        match self {
            CollapseCause::Drift => "drift",
            CollapseCause::PreservationStreak => "preservation_streak",
            CollapseCause::Repetition => "repetition",
        }
    }
}

/// Outcome of a completed or collapsed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// COLLAPSED or COMPLETED
    pub state: HarnessState,
    /// Turns whose metrics were recorded
    pub turns_executed: usize,
    /// P, in turn order
    pub preservation: Vec<f64>,
    /// D, in turn order
    pub drift: Vec<f64>,
    /// Present iff state == COLLAPSED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapse: Option<CollapseEvent>,
    /// Conditions that held on the collapsing turn
    pub causes: Vec<CollapseCause>,
    /// Carried state after the last turn
    pub final_text: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn collapsed(&self) -> bool {
        self.state == HarnessState::Collapsed
    }

    /// Mean drift, or None when no turns ran
    pub fn mean_drift(&self) -> Option<f64> {
        mean(&self.drift)
    }

    /// Mean preservation, or None when no turns ran
    pub fn mean_preservation(&self) -> Option<f64> {
        mean(&self.preservation)
    }

    /// Wall-clock duration in milliseconds
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn report(drift: Vec<f64>, preservation: Vec<f64>) -> RunReport {
        let now = Utc::now();
        RunReport {
            state: HarnessState::Completed,
            turns_executed: drift.len(),
            preservation,
            drift,
            collapse: None,
            causes: Vec::new(),
            final_text: String::new(),
            started_at: now,
            finished_at: now,
        }
    }

    #[test]
    fn test_means() {
        let r = report(vec![0.0, 0.5], vec![1.0, 0.0]);
        assert_eq!(r.mean_drift(), Some(0.25));
        assert_eq!(r.mean_preservation(), Some(0.5));
    }

    #[test]
    fn test_means_empty() {
        let r = report(vec![], vec![]);
        assert_eq!(r.mean_drift(), None);
        assert!(!r.collapsed());
    }
}
