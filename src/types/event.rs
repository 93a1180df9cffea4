//! Structured event records
//!
//! Wire shape: `{"event": <tag>, "data": {...}}`, one record per line.

use serde::{Deserialize, Serialize};

/// Per-turn metric values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsData {
    /// 1-based turn index
    pub turn: usize,
    /// Drift D(t) between S_t and the prior state
    #[serde(rename = "D")]
    pub drift: f64,
    /// Preservation fidelity P(t) of R_t against S_t
    #[serde(rename = "P")]
    pub preservation: f64,
}

/// Carried state after a turn's update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateData {
    pub turn: usize,
    pub text: String,
}

/// Terminal collapse marker, at most one per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapseEvent {
    pub turn: usize,
    pub reason: String,
}

/// One emitted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum Event {
    Metrics(MetricsData),
    State(StateData),
    Collapse(CollapseEvent),
}

impl Event {
    pub fn metrics(turn: usize, drift: f64, preservation: f64) -> Self {
        Event::Metrics(MetricsData { turn, drift, preservation })
    }

    pub fn state(turn: usize, text: impl Into<String>) -> Self {
        Event::State(StateData { turn, text: text.into() })
    }

    pub fn collapse(turn: usize, reason: impl Into<String>) -> Self {
        Event::Collapse(CollapseEvent { turn, reason: reason.into() })
    }

    /// Tag string as it appears on the wire
    pub fn tag(&self) -> &'static str {
        match self {
            Event::Metrics(_) => "metrics",
            Event::State(_) => "state",
            Event::Collapse(_) => "collapse",
        }
    }

    /// Turn the record belongs to
    pub fn turn(&self) -> usize {
        match self {
            Event::Metrics(m) => m.turn,
            Event::State(s) => s.turn,
            Event::Collapse(c) => c.turn,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
