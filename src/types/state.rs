//! Harness run states

use colored::Color;
use serde::{Deserialize, Serialize};

/// The three states of an interaction run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarnessState {
    /// Turns are still being executed
    Running,
    /// A collapse condition fired, no further turns run
    Collapsed,
    /// All turns ran without collapse
    Completed,
}

impl HarnessState {
    /// Terminal color for summaries
    pub fn color(&self) -> Color {
        match self {
            HarnessState::Running => Color::Yellow,
            HarnessState::Collapsed => Color::Red,
            HarnessState::Completed => Color::Green,
        }
    }

    /// True once the run can make no further progress
    pub fn is_terminal(&self) -> bool {
        !matches!(self, HarnessState::Running)
    }
}

impl std::fmt::Display for HarnessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HarnessState::Running => "RUNNING",
            HarnessState::Collapsed => "COLLAPSED",
            HarnessState::Completed => "COMPLETED",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// TESTS
// =============================================================================
