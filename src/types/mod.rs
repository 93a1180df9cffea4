//! Core types for the MIDAS harness

mod config;
mod error;
mod event;
mod report;
mod state;
mod turn;

pub use config::{clamp_turns, HarnessConfig, ENV_PREFIX};
pub use error::{GeneratorRole, HarnessError, HarnessResult};
pub use event::{CollapseEvent, Event, MetricsData, StateData};
pub use report::{CollapseCause, RunReport};
pub use state::HarnessState;
pub use turn::{MetricSequences, TurnRecord};
