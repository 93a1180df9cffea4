//! Core modules for the MIDAS harness

pub mod normalize;
pub mod metrics;
pub mod detectors;
pub mod generator;
pub mod emitter;
pub mod harness;

pub use normalize::{normalize, normalize_str};
pub use metrics::{drift, levenshtein, preservation};
pub use detectors::{low_preservation_streak, Detectors, InertDetectors};
pub use generator::{from_fn, CommandGenerator, EchoGenerator, FnGenerator, Generator, RepeatGenerator};
pub use emitter::{EventSink, JsonLinesSink, MemorySink};
pub use harness::{correction_prompt, resurface_prompt, Harness};
