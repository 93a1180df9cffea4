//! Detector hooks consulted by the interaction loop
//!
//! Contradiction and repetition are extension points: the default
//! [`InertDetectors`] never fires. Replacement strategies implement
//! [`Detectors`] and are handed to the harness; the loop is unchanged.

/// Capability set the loop calls once per turn
pub trait Detectors {
    /// Does `current` contradict `previous`? True triggers correction.
    fn contradiction_detected(&self, _current: &str, _previous: &str) -> bool {
        false
    }

    /// Is `text` degenerate looping output? True contributes to collapse.
    fn repetition_detected(&self, _text: &str, _window: usize) -> bool {
        false
    }

    /// Has preservation stayed below `threshold` for `streak` turns ending at `t`?
    fn low_preservation_streak(&self, p: &[f64], t: usize, threshold: f64, streak: usize) -> bool {
        low_preservation_streak(p, t, threshold, streak)
    }
}

/// Default detectors: contradiction and repetition never fire
#[derive(Debug, Default, Clone, Copy)]
pub struct InertDetectors;

impl Detectors for InertDetectors {}

/// True iff the `streak` entries of `p` ending at 0-based index `t` are all
/// strictly below `threshold`.
///
/// False with insufficient history (`t + 1 < streak`), when `t` is past the
/// end of `p`, or when `streak` is zero.
pub fn low_preservation_streak(p: &[f64], t: usize, threshold: f64, streak: usize) -> bool {
    if streak == 0 || t + 1 < streak || t >= p.len() {
        return false;
    }
    p[t + 1 - streak..=t].iter().all(|&value| value < threshold)
}

// =============================================================================
// TESTS
// =============================================================================
