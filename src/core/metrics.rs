//! Metric engine: drift D(t) and preservation fidelity P(t)
//!
//! Both work on normalized text and count Unicode scalar values, not bytes.
//!
//! - D(t) = lev(S_t, S_{t-1}) / max(|S_t|, |S_{t-1}|), always in [0, 1]
//! - P(t) = 1 - mismatches / |original|, unbounded below

use crate::core::normalize::normalize_str;

/// Character-level Levenshtein distance (unit-cost insert, delete, substitute)
///
/// Rolling two-row table sized by the shorter input.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr: Vec<usize> = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let insert = curr[j] + 1;
            let delete = prev[j + 1] + 1;
            let substitute = prev[j] + usize::from(lc != sc);
            curr[j + 1] = insert.min(delete).min(substitute);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Normalized drift between the current output and the prior state
pub fn drift(current: &str, previous: &str) -> f64 {
    let current = normalize_str(current);
    let previous = normalize_str(previous);

    let current_len = current.chars().count();
    let previous_len = previous.chars().count();

    match (current_len, previous_len) {
        (0, 0) => 0.0,
        (0, _) | (_, 0) => 1.0,
        _ => {
            let distance = levenshtein(&current, &previous);
            distance as f64 / current_len.max(previous_len) as f64
        }
    }
}

/// Preservation fidelity of a resurfaced copy against its original
///
/// Positional mismatches over the shared prefix plus the length difference.
/// An empty original scores 0.0. Scores are not clamped and go negative
/// when mismatches exceed the original's length.
pub fn preservation(resurfaced: &str, original: &str) -> f64 {
    let resurfaced = normalize_str(resurfaced);
    let original = normalize_str(original);

    let original_len = original.chars().count();
    if original_len == 0 {
        return 0.0;
    }
    let resurfaced_len = resurfaced.chars().count();

    let positional = resurfaced
        .chars()
        .zip(original.chars())
        .filter(|(r, o)| r != o)
        .count();
    let mismatches = positional + resurfaced_len.abs_diff(original_len);

    1.0 - mismatches as f64 / original_len as f64
}

// =============================================================================
// TESTS
// =============================================================================
