//! Text normalization for reproducible character-level comparison
//!
//! NFC composition, then trailing `\n` removal. Other whitespace is kept.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize `text`; `None` normalizes to the empty string
pub fn normalize(text: Option<&str>) -> String {
    match text {
        Some(text) => normalize_str(text),
        None => String::new(),
    }
}

/// Canonicalize a present text value
pub fn normalize_str(text: &str) -> String {
    let mut composed: String = text.nfc().collect();
    let kept = composed.trim_end_matches('\n').len();
    composed.truncate(kept);
    composed
}

// =============================================================================
// TESTS
// =============================================================================
