//! String length validation functions
//!
//! Lengths are counted in characters, not bytes, so `"héllo"` has length 5.

/// Length of a string in characters
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Whether a value of `actual` length satisfies a minimum length
///
/// An empty value always passes; emptiness is the concern of `required`.
pub fn meets_min_length(actual: usize, min: usize) -> bool {
    actual == 0 || actual >= min
}

/// Whether a value of `actual` length satisfies a maximum length
pub fn meets_max_length(actual: usize, max: usize) -> bool {
    actual <= max
}
