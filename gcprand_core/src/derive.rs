//! Digit-shift derivation of a pseudo-random fraction from an index.
//!
//! The index is rendered as its shortest round-trip decimal in positional
//! notation (Rust's `Display` for `f64`, which never switches to exponent
//! form). When that text is longer than [`SHIFT_PREFIX_LEN`] characters, the
//! remaining characters become the fractional digits of a new number:
//!
//! - `0.123456` -> `"0.123456"` -> `"23456"` -> `0.23456`
//! - `0.123` -> `"0.123"` -> `"23"` -> `0.23`
//! - `0.1` -> `"0.1"` (3 chars) -> unchanged
//!
//! This is a reproducible transform of a physical measurement, not a random
//! number generator. Do not use it where unpredictability matters.

/// Number of leading characters dropped before the digits are reused.
pub const SHIFT_PREFIX_LEN: usize = 3;

/// Largest `f64` below 1.0.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Shortest round-trip positional decimal text of `value`.
pub fn decimal_text(value: f64) -> String {
    format!("{value}")
}

/// Derive the shifted value of `index`.
///
/// Returns `index` unchanged when its decimal text has at most
/// [`SHIFT_PREFIX_LEN`] characters (`0`, `1`, `0.1`, ...) or when the tail is
/// not a plain digit run.
pub fn derive(index: f64) -> f64 {
    let text = decimal_text(index);
    if text.len() <= SHIFT_PREFIX_LEN {
        return index;
    }
    shifted_fraction(&text[SHIFT_PREFIX_LEN..]).unwrap_or(index)
}

/// Read `digits` as the fractional part of `0.<digits>`.
fn shifted_fraction(digits: &str) -> Option<f64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let v: f64 = format!("0.{digits}").parse().ok()?;
    Some(v.min(BELOW_ONE))
}
