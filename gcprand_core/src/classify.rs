//! Discrete color bands for the normalized index.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Color band of an index, ordered from the lowest band to the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorLabel {
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
}

impl ColorLabel {
    pub const ALL: [ColorLabel; 7] = [
        ColorLabel::Gray,
        ColorLabel::Red,
        ColorLabel::Orange,
        ColorLabel::Yellow,
        ColorLabel::Green,
        ColorLabel::Teal,
        ColorLabel::Blue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorLabel::Gray => "gray",
            ColorLabel::Red => "red",
            ColorLabel::Orange => "orange",
            ColorLabel::Yellow => "yellow",
            ColorLabel::Green => "green",
            ColorLabel::Teal => "teal",
            ColorLabel::Blue => "blue",
        }
    }
}

impl fmt::Display for ColorLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color label: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for ColorLabel {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorLabel::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// Map an index in [0, 1] to its color band.
///
/// Bands: 0 gray, (0, 0.05) red, [0.05, 0.10) orange, [0.10, 0.40) yellow,
/// [0.40, 0.90) green, [0.90, 0.95] teal, (0.95, 1.0] blue.
/// Teal is checked before blue, so it owns 0.95. Anything outside [0, 1],
/// including NaN, falls back to gray.
pub fn classify(index: f64) -> ColorLabel {
    if index == 0.0 {
        ColorLabel::Gray
    } else if index > 0.0 && index < 0.05 {
        ColorLabel::Red
    } else if (0.05..0.10).contains(&index) {
        ColorLabel::Orange
    } else if (0.10..0.40).contains(&index) {
        ColorLabel::Yellow
    } else if (0.40..0.90).contains(&index) {
        ColorLabel::Green
    } else if (0.90..=0.95).contains(&index) {
        ColorLabel::Teal
    } else if (0.95..=1.0).contains(&index) {
        ColorLabel::Blue
    } else {
        ColorLabel::Gray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(classify(0.0), ColorLabel::Gray);
        assert_eq!(classify(0.049999), ColorLabel::Red);
        assert_eq!(classify(0.05), ColorLabel::Orange);
        assert_eq!(classify(0.1), ColorLabel::Yellow);
        assert_eq!(classify(0.39999), ColorLabel::Yellow);
        assert_eq!(classify(0.4), ColorLabel::Green);
        assert_eq!(classify(0.9), ColorLabel::Teal);
        assert_eq!(classify(0.95), ColorLabel::Teal);
        assert_eq!(classify(0.96), ColorLabel::Blue);
        assert_eq!(classify(1.0), ColorLabel::Blue);
    }

    #[test]
    fn out_of_table_is_gray() {
        assert_eq!(classify(-0.01), ColorLabel::Gray);
        assert_eq!(classify(1.0001), ColorLabel::Gray);
        assert_eq!(classify(f64::NAN), ColorLabel::Gray);
        assert_eq!(classify(f64::INFINITY), ColorLabel::Gray);
    }

    #[test]
    fn labels_round_trip_through_text() {
        for c in ColorLabel::ALL {
            assert_eq!(c.to_string().parse::<ColorLabel>(), Ok(c));
        }
        assert_eq!(" Teal ".parse::<ColorLabel>(), Ok(ColorLabel::Teal));
        assert!("purple".parse::<ColorLabel>().is_err());
    }
}
