//! Validated, immutable observation built from one raw reading.

use crate::classify::{ColorLabel, classify};
use crate::derive::derive;
use gcprand_traits::RawReading;
use serde::Serialize;

/// Why a raw reading was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFault {
    /// Position or scale is NaN or infinite.
    NonFinite,
    /// Position is below zero.
    NegativePosition,
    /// Scale is zero or negative, so there is nothing to map onto.
    NonPositiveScale,
    /// Position lies beyond the scale (transient animation artifact).
    AboveScale,
}

/// Outcome of checking a raw reading against its scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingVerdict {
    InScale,
    OutOfScale(RangeFault),
}

/// Check that both values are finite, the scale is positive and
/// `0 <= position <= scale`.
pub fn validate(reading: &RawReading) -> ReadingVerdict {
    let RawReading { position, scale } = *reading;
    let fault = if !position.is_finite() || !scale.is_finite() {
        Some(RangeFault::NonFinite)
    } else if scale <= 0.0 {
        Some(RangeFault::NonPositiveScale)
    } else if position < 0.0 {
        Some(RangeFault::NegativePosition)
    } else if position > scale {
        Some(RangeFault::AboveScale)
    } else {
        None
    };
    match fault {
        Some(f) => ReadingVerdict::OutOfScale(f),
        None => ReadingVerdict::InScale,
    }
}

/// Linear map of `position` from `[0, scale]` onto `[0.0, 1.0]`, clamped.
/// Degenerate inputs (non-positive scale, NaN) map to 0.0.
pub fn normalize(position: f64, scale: f64) -> f64 {
    if scale.is_nan() || scale <= 0.0 {
        return 0.0;
    }
    let ratio = position / scale;
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// One processed sample of the indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    raw_position: f64,
    index: f64,
    timestamp: f64,
    color: ColorLabel,
    shifted_value: f64,
}

impl Observation {
    /// Build an observation from an in-scale reading stamped at `timestamp`
    /// (seconds since the UNIX epoch).
    pub fn from_reading(reading: RawReading, timestamp: f64) -> Result<Self, RangeFault> {
        if let ReadingVerdict::OutOfScale(fault) = validate(&reading) {
            return Err(fault);
        }
        let index = normalize(reading.position, reading.scale);
        Ok(Self {
            raw_position: reading.position,
            index,
            timestamp,
            color: classify(index),
            shifted_value: derive(index),
        })
    }

    pub fn raw_position(&self) -> f64 {
        self.raw_position
    }

    pub fn index(&self) -> f64 {
        self.index
    }

    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn color(&self) -> ColorLabel {
        self.color
    }

    pub fn shifted_value(&self) -> f64 {
        self.shifted_value
    }
}
