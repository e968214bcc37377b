//! Observation acquirer: read, validate, resample, normalize, stamp.
//!
//! ```text
//! Requesting -> Validating -> Done
//!                   |
//!                   +-> Resampling -> Requesting   (out-of-scale reading)
//!                   +-> Exhausted                  (max_attempts reached)
//! ```
//!
//! Indicator errors leave the loop immediately; only out-of-scale readings
//! are retried.

use crate::error::{GcpError, Result};
use crate::indicator_error::map_indicator_error;
use crate::observation::Observation;
use gcprand_traits::{Clock, Indicator};
use std::time::Duration;

/// Acquisition limits.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquireCfg {
    /// Readings requested per `acquire()` before giving up (>= 1).
    pub max_attempts: u32,
    /// Timeout handed to every `Indicator::read`.
    pub read_timeout: Duration,
}

impl Default for AcquireCfg {
    fn default() -> Self {
        Self {
            max_attempts: 32,
            read_timeout: Duration::from_millis(5_000),
        }
    }
}

impl AcquireCfg {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(GcpError::Config("max_attempts must be >= 1".into()));
        }
        if self.read_timeout.is_zero() {
            return Err(GcpError::Config("read_timeout must be > 0".into()));
        }
        Ok(())
    }
}

/// Turns raw indicator readings into observations.
pub struct Acquirer<I: Indicator, C: Clock> {
    indicator: I,
    clock: C,
    cfg: AcquireCfg,
    last_timestamp: Option<f64>,
    resamples: u64,
}

impl<I: Indicator, C: Clock> core::fmt::Debug for Acquirer<I, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Acquirer")
            .field("cfg", &self.cfg)
            .field("last_timestamp", &self.last_timestamp)
            .field("resamples", &self.resamples)
            .finish()
    }
}

impl<I: Indicator, C: Clock> Acquirer<I, C> {
    pub fn new(indicator: I, clock: C, cfg: AcquireCfg) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            indicator,
            clock,
            cfg,
            last_timestamp: None,
            resamples: 0,
        })
    }

    /// Acquire one observation. Does not touch any history.
    pub fn acquire(&mut self) -> Result<Observation> {
        for attempt in 1..=self.cfg.max_attempts {
            let reading = self
                .indicator
                .read(self.cfg.read_timeout)
                .map_err(|e| map_indicator_error(e.as_ref()))?;

            let timestamp = self.next_timestamp();
            match Observation::from_reading(reading, timestamp) {
                Ok(obs) => {
                    self.last_timestamp = Some(timestamp);
                    return Ok(obs);
                }
                Err(fault) => {
                    self.resamples = self.resamples.saturating_add(1);
                    tracing::debug!(
                        attempt,
                        position = reading.position,
                        scale = reading.scale,
                        ?fault,
                        "out-of-scale reading, resampling"
                    );
                }
            }
        }
        tracing::warn!(
            attempts = self.cfg.max_attempts,
            "no in-scale reading within attempt bound"
        );
        Err(GcpError::AcquisitionExhausted {
            attempts: self.cfg.max_attempts,
        })
    }

    /// Wall time, never earlier than the previous stamp.
    fn next_timestamp(&self) -> f64 {
        let now = self.clock.timestamp();
        match self.last_timestamp {
            Some(prev) if prev > now => prev,
            _ => now,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn cfg(&self) -> &AcquireCfg {
        &self.cfg
    }

    /// Total out-of-scale readings discarded so far.
    pub fn resamples(&self) -> u64 {
        self.resamples
    }

    pub fn indicator_mut(&mut self) -> &mut I {
        &mut self.indicator
    }
}
