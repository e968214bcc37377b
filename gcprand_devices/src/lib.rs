pub mod command;
pub mod error;
pub mod util;

pub use command::CommandIndicator;

use error::DeviceError;
use gcprand_traits::{Indicator, LightColor, LightSink, RawReading};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Simulated chart: the marker wanders as a bounded random walk and now and
/// then lands above the chart, like the real one does mid-animation.
pub struct SimulatedIndicator {
    rng: StdRng,
    scale: f64,
    glitch_rate: f64,
    index: f64,
    always_timeout: bool,
}

impl SimulatedIndicator {
    pub fn new(seed: Option<u64>, scale: f64, glitch_rate: f64) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let index = rng.gen_range(0.0..1.0);
        SimulatedIndicator {
            rng,
            scale: if scale.is_finite() && scale > 0.0 {
                scale
            } else {
                450.0
            },
            glitch_rate: if glitch_rate.is_finite() {
                glitch_rate.clamp(0.0, 1.0)
            } else {
                0.0
            },
            index,
            always_timeout: false,
        }
    }

    /// Make every read fail with `DeviceError::Timeout`.
    pub fn always_timeout(mut self) -> Self {
        self.always_timeout = true;
        self
    }
}

impl Indicator for SimulatedIndicator {
    fn read(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<RawReading, Box<dyn std::error::Error + Send + Sync>> {
        if self.always_timeout {
            return Err(Box::new(DeviceError::Timeout));
        }
        let step = self.rng.gen_range(-0.05..=0.05);
        self.index = (self.index + step).clamp(0.0, 1.0);
        let position = if self.rng.gen_bool(self.glitch_rate) {
            self.scale * self.rng.gen_range(1.01..1.5)
        } else {
            self.index * self.scale
        };
        tracing::trace!(position, scale = self.scale, "simulated reading");
        Ok(RawReading::new(position, self.scale))
    }
}

/// Plays back recorded readings in order; errors once they run out.
#[derive(Debug, Default)]
pub struct ReplayIndicator {
    readings: VecDeque<RawReading>,
    served: usize,
}

impl ReplayIndicator {
    pub fn new(readings: impl IntoIterator<Item = RawReading>) -> Self {
        ReplayIndicator {
            readings: readings.into_iter().collect(),
            served: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.readings.len()
    }
}

impl Indicator for ReplayIndicator {
    fn read(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<RawReading, Box<dyn std::error::Error + Send + Sync>> {
        match self.readings.pop_front() {
            Some(r) => {
                self.served += 1;
                Ok(r)
            }
            None => Err(Box::new(DeviceError::ReplayExhausted(self.served))),
        }
    }
}

/// Light that only logs what it would show.
#[derive(Debug, Default)]
pub struct ConsoleLight {
    last: Option<LightColor>,
    applied: usize,
}

impl ConsoleLight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&LightColor> {
        self.last.as_ref()
    }

    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl LightSink for ConsoleLight {
    fn apply(&mut self, color: &LightColor) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (r, g, b) = color.rgb;
        tracing::info!(
            r,
            g,
            b,
            x = color.xy.0,
            y = color.xy.1,
            "light color (simulated)"
        );
        self.last = Some(*color);
        self.applied += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const T: Duration = Duration::from_millis(100);

    #[test]
    fn seeded_simulator_is_reproducible() {
        let mut a = SimulatedIndicator::new(Some(42), 450.0, 0.2);
        let mut b = SimulatedIndicator::new(Some(42), 450.0, 0.2);
        for _ in 0..20 {
            assert_eq!(a.read(T).unwrap(), b.read(T).unwrap());
        }
    }

    #[test]
    fn simulator_without_glitches_stays_in_scale() {
        let mut sim = SimulatedIndicator::new(Some(1), 300.0, 0.0);
        for _ in 0..200 {
            let r = sim.read(T).unwrap();
            assert_eq!(r.scale, 300.0);
            assert!((0.0..=300.0).contains(&r.position), "{r:?}");
        }
    }

    #[test]
    fn simulator_glitches_land_above_scale() {
        let mut sim = SimulatedIndicator::new(Some(3), 450.0, 0.999);
        let above = (0..50)
            .filter(|_| {
                let r = sim.read(T).unwrap();
                r.position > r.scale
            })
            .count();
        assert!(above > 40);
    }

    #[test]
    fn non_finite_glitch_rate_means_no_glitches() {
        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut sim = SimulatedIndicator::new(Some(5), 450.0, rate);
            for _ in 0..50 {
                let r = sim.read(T).unwrap();
                assert!(r.position <= r.scale, "rate {rate}: {r:?}");
            }
        }
    }

    #[test]
    fn out_of_range_glitch_rate_is_clamped() {
        let mut sim = SimulatedIndicator::new(Some(5), 450.0, 7.0);
        for _ in 0..20 {
            let r = sim.read(T).unwrap();
            assert!(r.position > r.scale);
        }
    }

    #[test]
    fn every_device_error_has_a_message() {
        let errors = [
            DeviceError::Timeout,
            DeviceError::ReplayExhausted(3),
            DeviceError::Parse("x".into()),
            DeviceError::Command("false exited".into()),
            DeviceError::Io(std::io::Error::other("gone")),
        ];
        for e in errors {
            // exhaustive: each variant names the source that raises it
            let produced_by = match &e {
                DeviceError::Timeout => "simulator / command",
                DeviceError::ReplayExhausted(_) => "replay",
                DeviceError::Parse(_) | DeviceError::Command(_) | DeviceError::Io(_) => "command",
            };
            assert!(!e.to_string().is_empty(), "{produced_by}");
        }
    }

    #[test]
    fn timeout_mode_fails_every_read() {
        let mut sim = SimulatedIndicator::new(Some(1), 450.0, 0.0).always_timeout();
        let err = sim.read(T).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeviceError>(),
            Some(DeviceError::Timeout)
        ));
    }

    #[test]
    fn replay_serves_in_order_then_errors() {
        let mut rep = ReplayIndicator::new([RawReading::new(1.0, 2.0), RawReading::new(2.0, 2.0)]);
        assert_eq!(rep.read(T).unwrap(), RawReading::new(1.0, 2.0));
        assert_eq!(rep.read(T).unwrap(), RawReading::new(2.0, 2.0));
        assert_eq!(rep.remaining(), 0);
        let err = rep.read(T).unwrap_err();
        assert_eq!(err.to_string(), "replay exhausted after 2 readings");
    }

    #[test]
    fn console_light_records_last_color() {
        let mut light = ConsoleLight::new();
        let c = LightColor {
            rgb: (0.1, 0.2, 0.3),
            xy: (0.3, 0.3),
        };
        light.apply(&c).unwrap();
        assert_eq!(light.last(), Some(&c));
        assert_eq!(light.applied(), 1);
    }
}
