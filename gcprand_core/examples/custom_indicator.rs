//! Example: Custom Indicator
//!
//! Any reading source plugs in through `gcprand_traits::Indicator`. This one
//! sweeps the marker across the chart and overshoots every fourth reading;
//! the acquirer resamples those.

use gcprand_core::{AcquireCfg, GcpDot};
use gcprand_traits::{Indicator, RawReading, SystemClock};
use std::time::Duration;

struct Sweep {
    step: u32,
}

impl Indicator for Sweep {
    fn read(
        &mut self,
        _timeout: Duration,
    ) -> Result<RawReading, Box<dyn std::error::Error + Send + Sync>> {
        self.step += 1;
        let scale = 300.0;
        let position = if self.step % 4 == 0 {
            scale + 10.0
        } else {
            f64::from(self.step % 10) * 30.0
        };
        Ok(RawReading::new(position, scale))
    }
}

fn main() -> gcprand_core::Result<()> {
    let mut dot = GcpDot::new(Sweep { step: 0 }, SystemClock::new(), AcquireCfg::default())?;
    for _ in 0..8 {
        let obs = dot.sample()?;
        println!("{:>6} {:<7} {}", obs.index(), obs.color(), obs.shifted_value());
    }
    println!("resampled {} readings", dot.acquirer().resamples());
    Ok(())
}
