//! Quick Start Example
//!
//! Samples a simulated chart a few times, draws from the history and pushes
//! one color to a console light.
//!
//! Run with `cargo run -p gcprand_core --example quick_start`.

use gcprand_core::{AcquireCfg, GatherParams, GcpDot};
use gcprand_devices::{ConsoleLight, SimulatedIndicator};
use gcprand_traits::{Clock, SystemClock};
use std::time::Duration;

fn main() -> gcprand_core::Result<()> {
    let clock = SystemClock::new();
    let start = clock.now();

    // Seeded so repeated runs print the same values
    let indicator = SimulatedIndicator::new(Some(2024), 450.0, 0.1);
    let mut dot = GcpDot::new(indicator, clock.clone(), AcquireCfg::default())?;

    let obs = dot.sample()?;
    println!(
        "index = {} ({}), shifted = {}",
        obs.index(),
        obs.color(),
        obs.shifted_value()
    );

    // Print every shifted value after every 3rd sample
    let params = GatherParams {
        limit: 6,
        flush_every: 3,
        delay: Duration::from_millis(20),
    };
    let report = dot.gather(&params, &mut std::io::stdout())?;
    println!("{} samples, {} flushes", report.samples, report.flushes);

    println!("drawn from history: {}", dot.draw_random(false)?);

    let mut light = ConsoleLight::new();
    let update = dot.update_light(&mut light, 0.4, 0.4)?;
    println!("light xy = {:?}", update.light.xy);

    println!(
        "{} observations in {} ms, {} resampled readings",
        dot.history().count(),
        clock.ms_since(start),
        dot.acquirer().resamples()
    );
    Ok(())
}
