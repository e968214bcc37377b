//! Sampling facade: one acquirer plus the history it feeds.

use crate::acquirer::{AcquireCfg, Acquirer};
use crate::classify::ColorLabel;
use crate::error::{GcpError, Result};
use crate::history::History;
use crate::light::light_color;
use crate::observation::Observation;
use gcprand_traits::{Clock, Indicator, LightColor, LightSink};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Parameters of a gathering run.
#[derive(Debug, Clone, PartialEq)]
pub struct GatherParams {
    /// Number of samples to take.
    pub limit: usize,
    /// Emit the full shifted-value list after every `flush_every`-th sample.
    pub flush_every: usize,
    /// Pause between consecutive samples.
    pub delay: Duration,
}

impl Default for GatherParams {
    fn default() -> Self {
        Self {
            limit: 420,
            flush_every: 5,
            delay: Duration::from_secs(3),
        }
    }
}

impl GatherParams {
    pub fn validate(&self) -> Result<()> {
        if self.flush_every == 0 {
            return Err(GcpError::Config("flush_every must be >= 1".into()));
        }
        Ok(())
    }
}

/// What a gathering run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatherReport {
    pub samples: usize,
    pub flushes: usize,
    pub stopped_early: bool,
}

/// Result of pushing a fresh sample to a light.
#[derive(Debug, Clone, PartialEq)]
pub struct LightUpdate {
    pub observation: Observation,
    pub color: ColorLabel,
    pub light: LightColor,
    /// False when the sink rejected the color.
    pub applied: bool,
}

/// Samples the indicator and keeps every observation.
pub struct GcpDot<I: Indicator, C: Clock> {
    acquirer: Acquirer<I, C>,
    history: History,
}

impl<I: Indicator, C: Clock> core::fmt::Debug for GcpDot<I, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GcpDot")
            .field("observations", &self.history.count())
            .field("resamples", &self.acquirer.resamples())
            .finish()
    }
}

impl<I: Indicator, C: Clock> GcpDot<I, C> {
    pub fn new(indicator: I, clock: C, cfg: AcquireCfg) -> Result<Self> {
        Ok(Self::from_acquirer(Acquirer::new(indicator, clock, cfg)?))
    }

    pub fn from_acquirer(acquirer: Acquirer<I, C>) -> Self {
        Self {
            acquirer,
            history: History::new(),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn acquirer(&self) -> &Acquirer<I, C> {
        &self.acquirer
    }

    pub fn into_history(self) -> History {
        self.history
    }

    /// Acquire one observation, append it and return the stored entry.
    pub fn sample(&mut self) -> Result<&Observation> {
        let obs = self.acquirer.acquire()?;
        tracing::info!(
            index = obs.index(),
            color = %obs.color(),
            shifted = obs.shifted_value(),
            "sample"
        );
        self.history.append(obs);
        self.history.latest()
    }

    /// One-shot draw in the spirit of `random()`.
    ///
    /// `fresh` takes a new sample. Otherwise a uniformly chosen stored entry is
    /// used, sampling exactly once first when the history is empty.
    pub fn draw_random(&mut self, fresh: bool) -> Result<f64> {
        if fresh {
            return Ok(self.sample()?.shifted_value());
        }
        if self.history.is_empty() {
            self.sample()?;
        }
        Ok(self.history.random_entry()?.shifted_value())
    }

    /// Take `params.limit` samples, writing the shifted values of the whole
    /// history to `out` after every `params.flush_every`-th one.
    /// The first failing sample ends the run with its error.
    pub fn gather<W: Write + ?Sized>(
        &mut self,
        params: &GatherParams,
        out: &mut W,
    ) -> Result<GatherReport> {
        self.gather_inner(params, out, None)
    }

    /// Like [`GcpDot::gather`], but stops before the next sample once
    /// `shutdown` is set. Stopping early is not an error.
    pub fn gather_until<W: Write + ?Sized>(
        &mut self,
        params: &GatherParams,
        out: &mut W,
        shutdown: &AtomicBool,
    ) -> Result<GatherReport> {
        self.gather_inner(params, out, Some(shutdown))
    }

    fn gather_inner<W: Write + ?Sized>(
        &mut self,
        params: &GatherParams,
        out: &mut W,
        shutdown: Option<&AtomicBool>,
    ) -> Result<GatherReport> {
        params.validate()?;
        let mut report = GatherReport::default();
        tracing::info!(
            limit = params.limit,
            flush_every = params.flush_every,
            delay_ms = params.delay.as_millis() as u64,
            "gather start"
        );
        for i in 0..params.limit {
            if let Some(flag) = shutdown
                && flag.load(Ordering::Relaxed)
            {
                tracing::info!(samples = report.samples, "gather stopped");
                report.stopped_early = true;
                break;
            }

            self.sample()?;
            report.samples += 1;

            if report.samples % params.flush_every == 0 {
                self.history.write_shifted(out)?;
                report.flushes += 1;
                tracing::debug!(entries = self.history.count(), "flushed shifted values");
            }

            if i + 1 < params.limit {
                self.acquirer.clock().sleep(params.delay);
            }
        }
        tracing::info!(
            samples = report.samples,
            flushes = report.flushes,
            "gather done"
        );
        Ok(report)
    }

    /// Take a fresh sample and show it on `sink`, using the index as hue.
    /// A sink failure is logged and reported through `applied`.
    pub fn update_light<L: LightSink + ?Sized>(
        &mut self,
        sink: &mut L,
        lightness: f64,
        saturation: f64,
    ) -> Result<LightUpdate> {
        if !(0.0..=1.0).contains(&lightness) || !(0.0..=1.0).contains(&saturation) {
            return Err(GcpError::Config(
                "lightness and saturation must be in [0.0, 1.0]".into(),
            ));
        }
        let observation = self.sample()?.clone();
        let light = light_color(observation.index(), lightness, saturation);
        let applied = match sink.apply(&light) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "light sink rejected color");
                false
            }
        };
        Ok(LightUpdate {
            color: observation.color(),
            observation,
            light,
            applied,
        })
    }
}
