use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Clock abstraction for timestamps and pacing across the stack.
///
/// - now(): returns a monotonic Instant
/// - timestamp(): wall-clock seconds since the UNIX epoch
/// - sleep(): suspends for the provided duration (implementations may simulate)
pub trait Clock {
    fn now(&self) -> Instant;
    fn timestamp(&self) -> f64;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch`, saturating at 0 on underflow.
    fn ms_since(&self, epoch: Instant) -> u64 {
        let dur = self.now().saturating_duration_since(epoch);
        dur.as_millis().min(u128::from(u64::MAX)) as u64
    }
}

/// Real clock: monotonic `Instant`, UTC wall time and real thread sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn timestamp(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

/// Deterministic clock whose time only moves when told to.
///
/// now() = origin + offset, timestamp() = start_secs + offset.
/// sleep(d) advances the offset by d without blocking. Clones share the offset,
/// so a test can keep a handle while the clock is owned elsewhere.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    start_secs: f64,
    offset: Arc<Mutex<Duration>>,
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(1_700_000_000.0)
    }

    /// Start the wall clock at `start_secs` seconds since the epoch.
    pub fn starting_at(start_secs: f64) -> Self {
        Self {
            origin: Instant::now(),
            start_secs,
            offset: Arc::new(Mutex::new(Duration::ZERO)),
            slept: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, d: Duration) {
        if let Ok(mut off) = self.offset.lock() {
            *off = off.saturating_add(d);
        }
    }

    /// Every duration passed to `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.slept.lock().map(|g| g.clone()).unwrap_or_default()
    }

    fn offset(&self) -> Duration {
        self.offset.lock().map(|g| *g).unwrap_or(Duration::ZERO)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset()
    }

    fn timestamp(&self) -> f64 {
        self.start_secs + self.offset().as_secs_f64()
    }

    fn sleep(&self, d: Duration) {
        if let Ok(mut s) = self.slept.lock() {
            s.push(d);
        }
        self.advance(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_on_sleep() {
        let clock = ManualClock::starting_at(100.0);
        let handle = clock.clone();
        clock.sleep(Duration::from_millis(1500));
        assert!((handle.timestamp() - 101.5).abs() < 1e-9);
        assert_eq!(handle.sleeps(), vec![Duration::from_millis(1500)]);
        assert_eq!(handle.ms_since(handle.origin), 1500);
    }

    #[test]
    fn system_clock_timestamp_is_recent() {
        let ts = SystemClock::new().timestamp();
        // 2020-01-01T00:00:00Z
        assert!(ts > 1_577_836_800.0);
    }

    #[test]
    fn system_clock_zero_sleep_returns() {
        SystemClock::new().sleep(Duration::ZERO);
    }
}
