use std::time::{Duration, Instant};

use crate::error::{DeviceError, Result};

/// Poll `pending` every `poll_interval` until it reports false, failing with
/// `DeviceError::Timeout` once `timeout` has passed. Returns the time waited.
pub fn wait_while_with_timeout(
    mut pending: impl FnMut() -> bool,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Duration> {
    let start = Instant::now();
    while pending() {
        if start.elapsed() >= timeout {
            return Err(DeviceError::Timeout);
        }
        std::thread::sleep(poll_interval);
    }
    Ok(start.elapsed())
}
