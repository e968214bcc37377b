//! Background acquisition.
//!
//! Spawns a thread that owns the `Acquirer` and hands each observation to a
//! single consumer over a bounded channel. The consumer is the only writer of
//! its `History`, so chronological order is preserved without locking.
//!
//! The thread exits when the `Poller` is dropped, when the consumer goes away,
//! or after forwarding a terminal acquisition error.
use crate::acquirer::Acquirer;
use crate::error::{GcpError, Result};
use crate::history::History;
use crate::observation::Observation;
use crossbeam_channel as xch;
use gcprand_traits::{Clock, Indicator};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub struct Poller {
    rx: Option<xch::Receiver<Result<Observation>>>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Poller {
    /// Acquire continuously, pausing `period` between observations.
    pub fn spawn<I, C>(mut acquirer: Acquirer<I, C>, period: Duration) -> Self
    where
        I: Indicator + Send + 'static,
        C: Clock + Send + 'static,
    {
        let (tx, rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("poller thread received shutdown signal");
                    break;
                }

                match acquirer.acquire() {
                    Ok(obs) => {
                        if tx.send(Ok(obs)).is_err() {
                            tracing::debug!("poller consumer disconnected, exiting thread");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "poller stopping after acquisition error");
                        let _ = tx.send(Err(e));
                        break;
                    }
                }

                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                acquirer.clock().sleep(period);
            }
            tracing::trace!("poller thread exiting cleanly");
        });

        Self {
            rx: Some(rx),
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Next observation, waiting at most `timeout`.
    /// `None` on timeout or once the thread has exited and the channel is drained.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Result<Observation>> {
        self.rx.as_ref()?.recv_timeout(timeout).ok()
    }

    /// Receive `count` observations into `history`, waiting at most `timeout`
    /// for each. Returns how many were appended.
    pub fn collect_into(
        &self,
        history: &mut History,
        count: usize,
        timeout: Duration,
    ) -> Result<usize> {
        for n in 0..count {
            match self.recv_timeout(timeout) {
                Some(Ok(obs)) => history.append(obs),
                Some(Err(e)) => return Err(e),
                None if self.is_finished() => {
                    return Err(GcpError::Acquisition(format!(
                        "poller stopped after {n} observations"
                    )));
                }
                None => return Err(GcpError::Timeout),
            }
        }
        Ok(count)
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_none_or(std::thread::JoinHandle::is_finished)
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Unblock a pending send before joining.
        drop(self.rx.take());

        // The thread exits after the current acquire() returns (bounded by the
        // read timeout times max_attempts in the worst case).
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("poller thread joined successfully");
                }
                Err(e) => {
                    tracing::warn!(?e, "poller thread panicked during shutdown");
                }
            }
        }
    }
}
