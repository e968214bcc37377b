//! Test and helper mocks for gcprand_core

use gcprand_traits::{Indicator, RawReading};
use std::collections::VecDeque;

/// An indicator that plays back a fixed list of outcomes, then errors.
///
/// `Ok` entries are returned as readings, `Err` entries as indicator errors
/// carrying the given message. Also counts how many reads were made.
#[derive(Debug, Default)]
pub struct ScriptedIndicator {
    script: VecDeque<Result<RawReading, String>>,
    reads: usize,
}

impl ScriptedIndicator {
    pub fn new(script: impl IntoIterator<Item = Result<RawReading, String>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            reads: 0,
        }
    }

    /// Play back `(position, scale)` pairs.
    pub fn readings(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::new(pairs.into_iter().map(|(p, s)| Ok(RawReading::new(p, s))))
    }

    pub fn reads(&self) -> usize {
        self.reads
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Indicator for ScriptedIndicator {
    fn read(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<RawReading, Box<dyn std::error::Error + Send + Sync>> {
        self.reads += 1;
        match self.script.pop_front() {
            Some(Ok(r)) => Ok(r),
            Some(Err(msg)) => Err(msg.into()),
            None => Err("script exhausted".into()),
        }
    }
}
