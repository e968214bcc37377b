//! `From` implementations bridging `gcprand_config` types to `gcprand_core` types.

use crate::acquirer::AcquireCfg;
use crate::facade::GatherParams;
use std::time::Duration;

impl From<&gcprand_config::AcquisitionCfg> for AcquireCfg {
    fn from(c: &gcprand_config::AcquisitionCfg) -> Self {
        Self {
            max_attempts: c.max_attempts,
            read_timeout: Duration::from_millis(c.read_timeout_ms),
        }
    }
}

impl From<&gcprand_config::GatherCfg> for GatherParams {
    fn from(c: &gcprand_config::GatherCfg) -> Self {
        Self {
            limit: c.limit,
            flush_every: c.flush_every,
            delay: Duration::from_millis(c.delay_ms),
        }
    }
}
