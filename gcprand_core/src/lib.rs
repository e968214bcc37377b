#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Indicator sampling pipeline (device-agnostic).
//!
//! All reading sources go through `gcprand_traits::Indicator`, all outputs
//! through `gcprand_traits::LightSink`.
//!
//! ## Architecture
//!
//! - **Classification**: index to color band (`classify`)
//! - **Derivation**: digit-shifted pseudo-random fraction (`derive`)
//! - **Acquisition**: validate, resample, normalize, stamp (`acquirer`, `observation`)
//! - **History**: append-only store with CSPRNG draws (`history`)
//! - **Facade**: sample / draw / gather / light (`facade`)
//! - **Polling**: optional background acquisition thread (`poller`)

pub mod acquirer;
pub mod classify;
pub mod conversions;
pub mod derive;
pub mod error;
pub mod facade;
pub mod history;
pub mod indicator_error;
pub mod light;
pub mod mocks;
pub mod observation;
pub mod poller;

pub use acquirer::{AcquireCfg, Acquirer};
pub use classify::{ColorLabel, classify};
pub use derive::derive;
pub use error::{GcpError, Result};
pub use facade::{GatherParams, GatherReport, GcpDot, LightUpdate};
pub use history::History;
pub use observation::{Observation, RangeFault, ReadingVerdict, normalize, validate};
pub use poller::Poller;
