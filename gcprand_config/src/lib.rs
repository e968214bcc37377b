#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and reading-file parsing for the indicator sampler.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//!   Every section is optional; an empty file yields the defaults.
//! - The readings CSV loader enforces its header and parses raw
//!   `(position, scale)` pairs for replay.
use serde::Deserialize;

/// Readings CSV schema.
///
/// Expected headers:
/// position,scale
///
/// Example:
/// position,scale
/// 45.0,450.0
/// 512.0,450.0
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ReadingRow {
    pub position: f64,
    pub scale: f64,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AcquisitionCfg {
    /// Readings requested per observation before giving up on out-of-scale data
    pub max_attempts: u32,
    /// Timeout for a single indicator read (ms)
    pub read_timeout_ms: u64,
}

impl Default for AcquisitionCfg {
    fn default() -> Self {
        Self {
            max_attempts: 32,
            read_timeout_ms: 5_000,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatherCfg {
    pub limit: usize,
    /// Print the accumulated shifted values after this many samples
    pub flush_every: usize,
    /// Pause between samples (ms). Also accepts alias "sleep_ms".
    #[serde(alias = "sleep_ms")]
    pub delay_ms: u64,
}

impl Default for GatherCfg {
    fn default() -> Self {
        Self {
            limit: 420,
            flush_every: 5,
            delay_ms: 3_000,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightCfg {
    pub lightness: f64,
    pub saturation: f64,
}

impl Default for LightCfg {
    fn default() -> Self {
        Self {
            lightness: 0.4,
            saturation: 0.4,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulatorCfg {
    /// Fixed seed for reproducible runs; entropy-seeded when absent
    pub seed: Option<u64>,
    /// Chart extent reported with every reading
    pub scale: f64,
    /// Probability in [0, 1) that a reading lands above the scale
    pub glitch_rate: f64,
}

impl Default for SimulatorCfg {
    fn default() -> Self {
        Self {
            seed: None,
            scale: 450.0,
            glitch_rate: 0.1,
        }
    }
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub acquisition: AcquisitionCfg,
    pub gather: GatherCfg,
    pub light: LightCfg,
    pub simulator: SimulatorCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

pub fn load_readings_csv(path: &std::path::Path) -> eyre::Result<Vec<ReadingRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open readings CSV {:?}: {}", path, e))?;

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["position", "scale"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "readings CSV must have headers 'position,scale', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<ReadingRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    if rows.is_empty() {
        eyre::bail!("readings CSV {:?} has no rows", path);
    }
    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Acquisition
        if self.acquisition.max_attempts == 0 {
            eyre::bail!("acquisition.max_attempts must be >= 1");
        }
        if self.acquisition.read_timeout_ms == 0 {
            eyre::bail!("acquisition.read_timeout_ms must be >= 1");
        }

        // Gather
        if self.gather.limit == 0 {
            eyre::bail!("gather.limit must be >= 1");
        }
        if self.gather.flush_every == 0 {
            eyre::bail!("gather.flush_every must be >= 1");
        }
        if self.gather.delay_ms > 24 * 60 * 60 * 1000 {
            eyre::bail!("gather.delay_ms is unreasonably large (>24h)");
        }

        // Light
        if !(0.0..=1.0).contains(&self.light.lightness) {
            eyre::bail!("light.lightness must be in [0.0, 1.0]");
        }
        if !(0.0..=1.0).contains(&self.light.saturation) {
            eyre::bail!("light.saturation must be in [0.0, 1.0]");
        }

        // Simulator
        if !(self.simulator.scale.is_finite() && self.simulator.scale > 0.0) {
            eyre::bail!("simulator.scale must be a finite value > 0");
        }
        if !(0.0..1.0).contains(&self.simulator.glitch_rate) {
            eyre::bail!("simulator.glitch_rate must be in [0.0, 1.0)");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        Ok(())
    }
}
