//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "gcprand", version, about = "Chart indicator sampler and digit-shift randomness")]
pub struct Cli {
    /// Path to config TOML (typed); a missing file means defaults
    #[arg(long, value_name = "FILE", default_value = "gcprand.toml")]
    pub config: PathBuf,

    /// Replay readings from a CSV (header: position,scale) instead of the simulator
    #[arg(long, value_name = "FILE", conflicts_with = "exec")]
    pub replay: Option<PathBuf>,

    /// Run this command per reading; it must print "<position> <scale>"
    #[arg(long, value_name = "CMDLINE")]
    pub exec: Option<String>,

    /// Print observations and errors as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Take one observation and print it
    Sample,
    /// Print one shifted value
    Random {
        /// Take N samples first, then draw a stored value at random
        #[arg(long, value_name = "N")]
        from_history: Option<usize>,
    },
    /// Sample repeatedly, printing all shifted values every few samples
    Gather {
        /// Number of samples (overrides gather.limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Flush after this many samples (overrides gather.flush_every)
        #[arg(long, value_name = "N")]
        flush_every: Option<usize>,
        /// Pause between samples in ms (overrides gather.delay_ms)
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,
        /// Write the full history to this CSV when done
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
        /// Print per-color counts and label entropy to stderr
        #[arg(long, action = ArgAction::SetTrue)]
        entropy: bool,
    },
    /// Take one observation and show it on the (simulated) light
    Light {
        /// HLS lightness in [0, 1] (overrides light.lightness)
        #[arg(long)]
        lightness: Option<f64>,
        /// HLS saturation in [0, 1] (overrides light.saturation)
        #[arg(long)]
        saturation: Option<f64>,
    },
    /// Acquire on a background thread and print observations as they arrive
    Watch {
        /// Number of observations to print
        #[arg(long)]
        count: usize,
        /// Pause between acquisitions in ms (defaults to gather.delay_ms)
        #[arg(long, value_name = "MS")]
        period_ms: Option<u64>,
    },
    /// Load config, take one reading and report ok
    SelfCheck,
}
