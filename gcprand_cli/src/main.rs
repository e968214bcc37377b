//! `gcprand` binary: config loading, logging setup and command dispatch.

mod cli;
mod error_fmt;
mod run;

use clap::Parser;
use cli::{Cli, Commands, FILE_GUARD, JSON_MODE};
use eyre::{Result, WrapErr};
use gcprand_config::{Config, Logging};
use gcprand_core::{AcquireCfg, Acquirer, GatherParams, GcpDot};
use gcprand_traits::SystemClock;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn main() {
    if let Err(e) = color_eyre::install() {
        eprintln!("failed to install error reporter: {e}");
    }
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        // Usage errors share code 1; 2 is reserved for exhausted acquisition.
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = try_main(cli) {
        let code = error_fmt::exit_code_for_error(&err);
        tracing::error!(error = %err, code, "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", error_fmt::format_error_json(&err));
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        std::process::exit(code);
    }
}

fn try_main(cli: Cli) -> Result<()> {
    let cfg = load_config(&cli.config)?;
    let level = cli
        .log_level
        .as_deref()
        .or(cfg.logging.level.as_deref())
        .unwrap_or("info");
    init_tracing(level, cli.json, &cfg.logging)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        }
    }

    let source = run::select_source(&cfg, cli.replay.as_deref(), cli.exec.as_deref())?;
    let acquire_cfg = AcquireCfg::from(&cfg.acquisition);
    let acquirer = Acquirer::new(source, SystemClock::new(), acquire_cfg)?;

    let json = cli.json;
    match cli.cmd {
        Commands::Sample => run::run_sample(&mut GcpDot::from_acquirer(acquirer), json)?,
        Commands::Random { from_history } => {
            run::run_random(&mut GcpDot::from_acquirer(acquirer), from_history, json)?;
        }
        Commands::Gather {
            limit,
            flush_every,
            delay_ms,
            export,
            entropy,
        } => {
            let mut params = GatherParams::from(&cfg.gather);
            if let Some(n) = limit {
                params.limit = n;
            }
            if let Some(n) = flush_every {
                params.flush_every = n;
            }
            if let Some(ms) = delay_ms {
                params.delay = Duration::from_millis(ms);
            }
            let opts = run::GatherOpts {
                params,
                export: export.as_deref(),
                entropy,
                json,
            };
            run::run_gather(&mut GcpDot::from_acquirer(acquirer), &opts, &shutdown)?;
        }
        Commands::Light {
            lightness,
            saturation,
        } => run::run_light(
            &mut GcpDot::from_acquirer(acquirer),
            lightness.unwrap_or(cfg.light.lightness),
            saturation.unwrap_or(cfg.light.saturation),
            json,
        )?,
        Commands::Watch { count, period_ms } => {
            let period = Duration::from_millis(period_ms.unwrap_or(cfg.gather.delay_ms));
            run::run_watch(acquirer, count, period, &shutdown, json)?;
        }
        Commands::SelfCheck => run::run_self_check(&mut GcpDot::from_acquirer(acquirer))?,
    }
    Ok(())
}

/// Read and validate the config; a missing file yields the defaults.
fn load_config(path: &Path) -> Result<Config> {
    let cfg = match std::fs::read_to_string(path) {
        Ok(text) => gcprand_config::load_toml(&text)
            .wrap_err_with(|| format!("parse config {}", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(e) => return Err(e).wrap_err_with(|| format!("read config {}", path.display())),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Console logs go to stderr (pretty or JSON); `[logging].file` adds a JSON-lines file.
fn init_tracing(level: &str, json: bool, logging: &Logging) -> Result<()> {
    use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level {level:?}"))?,
    };

    let (pretty, structured) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (
            Some(fmt::layer().with_target(false).with_writer(std::io::stderr)),
            None,
        )
    };

    let file_layer = match logging.file.as_deref() {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre::eyre!("logging.file has no file name: {file:?}"))?;
            let appender = match logging.rotation.as_deref() {
                Some("daily") => tracing_appender::rolling::daily(dir, name),
                Some("hourly") => tracing_appender::rolling::hourly(dir, name),
                _ => tracing_appender::rolling::never(dir, name),
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    Registry::default()
        .with(filter)
        .with(pretty)
        .with(structured)
        .with(file_layer)
        .try_init()
        .map_err(|e| eyre::eyre!("init tracing: {e}"))
}
