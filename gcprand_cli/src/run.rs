//! Command execution: indicator selection, facade calls and output.

use gcprand_core::error::{GcpError, Result as CoreResult};
use gcprand_core::{AcquireCfg, Acquirer, GatherParams, GcpDot, History, Observation, Poller};
use gcprand_devices::{CommandIndicator, ConsoleLight, ReplayIndicator, SimulatedIndicator};
use gcprand_traits::{Indicator, RawReading, SystemClock};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Indicator picked at startup.
pub type Source = Box<dyn Indicator + Send>;

/// Replay file first, then external command, else the simulator.
pub fn select_source(
    cfg: &gcprand_config::Config,
    replay: Option<&Path>,
    exec: Option<&str>,
) -> eyre::Result<Source> {
    if let Some(path) = replay {
        let rows = gcprand_config::load_readings_csv(path)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "replaying readings");
        return Ok(Box::new(ReplayIndicator::new(
            rows.into_iter().map(|r| RawReading::new(r.position, r.scale)),
        )));
    }
    if let Some(line) = exec {
        let ind = CommandIndicator::from_command_line(line)
            .ok_or_else(|| eyre::eyre!("--exec needs a command"))?;
        tracing::info!(command = line, "reading from external command");
        return Ok(Box::new(ind));
    }
    let sim = SimulatedIndicator::new(
        cfg.simulator.seed,
        cfg.simulator.scale,
        cfg.simulator.glitch_rate,
    );
    // Test hook: force read timeouts in the simulator.
    if std::env::var_os("GCPRAND_TEST_SIM_TIMEOUT").is_some() {
        return Ok(Box::new(sim.always_timeout()));
    }
    Ok(Box::new(sim))
}

fn to_json(obs: &Observation) -> CoreResult<String> {
    serde_json::to_string(obs).map_err(|e| GcpError::Export(e.to_string()))
}

/// Print one observation as text or a JSON line.
pub fn emit(out: &mut impl Write, obs: &Observation, json: bool) -> CoreResult<()> {
    if json {
        writeln!(out, "{}", to_json(obs)?)?;
    } else {
        writeln!(
            out,
            "index={} color={} shifted={} t={:.3}",
            obs.index(),
            obs.color(),
            obs.shifted_value(),
            obs.timestamp()
        )?;
    }
    Ok(())
}

pub fn run_sample(dot: &mut GcpDot<Source, SystemClock>, json: bool) -> CoreResult<()> {
    let obs = dot.sample()?;
    emit(&mut std::io::stdout().lock(), obs, json)
}

pub fn run_random(
    dot: &mut GcpDot<Source, SystemClock>,
    from_history: Option<usize>,
    json: bool,
) -> CoreResult<()> {
    let value = match from_history {
        Some(n) => {
            for _ in 0..n {
                dot.sample()?;
            }
            dot.draw_random(false)?
        }
        None => dot.draw_random(true)?,
    };
    let mut out = std::io::stdout().lock();
    if json {
        let line = serde_json::json!({ "value": value, "history": dot.history().count() });
        writeln!(out, "{line}")?;
    } else {
        writeln!(out, "{value}")?;
    }
    Ok(())
}

pub struct GatherOpts<'a> {
    pub params: GatherParams,
    pub export: Option<&'a Path>,
    pub entropy: bool,
    pub json: bool,
}

/// Gather to stdout (plain numbers). With `--json` the flushes are skipped and
/// every observation plus a summary object is printed at the end instead.
pub fn run_gather(
    dot: &mut GcpDot<Source, SystemClock>,
    opts: &GatherOpts<'_>,
    shutdown: &AtomicBool,
) -> CoreResult<()> {
    let report = if opts.json {
        dot.gather_until(&opts.params, &mut std::io::sink(), shutdown)?
    } else {
        dot.gather_until(&opts.params, &mut std::io::stdout().lock(), shutdown)?
    };

    if let Some(path) = opts.export {
        let file = std::fs::File::create(path)?;
        dot.history().write_csv(std::io::BufWriter::new(file))?;
        tracing::info!(path = %path.display(), rows = dot.history().count(), "history exported");
    }

    if opts.json {
        let mut out = std::io::stdout().lock();
        for obs in dot.history() {
            emit(&mut out, obs, true)?;
        }
        let summary = serde_json::json!({
            "samples": report.samples,
            "flushes": report.flushes,
            "stopped_early": report.stopped_early,
            "entropy": if opts.entropy { dot.history().label_entropy() } else { None },
        });
        writeln!(out, "{summary}")?;
    } else if opts.entropy {
        print_entropy(dot.history());
    }
    Ok(())
}

/// Print label counts and entropy to stderr.
fn print_entropy(history: &History) {
    eprintln!("\n--- Color Bands ---");
    for (label, n) in history.label_counts() {
        eprintln!("{label:>7}: {n}");
    }
    match history.label_entropy() {
        Some(h) => eprintln!("Entropy (nats): {h:.4}"),
        None => eprintln!("Entropy (nats): n/a"),
    }
    eprintln!("-------------------\n");
}

pub fn run_light(
    dot: &mut GcpDot<Source, SystemClock>,
    lightness: f64,
    saturation: f64,
    json: bool,
) -> CoreResult<()> {
    let mut light = ConsoleLight::new();
    let update = dot.update_light(&mut light, lightness, saturation)?;
    let mut out = std::io::stdout().lock();
    let (r, g, b) = update.light.rgb;
    let (x, y) = update.light.xy;
    if json {
        let line = serde_json::json!({
            "index": update.observation.index(),
            "color": update.color,
            "rgb": [r, g, b],
            "xy": [x, y],
            "applied": update.applied,
        });
        writeln!(out, "{line}")?;
    } else {
        writeln!(
            out,
            "index={} color={} rgb=({r:.3}, {g:.3}, {b:.3}) xy=({x:.4}, {y:.4}) applied={}",
            update.observation.index(),
            update.color,
            update.applied
        )?;
    }
    Ok(())
}

/// Print `count` observations from a background poller, stopping early on Ctrl-C.
pub fn run_watch(
    acquirer: Acquirer<Source, SystemClock>,
    count: usize,
    period: Duration,
    shutdown: &Arc<AtomicBool>,
    json: bool,
) -> CoreResult<()> {
    let wait = receive_deadline(acquirer.cfg(), period);
    let poll = Duration::from_millis(50);
    let poller = Poller::spawn(acquirer, period);
    let mut history = History::new();
    let mut out = std::io::stdout().lock();

    while history.count() < count {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!(received = history.count(), "watch stopped");
            break;
        }
        let mut waited = Duration::ZERO;
        let next = loop {
            match poller.recv_timeout(poll) {
                Some(r) => break Some(r),
                None if poller.is_finished() || waited >= wait => break None,
                None if shutdown.load(Ordering::Relaxed) => break None,
                None => waited += poll,
            }
        };
        match next {
            Some(Ok(obs)) => {
                emit(&mut out, &obs, json)?;
                history.append(obs);
            }
            Some(Err(e)) => return Err(e),
            None if shutdown.load(Ordering::Relaxed) => continue,
            None if poller.is_finished() => {
                return Err(GcpError::Acquisition(format!(
                    "poller stopped after {} observations",
                    history.count()
                )));
            }
            None => return Err(GcpError::Timeout),
        }
    }
    Ok(())
}

/// Longest wait for one observation: every attempt at the read timeout, plus
/// the pause and some slack. Saturates instead of overflowing.
fn receive_deadline(cfg: &AcquireCfg, period: Duration) -> Duration {
    cfg.read_timeout
        .saturating_mul(cfg.max_attempts)
        .saturating_add(period)
        .saturating_add(Duration::from_millis(100))
}

pub fn run_self_check(dot: &mut GcpDot<Source, SystemClock>) -> CoreResult<()> {
    let obs = dot.sample()?;
    tracing::info!(index = obs.index(), color = %obs.color(), "self-check reading");
    println!("ok");
    Ok(())
}
