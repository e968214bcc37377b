//! Human-readable error descriptions and structured JSON error formatting.

use gcprand_core::GcpError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(ge) = err.downcast_ref::<GcpError>() {
        return match ge {
            GcpError::Timeout => "What happened: Indicator read timed out.\nLikely causes: Page or chart did not load, slow network, or read timeout too low.\nHow to fix: Check the indicator source and consider raising acquisition.read_timeout_ms in the config.".to_string(),
            GcpError::AcquisitionExhausted { attempts } => format!(
                "What happened: No in-scale reading after {attempts} attempts.\nLikely causes: The indicator keeps reporting a position above the chart, or the scale is wrong.\nHow to fix: Check the indicator source; raise acquisition.max_attempts if glitches are frequent."
            ),
            GcpError::Acquisition(msg) => format!(
                "What happened: Indicator read failed ({msg}).\nLikely causes: Replay file ran out, external command failed, or its output was not \"<position> <scale>\".\nHow to fix: Check --replay / --exec and re-run with --log-level=debug."
            ),
            GcpError::EmptyHistory => "What happened: No observations were recorded.\nLikely causes: Nothing was sampled before drawing from history.\nHow to fix: Sample first, or use --from-history N with N >= 1.".to_string(),
            GcpError::Config(msg) => format!(
                "What happened: Invalid parameters ({msg}).\nLikely causes: Out-of-range CLI flags or config values.\nHow to fix: Fix the values and rerun."
            ),
            GcpError::Export(msg) => format!(
                "What happened: Writing output failed ({msg}).\nLikely causes: Unwritable export path or closed stdout.\nHow to fix: Check the --export path and permissions."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("readings csv must have headers") {
        return "Invalid headers in readings CSV. Expected 'position,scale'.".to_string();
    }

    if lower.contains("parse config") || lower.contains("must be") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: Out-of-range or mistyped values in the TOML.\nHow to fix: Edit the config file and try again."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Short stable name of the error kind for JSON output.
pub fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<GcpError>() {
        Some(GcpError::EmptyHistory) => "EmptyHistory",
        Some(GcpError::Acquisition(_)) => "Acquisition",
        Some(GcpError::Timeout) => "Timeout",
        Some(GcpError::AcquisitionExhausted { .. }) => "AcquisitionExhausted",
        Some(GcpError::Config(_)) => "Config",
        Some(GcpError::Export(_)) => "Export",
        None => "Error",
    }
}

/// Stable exit codes: 2 exhausted, 3 timeout, 4 acquisition failure, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<GcpError>() {
        Some(GcpError::AcquisitionExhausted { .. }) => 2,
        Some(GcpError::Timeout) => 3,
        Some(GcpError::Acquisition(_)) => 4,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = reason_name(err);
    match err.downcast_ref::<GcpError>() {
        Some(GcpError::AcquisitionExhausted { attempts }) => json!({
            "reason": reason,
            "details": { "attempts": attempts },
            "message": humanize(err),
        })
        .to_string(),
        _ => json!({ "reason": reason, "message": humanize(err) }).to_string(),
    }
}
