//! Indicator backed by an external program.
//!
//! The program (for example a headless-browser script that inspects the
//! chart) is run once per read and must print the marker position and the
//! chart extent as two numbers, separated by whitespace or a comma, on stdout.
//! The read timeout is enforced by polling the child; on expiry it is killed.

use crate::error::{DeviceError, Result};
use crate::util::wait_while_with_timeout;
use gcprand_traits::{Indicator, RawReading};
use std::process::{Command, Stdio};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CommandIndicator {
    program: String,
    args: Vec<String>,
    poll_interval: Duration,
}

impl CommandIndicator {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            poll_interval: Duration::from_millis(5),
        }
    }

    /// Split a command line on whitespace; `None` when it is blank.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    fn run(&self, timeout: Duration) -> Result<RawReading> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let waited = wait_while_with_timeout(
            || matches!(child.try_wait(), Ok(None)),
            timeout,
            self.poll_interval,
        );
        let elapsed = match waited {
            Ok(elapsed) => elapsed,
            Err(e) => {
                if let Err(kill_err) = child.kill() {
                    tracing::warn!(error = %kill_err, "failed to kill timed-out indicator command");
                }
                let _ = child.wait();
                return Err(e);
            }
        };
        tracing::trace!(program = %self.program, elapsed_ms = elapsed.as_millis() as u64, "indicator command exited");

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeviceError::Command(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        parse_reading(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `"<position> <scale>"` (whitespace or comma separated, optional `px`).
pub fn parse_reading(text: &str) -> Result<RawReading> {
    let fields: Vec<&str> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    let [position, scale] = fields.as_slice() else {
        return Err(DeviceError::Parse(text.trim().to_string()));
    };
    let num = |s: &str| -> Result<f64> {
        s.trim_end_matches("px")
            .parse::<f64>()
            .map_err(|_| DeviceError::Parse(text.trim().to_string()))
    };
    Ok(RawReading::new(num(*position)?, num(*scale)?))
}

impl Indicator for CommandIndicator {
    fn read(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<RawReading, Box<dyn std::error::Error + Send + Sync>> {
        let reading = self.run(timeout)?;
        tracing::debug!(
            program = %self.program,
            position = reading.position,
            scale = reading.scale,
            "command reading"
        );
        Ok(reading)
    }
}
