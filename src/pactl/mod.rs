mod parse;
mod record;

#[cfg(test)]
pub(crate) mod fake;

use std::{
    path::PathBuf,
    process::{Command, ExitStatus},
};

use log::debug;
use thiserror::Error;

use parse::parse_mute_reply;
pub use parse::parse_enumeration;
pub use record::SinkRecord;

#[derive(Error, Debug)]
pub enum PactlError {
    #[error("failed to run `pactl {args}`: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`pactl {args}` exited with {status}: {stderr}")]
    Failed {
        args: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("unexpected output from `pactl {args}`: {output:?}")]
    UnexpectedOutput { args: String, output: String },
}

/// The operations the widget needs from the audio server.
pub trait AudioServer {
    /// Name of the sink currently receiving audio system-wide.
    fn default_sink_name(&self) -> Result<String, PactlError>;
    /// Full text listing of every sink and its properties.
    fn list_sinks(&self) -> Result<String, PactlError>;
    fn set_sink_volume(&self, sink: &str, percent: u8) -> Result<(), PactlError>;
    fn sink_mute(&self, sink: &str) -> Result<bool, PactlError>;
    fn set_sink_mute(&self, sink: &str, mute: bool) -> Result<(), PactlError>;
}

/// [`AudioServer`] backed by the `pactl` command line utility.
#[derive(Debug, Clone)]
pub struct Pactl {
    program: PathBuf,
}

impl Pactl {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `pactl` to completion and returns its stdout.
    fn run(&self, args: &[&str]) -> Result<String, PactlError> {
        let output = Command::new(&self.program)
            .args(args)
            // Output prefixes are translated otherwise
            .env("LC_ALL", "C")
            .output()
            .map_err(|source| PactlError::Spawn {
                args: args.join(" "),
                source,
            })?;
        if !output.status.success() {
            return Err(PactlError::Failed {
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl AudioServer for Pactl {
    fn default_sink_name(&self) -> Result<String, PactlError> {
        Ok(self.run(&["get-default-sink"])?.trim().to_owned())
    }

    fn list_sinks(&self) -> Result<String, PactlError> {
        self.run(&["list", "sinks"])
    }

    fn set_sink_volume(&self, sink: &str, percent: u8) -> Result<(), PactlError> {
        debug!("Setting volume of {sink} to {percent}%");
        self.run(&["set-sink-volume", sink, &format!("{percent}%")])
            .map(|_| ())
    }

    fn sink_mute(&self, sink: &str) -> Result<bool, PactlError> {
        let output = self.run(&["get-sink-mute", sink])?;
        parse_mute_reply(&output).ok_or_else(|| PactlError::UnexpectedOutput {
            args: format!("get-sink-mute {sink}"),
            output,
        })
    }

    fn set_sink_mute(&self, sink: &str, mute: bool) -> Result<(), PactlError> {
        debug!("Setting mute of {sink} to {mute}");
        self.run(&["set-sink-mute", sink, if mute { "true" } else { "false" }])
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_spawn_error() {
        let pactl = Pactl::new("/nonexistent/voltray-test/pactl");
        let err = pactl.list_sinks().unwrap_err();
        assert!(matches!(err, PactlError::Spawn { ref args, .. } if args == "list sinks"));
    }

    #[test]
    fn failing_program_reports_status() {
        // `false` accepts and ignores any arguments
        let pactl = Pactl::new("false");
        let err = pactl.set_sink_mute("sink", true).unwrap_err();
        assert!(matches!(err, PactlError::Failed { .. }));
    }
}
