//! Command line arguments

use std::path::PathBuf;
use std::time::Duration;

use poise_core::{PoiseError, PoiseResult};
use poise_runtime::{parse_duration, LogFormat, SessionConfig};

pub const USAGE: &str = "\
Usage: poise-replay [OPTIONS] [RECORDING.jsonl]

Replays a JSON-lines landmark recording (one frame per line) through an
analysis session, prints the cycle table and writes the export document.

Options:
  --synthetic <FRAMES>   Generate FRAMES synthetic frames at 30 fps instead of reading a file
  --seed <N>             Seed for the synthetic generator
  --window <DURATION>    Frame window length (default 10s)
  --interval <DURATION>  Summary period (default 10s)
  --log-format <FORMAT>  pretty or json (default pretty)
  --out <DIR>            Export directory (default .)
  --live                 Pace frames in real time and let the scheduler drive cycles
  -h, --help             Print this help";

/// Where frames come from
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Recording(PathBuf),
    Synthetic { frames: usize, seed: Option<u64> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub source: Source,
    pub window: Duration,
    pub interval: Duration,
    pub log_format: LogFormat,
    pub out: PathBuf,
    pub live: bool,
}

impl Args {
    /// Parse arguments (without the program name); `None` means help was asked for
    pub fn parse(args: impl IntoIterator<Item = String>) -> PoiseResult<Option<Self>> {
        let defaults = SessionConfig::default();
        let mut recording = None;
        let mut synthetic = None;
        let mut seed = None;
        let mut window = defaults.window;
        let mut interval = defaults.summary_interval;
        let mut log_format = LogFormat::default();
        let mut out = PathBuf::from(".");
        let mut live = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--synthetic" => {
                    let value = value_of(&arg, args.next())?;
                    synthetic = Some(value.parse::<usize>().map_err(|e| {
                        PoiseError::InvalidConfig(format!("--synthetic {value:?}: {e}"))
                    })?);
                }
                "--seed" => {
                    let value = value_of(&arg, args.next())?;
                    seed = Some(value.parse::<u64>().map_err(|e| {
                        PoiseError::InvalidConfig(format!("--seed {value:?}: {e}"))
                    })?);
                }
                "--window" => window = parse_duration(&value_of(&arg, args.next())?)?,
                "--interval" => interval = parse_duration(&value_of(&arg, args.next())?)?,
                "--log-format" => log_format = value_of(&arg, args.next())?.parse()?,
                "--out" => out = PathBuf::from(value_of(&arg, args.next())?),
                "--live" => live = true,
                flag if flag.starts_with('-') => {
                    return Err(PoiseError::InvalidConfig(format!("unknown option {flag}")));
                }
                path => {
                    if recording.replace(PathBuf::from(path)).is_some() {
                        return Err(PoiseError::InvalidConfig(
                            "only one recording may be given".to_string(),
                        ));
                    }
                }
            }
        }

        let source = match (recording, synthetic) {
            (Some(path), None) => Source::Recording(path),
            (None, Some(frames)) => Source::Synthetic { frames, seed },
            (None, None) => {
                return Err(PoiseError::InvalidConfig(
                    "give a recording or --synthetic <FRAMES>".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(PoiseError::InvalidConfig(
                    "a recording and --synthetic are mutually exclusive".to_string(),
                ))
            }
        };

        Ok(Some(Args {
            source,
            window,
            interval,
            log_format,
            out,
            live,
        }))
    }

    /// Session configuration for these arguments
    pub fn session_config(&self) -> PoiseResult<SessionConfig> {
        let config = SessionConfig::default()
            .with_window(self.window)
            .with_summary_interval(self.interval);
        config.validate()?;
        Ok(config)
    }
}

fn value_of(flag: &str, value: Option<String>) -> PoiseResult<String> {
    value.ok_or_else(|| PoiseError::InvalidConfig(format!("{flag} needs a value")))
}
