use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use clap::Args;
use piggywaker_core::host::read_inputs;
use piggywaker_core::{
    AlertActuator, Config, HostInput, SampleSource, StillnessDetector, WakeGuard,
};
use serde::Serialize;

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON-lines input; reads stdin when omitted
    file: Option<PathBuf>,

    /// Also print the reading of every consumed sample
    #[arg(long)]
    readings: bool,

    /// Print a final state snapshot
    #[arg(long)]
    snapshot: bool,
}

/// Stands in for the accelerometer subscription; replayed samples arrive
/// regardless, and the guard filters them by this state.
struct ReplaySource;

impl SampleSource for ReplaySource {
    fn enable(&mut self) {
        tracing::debug!("replay source enabled");
    }

    fn disable(&mut self) {
        tracing::debug!("replay source disabled");
    }
}

/// Reports buzzes on stderr instead of vibrating.
struct StderrBuzzer;

impl AlertActuator for StderrBuzzer {
    fn buzz(&mut self, pulse_ms: u64) {
        eprintln!("bzzz ({pulse_ms} ms)");
    }
}

#[derive(Serialize)]
struct ReadingLine {
    #[serde(rename = "type")]
    kind: &'static str,
    at_ms: u64,
    magnitude: f64,
    alert_fired: bool,
}

pub fn run(args: ReplayArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let reader: Box<dyn BufRead> = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut guard = WakeGuard::new(
        StillnessDetector::new(config.detector),
        ReplaySource,
        StderrBuzzer,
    )
    .with_pulse_ms(config.alert.pulse_ms);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut last_ms = 0;

    for input in read_inputs(reader) {
        let input = input?;
        let at_ms = input_time(&input).unwrap_or(last_ms);
        last_ms = at_ms;

        let outcome = guard.apply(input);
        if args.readings {
            if let Some(reading) = outcome.reading {
                let line = ReadingLine {
                    kind: "Reading",
                    at_ms,
                    magnitude: reading.magnitude,
                    alert_fired: reading.alert_fired,
                };
                writeln!(out, "{}", serde_json::to_string(&line)?)?;
            }
        }
        if let Some(event) = outcome.event {
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        }
    }

    if args.snapshot {
        let snapshot = guard.detector().snapshot(last_ms);
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    }
    Ok(())
}

fn input_time(input: &HostInput) -> Option<u64> {
    match input {
        HostInput::Sample(sample) => Some(sample.at_ms),
        HostInput::Start { at_ms }
        | HostInput::Resume { at_ms }
        | HostInput::Gesture { at_ms, .. } => Some(*at_ms),
        _ => None,
    }
}
