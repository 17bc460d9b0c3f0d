use std::path::PathBuf;

use clap::Args;
use piggywaker_core::{run_scenario, Config, Scenario};

#[derive(Args)]
pub struct SimulateArgs {
    /// Built-in scenario
    #[arg(long, default_value = "nap", conflicts_with = "scenario")]
    preset: String,

    /// Scenario file (TOML)
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the sample rate
    #[arg(long)]
    rate_hz: Option<u32>,
}

pub fn run(args: SimulateArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::preset(&args.preset)
            .ok_or_else(|| format!("unknown preset: {} (expected nap or restless)", args.preset))?,
    };
    if args.seed.is_some() {
        scenario.seed = args.seed;
    }
    if args.rate_hz.is_some() {
        scenario.rate_hz = args.rate_hz;
    }

    let report = run_scenario(&scenario, config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
