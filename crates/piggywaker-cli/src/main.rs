use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use piggywaker_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "piggywaker", version, about = "PiggyWaker stillness guard CLI")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "PIGGYWAKER_CONFIG")]
    config: Option<PathBuf>,

    /// Override a config value, e.g. --set detector.stillness_ms=8000
    #[arg(long = "set", global = true, value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded host stream (JSON lines) through the detector
    Replay(commands::replay::ReplayArgs),
    /// Run a synthetic scenario
    Simulate(commands::simulate::SimulateArgs),
    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    config.apply_overrides(cli.overrides.iter().map(String::as_str))?;
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Replay(args) => commands::replay::run(args, &config),
        Commands::Simulate(args) => commands::simulate::run(args, &config),
        Commands::Config { action } => commands::config::run(action, &config),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
