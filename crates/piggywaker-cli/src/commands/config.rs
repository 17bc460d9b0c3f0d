use clap::Subcommand;
use piggywaker_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Get a config value
    Get {
        /// Config key (e.g. "detector.stillness_ms", "alert.pulse_ms")
        key: String,
    },
    /// Validate the configuration and report the result
    Check,
}

pub fn run(action: ConfigAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            print!("{}", config.to_toml_string()?);
        }
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key}").into()),
        },
        ConfigAction::Check => {
            config.validate()?;
            println!("ok");
        }
    }
    Ok(())
}
