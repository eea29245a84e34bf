use clap::Subcommand;
use std::path::PathBuf;

use stayactive_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "work.start", "timing.update_ms")
        key: String,
        /// Config file (defaults to ~/.config/stayactive/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List all config values
    List {
        /// Config file (defaults to ~/.config/stayactive/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default config file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key, config } => {
            let config = Config::load(config.as_deref())?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::List { config } => {
            let config = Config::load(config.as_deref())?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Path => {
            println!("{}", Config::default_path().display());
        }
    }
    Ok(())
}
