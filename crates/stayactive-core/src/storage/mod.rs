mod config;

pub use config::{AutoPauseConfig, Config, TimingConfig, WorkConfig};

use std::path::PathBuf;

/// Returns `~/.config/stayactive[-dev]/` based on STAYACTIVE_ENV.
///
/// Set STAYACTIVE_ENV=dev to use the development config directory. The
/// directory is only read from, so it is not created here.
pub fn data_dir() -> PathBuf {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STAYACTIVE_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("stayactive-dev")
    } else {
        base_dir.join("stayactive")
    }
}
