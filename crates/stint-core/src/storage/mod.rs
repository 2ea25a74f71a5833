mod config;
pub mod database;
pub mod lockout;

pub use config::Config;
pub use database::Database;
pub use lockout::{LockoutRecord, LockoutStore, SqliteLockoutStore};

use std::path::PathBuf;

/// Returns `~/.config/stint[-dev]/` based on STINT_ENV.
///
/// Set STINT_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STINT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("stint-dev")
    } else {
        base_dir.join("stint")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
