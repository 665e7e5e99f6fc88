mod config;

pub use config::{AlertConfig, ApiConfig, Config, LocaleConfig, WizardConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the config directory, creating it if needed.
///
/// `ALMAIA_CONFIG_DIR` wins when set. Otherwise `~/.config/almaia[-dev]/`
/// based on `ALMAIA_ENV`; set `ALMAIA_ENV=dev` to use the development
/// directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ALMAIA_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("ALMAIA_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("almaia-dev")
            } else {
                base_dir.join("almaia")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
