//! Default paths for bookwarden components
//!
//! The configuration file lives under the user's config directory:
//! - `$BOOKWARDEN_CONFIG` if set
//! - `$XDG_CONFIG_HOME/bookwarden/config.toml`
//! - `~/.config/bookwarden/config.toml`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const BOOKWARDEN_CONFIG_ENV: &str = "BOOKWARDEN_CONFIG";

/// Environment variable for overriding the HTTP bind address
pub const BOOKWARDEN_BIND_ENV: &str = "BOOKWARDEN_BIND";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Application subdirectory name
const APP_DIR: &str = "bookwarden";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$BOOKWARDEN_CONFIG` environment variable (if set)
/// 2. `$XDG_CONFIG_HOME/bookwarden/config.toml` (if XDG_CONFIG_HOME is set)
/// 3. `~/.config/bookwarden/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(BOOKWARDEN_CONFIG_ENV) {
        return PathBuf::from(path);
    }

    config_path_without_env()
}

/// Get the config path without checking BOOKWARDEN_CONFIG.
/// Used where the env var is resolved separately (e.g. by clap).
pub fn config_path_without_env() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // Last resort
    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}
