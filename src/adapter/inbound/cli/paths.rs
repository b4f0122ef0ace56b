//! Path utilities for sharpline.
//!
//! All data lives under `~/.sharpline/`:
//! - `~/.sharpline/config.toml` - main configuration
//! - `~/.sharpline/sharpline.db` - odds and alerts database

use std::path::PathBuf;

/// Returns the sharpline home directory (`~/.sharpline/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sharpline")
}

/// Returns the default config file path (`~/.sharpline/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default database path (`~/.sharpline/sharpline.db`).
pub fn default_database() -> PathBuf {
    home_dir().join("sharpline.db")
}

/// Ensures the sharpline home directory exists.
pub fn ensure_home_dir() -> std::io::Result<()> {
    std::fs::create_dir_all(home_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_sharpline_home() {
        assert!(home_dir().to_string_lossy().contains(".sharpline"));
        assert!(default_config().ends_with("config.toml"));
        assert!(default_database().ends_with("sharpline.db"));
    }
}
