mod preferences;

pub use preferences::{FilePreferences, MemoryPreferences, Preferences};

use std::path::PathBuf;

use crate::error::PreferencesError;

/// Returns `~/.config/bonbasses[-dev]/` based on BONBASSES_ENV.
///
/// Set BONBASSES_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, PreferencesError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("BONBASSES_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("bonbasses-dev")
    } else {
        base_dir.join("bonbasses")
    };

    std::fs::create_dir_all(&dir).map_err(|source| PreferencesError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
