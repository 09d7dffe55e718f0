//! Unified path management for LexForge files.
//!
//! Paths are resolved via AppPaths from the version-migrate crate so every
//! platform gets its conventional locations.
//!
//! ```text
//! ~/.config/lexforge/            # Config directory
//! └── config.toml                # Application configuration
//!
//! ~/.local/share/lexforge/       # Data directory
//! └── local_storage.json         # Persistent key-value store
//! ```

use std::path::PathBuf;
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for lexforge_core::LexforgeError {
    fn from(err: PathError) -> Self {
        lexforge_core::LexforgeError::config(err.to_string())
    }
}

pub struct LexforgePaths;

impl LexforgePaths {
    fn app_paths() -> AppPaths {
        AppPaths::new("lexforge")
    }

    /// e.g. `~/.config/lexforge/`
    pub fn config_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .config_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    /// e.g. `~/.local/share/lexforge/`
    pub fn data_dir() -> Result<PathBuf, PathError> {
        Self::app_paths()
            .data_dir()
            .map_err(|_| PathError::HomeDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory of the persistent store when the config does not set one.
    pub fn default_storage_dir() -> Result<PathBuf, PathError> {
        Self::data_dir()
    }
}
