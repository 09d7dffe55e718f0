//! Configuration loading.
//!
//! Reads `config.toml` (see [`crate::paths::LexforgePaths`]) and applies
//! environment overrides. A missing file means defaults.

use crate::paths::LexforgePaths;
use lexforge_core::config::LexforgeConfig;
use lexforge_core::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides `[api] base_url`.
pub const API_URL_ENV: &str = "LEXFORGE_API_URL";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service reading the platform config file.
    pub fn from_default_location() -> Result<Self> {
        Ok(Self::new(LexforgePaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file, then applies the process environment.
    pub fn load(&self) -> Result<LexforgeConfig> {
        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file(&self) -> Result<LexforgeConfig> {
        if !self.path.exists() {
            tracing::debug!("No config at {}, using defaults", self.path.display());
            return Ok(LexforgeConfig::default());
        }
        let content = fs::read_to_string(&self.path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", self.path.display());
        Ok(config)
    }

    /// Writes `config` back, creating the directory if needed.
    pub fn save(&self, config: &LexforgeConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(config)?)?;
        Ok(())
    }
}

/// Applies environment overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut LexforgeConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
        tracing::debug!("{} overrides the API base URL", API_URL_ENV);
        config.api.base_url = url.trim().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexforge_core::config::DEFAULT_API_BASE_URL;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new(dir.path().join("config.toml"));
        let config = service.load_file().unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::new(dir.path().join("nested").join("config.toml"));
        let mut config = LexforgeConfig::default();
        config.api.request_timeout_secs = 30;
        config.storage.dir = Some(dir.path().join("store"));
        service.save(&config).unwrap();

        assert_eq!(service.load_file().unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = 1").unwrap();
        assert!(ConfigService::new(path).load_file().is_err());
    }

    #[test]
    fn test_env_override() {
        let mut config = LexforgeConfig::default();
        apply_env_overrides(&mut config, |key| {
            (key == API_URL_ENV).then(|| " https://lexforge.fr/api ".to_string())
        });
        assert_eq!(config.api.base_url, "https://lexforge.fr/api");

        let mut untouched = LexforgeConfig::default();
        apply_env_overrides(&mut untouched, |_| Some(String::new()));
        assert_eq!(untouched.api.base_url, DEFAULT_API_BASE_URL);
    }
}
