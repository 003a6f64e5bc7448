use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::banner::DEFAULT_BANNER_TIMEOUT;

pub const ENDPOINT_ENV: &str = "CONTACT_FORM_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub endpoint: Option<String>,
    pub owner_name: Option<String>,
    pub banner_timeout_secs: Option<u64>,
    #[serde(default)]
    pub extra_fields: BTreeMap<String, String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Missing file means defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid config at {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Pick the endpoint: command line, then environment, then config file.
    pub fn resolve_endpoint(&self, cli: Option<&str>, env: Option<&str>) -> Result<String> {
        cli.or(env)
            .or(self.endpoint.as_deref())
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "No form endpoint configured. Pass --endpoint, set {} or add \"endpoint\" to {}",
                    ENDPOINT_ENV,
                    Self::get_config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "the config file".to_string())
                )
            })
    }

    pub fn banner_timeout(&self) -> Duration {
        self.banner_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_BANNER_TIMEOUT)
    }

    pub fn owner_name(&self) -> &str {
        self.owner_name.as_deref().unwrap_or("Contact")
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("contact-form").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.endpoint.is_none());
        assert_eq!(config.banner_timeout(), Duration::from_secs(5));
        assert_eq!(config.owner_name(), "Contact");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::new();
        config.endpoint = Some("https://formspree.io/f/abc".to_string());
        config.banner_timeout_secs = Some(3);
        config.extra_fields.insert("_subject".to_string(), "Hello".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.endpoint.as_deref(), Some("https://formspree.io/f/abc"));
        assert_eq!(loaded.banner_timeout(), Duration::from_secs(3));
        assert_eq!(loaded.extra_fields.get("_subject").map(String::as_str), Some("Hello"));
    }

    #[test]
    fn test_partial_file_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"owner_name":"Job Montenegro"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.owner_name(), "Job Montenegro");
        assert!(config.extra_fields.is_empty());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_endpoint_precedence() {
        let mut config = Config::new();
        config.endpoint = Some("https://file".to_string());

        assert_eq!(config.resolve_endpoint(Some("https://cli"), Some("https://env")).unwrap(), "https://cli");
        assert_eq!(config.resolve_endpoint(None, Some("https://env")).unwrap(), "https://env");
        assert_eq!(config.resolve_endpoint(None, None).unwrap(), "https://file");

        assert!(Config::new().resolve_endpoint(None, None).is_err());
        assert!(Config::new().resolve_endpoint(Some("  "), None).is_err());
    }
}
