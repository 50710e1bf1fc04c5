use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.cbr-xml-daily.ru";

/// How many days to walk back over unpublished dates before giving up.
/// Long holiday runs are under two weeks; a month is comfortably past any
/// real archive gap.
const DEFAULT_MAX_LOOKBACK_DAYS: u32 = 30;

fn default_max_lookback_days() -> u32 {
    DEFAULT_MAX_LOOKBACK_DAYS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CbrProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub cbr: Option<CbrProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            cbr: Some(CbrProviderConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_max_lookback_days")]
    pub max_lookback_days: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            max_lookback_days: DEFAULT_MAX_LOOKBACK_DAYS,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to the
    /// built-in defaults when no file exists there.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "kurs")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn base_url(&self) -> &str {
        self.providers
            .cbr
            .as_ref()
            .map_or(DEFAULT_BASE_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  cbr:
    base_url: "http://example.com/cbr"
max_lookback_days: 7
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_url(), "http://example.com/cbr");
        assert_eq!(config.max_lookback_days, 7);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.max_lookback_days, DEFAULT_MAX_LOOKBACK_DAYS);

        let yaml_str = r#"
providers:
  cbr:
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    }
}
