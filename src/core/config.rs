use crate::providers::tcmb::DEFAULT_BASE_URL;
use crate::providers::util::DEFAULT_LOOKBACK_ATTEMPTS;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_lookback_attempts() -> usize {
    DEFAULT_LOOKBACK_ATTEMPTS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TcmbProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub tcmb: Option<TcmbProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            tcmb: Some(TcmbProviderConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Days to walk back when a historical bulletin is missing.
    #[serde(default = "default_lookback_attempts")]
    pub lookback_attempts: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            lookback_attempts: DEFAULT_LOOKBACK_ATTEMPTS,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
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
        let proj_dirs = ProjectDirs::from("tr", "faizdoviz", "faizdoviz")
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

    pub fn tcmb_base_url(&self) -> &str {
        self.providers
            .tcmb
            .as_ref()
            .map_or(DEFAULT_BASE_URL, |p| &p.base_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  tcmb:
    base_url: "http://example.com/tcmb"
request_timeout_secs: 3
lookback_attempts: 5
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.tcmb_base_url(), "http://example.com/tcmb");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.lookback_attempts, 5);
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.tcmb_base_url(), "https://www.tcmb.gov.tr");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.lookback_attempts, 10);

        let without_tcmb: AppConfig =
            serde_yaml::from_str("providers:\n  tcmb: null\n").expect("Failed to deserialize");
        assert_eq!(without_tcmb.tcmb_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/faizdoviz.yaml");
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
