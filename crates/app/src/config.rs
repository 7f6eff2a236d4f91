//! Application configuration.
//!
//! Loaded from the TOML file named by `STOREFRONT_CONFIG` (defaults when unset),
//! then overridden by individual environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use storefront_observability::LogFormat;

pub const CONFIG_PATH_VAR: &str = "STOREFRONT_CONFIG";
pub const CATALOG_VAR: &str = "STOREFRONT_CATALOG";
pub const CHECKOUT_DELAY_VAR: &str = "STOREFRONT_CHECKOUT_DELAY_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// TOML catalog file. The built-in catalog is used when absent.
    pub catalog_path: Option<PathBuf>,
    /// Simulated order processing time.
    pub checkout_delay_ms: u64,
    pub currency_symbol: String,
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            checkout_delay_ms: 2000,
            currency_symbol: "$".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl StorefrontConfig {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(path) = lookup(CATALOG_VAR).filter(|p| !p.trim().is_empty()) {
            self.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup(CHECKOUT_DELAY_VAR) {
            self.checkout_delay_ms =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: CHECKOUT_DELAY_VAR,
                        value: raw.clone(),
                    })?;
        }

        Ok(())
    }

    pub fn checkout_delay(&self) -> Duration {
        Duration::from_millis(self.checkout_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = StorefrontConfig::load_with(env(&[])).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.checkout_delay(), Duration::from_secs(2));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = StorefrontConfig::from_toml_str(
            r#"
currency_symbol = "€"
log_format = "pretty"
"#,
        )
        .unwrap();
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.checkout_delay_ms, 2000);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn environment_overrides_file_values() {
        let config = StorefrontConfig::load_with(env(&[
            (CATALOG_VAR, "/srv/catalog.toml"),
            (CHECKOUT_DELAY_VAR, " 150 "),
        ]))
        .unwrap();
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/catalog.toml")));
        assert_eq!(config.checkout_delay(), Duration::from_millis(150));
    }

    #[test]
    fn rejects_bad_values() {
        let err = StorefrontConfig::load_with(env(&[(CHECKOUT_DELAY_VAR, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == CHECKOUT_DELAY_VAR));

        assert!(matches!(
            StorefrontConfig::from_toml_str("log_format = \"xml\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            StorefrontConfig::load_with(env(&[(CONFIG_PATH_VAR, "/nope/storefront.toml")])),
            Err(ConfigError::Io { .. })
        ));
    }
}
