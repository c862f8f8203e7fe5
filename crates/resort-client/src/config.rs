//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     RESORT_STORAGE_DIR, RESORT_CURRENCY, RESORT_LOCALE,                │
//! │     RESORT_EXCHANGE_RATE, RESORT_OFFLINE_CACHE_HOURS                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/resort-menu/client.toml (Linux)                          │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     USD, en, 89500, 24 hours                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! storage_dir = "/var/lib/resort-kiosk"
//! offline_cache_hours = 12
//!
//! [display]
//! currency = "LBP"
//! locale = "ar"
//! exchange_rate = 89500
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use resort_core::{Currency, DisplaySettings, ExchangeRate, Locale};

/// Default display preferences for a fresh device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayDefaults {
    #[serde(default)]
    pub currency: Currency,

    #[serde(default)]
    pub locale: Locale,

    /// Weak units per strong unit. Zero is rejected when the file is read.
    #[serde(default)]
    pub exchange_rate: ExchangeRate,
}

/// Guest-device configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Directory for [`crate::FileStore`].
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Offline menu freshness window in hours.
    #[serde(default = "default_offline_cache_hours")]
    pub offline_cache_hours: i64,

    #[serde(default)]
    pub display: DisplayDefaults,
}

fn default_storage_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "resort", "menu")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./resort-data"))
}

fn default_offline_cache_hours() -> i64 {
    crate::offline::DEFAULT_MAX_AGE_HOURS
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            storage_dir: default_storage_dir(),
            offline_cache_hours: default_offline_cache_hours(),
            display: DisplayDefaults::default(),
        }
    }
}

impl ClientConfig {
    /// Loads defaults, then the TOML file, then environment overrides,
    /// then validates.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| ClientError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.offline_cache_hours <= 0 {
            return Err(ClientError::InvalidConfig(
                "offline_cache_hours must be greater than 0".into(),
            ));
        }

        if self.storage_dir.as_os_str().is_empty() {
            return Err(ClientError::InvalidConfig("storage_dir is empty".into()));
        }

        Ok(())
    }

    /// Applies `RESORT_*` overrides. Unparseable values are logged and
    /// ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("RESORT_STORAGE_DIR") {
            debug!(dir = %dir, "Overriding storage dir from environment");
            self.storage_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("RESORT_CURRENCY") {
            match raw.parse() {
                Ok(currency) => self.display.currency = currency,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring RESORT_CURRENCY"),
            }
        }

        if let Some(raw) = lookup("RESORT_LOCALE") {
            match raw.parse() {
                Ok(locale) => self.display.locale = locale,
                Err(e) => warn!(value = %raw, error = %e, "Ignoring RESORT_LOCALE"),
            }
        }

        if let Some(raw) = lookup("RESORT_EXCHANGE_RATE") {
            match raw.trim().parse::<u32>().ok().and_then(ExchangeRate::new) {
                Some(rate) => self.display.exchange_rate = rate,
                None => warn!(value = %raw, "Ignoring RESORT_EXCHANGE_RATE"),
            }
        }

        if let Some(raw) = lookup("RESORT_OFFLINE_CACHE_HOURS") {
            match raw.trim().parse() {
                Ok(hours) => self.offline_cache_hours = hours,
                Err(_) => warn!(value = %raw, "Ignoring RESORT_OFFLINE_CACHE_HOURS"),
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "resort", "menu")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    /// Fallback display settings for [`crate::Preferences`].
    pub fn display_defaults(&self) -> DisplaySettings {
        DisplaySettings {
            currency: self.display.currency,
            locale: self.display.locale,
            exchange_rate: self.display.exchange_rate,
        }
    }

    pub fn offline_max_age(&self) -> chrono::Duration {
        chrono::Duration::hours(self.offline_cache_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.offline_cache_hours, 24);
        assert_eq!(config.display.currency, Currency::Usd);
        assert_eq!(config.display.exchange_rate.get(), 89_500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_file_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(
            &path,
            r#"
            storage_dir = "/tmp/kiosk"
            offline_cache_hours = 12

            [display]
            currency = "LBP"
            locale = "ar"
            exchange_rate = 90000
            "#,
        )
        .unwrap();

        let config = ClientConfig::load(Some(path)).unwrap();
        assert_eq!(config.offline_cache_hours, 12);
        assert_eq!(config.display.currency, Currency::Lbp);
        assert_eq!(config.display.locale, Locale::Ar);
        assert_eq!(config.display_defaults().exchange_rate.get(), 90_000);
    }

    #[test]
    fn test_zero_rate_in_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "[display]\nexchange_rate = 0\n").unwrap();

        assert!(ClientConfig::load(Some(path.clone())).is_err());
        assert_eq!(
            ClientConfig::load_or_default(Some(path)).display.exchange_rate,
            ExchangeRate::default()
        );
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("RESORT_CURRENCY", "lbp"),
            ("RESORT_LOCALE", "xx"),
            ("RESORT_EXCHANGE_RATE", "0"),
            ("RESORT_OFFLINE_CACHE_HOURS", "6"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.display.currency, Currency::Lbp);
        assert_eq!(config.display.locale, Locale::En);
        assert_eq!(config.display.exchange_rate.get(), 89_500);
        assert_eq!(config.offline_max_age(), chrono::Duration::hours(6));
    }

    #[test]
    fn test_invalid_window_fails_validation() {
        let config = ClientConfig {
            offline_cache_hours: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("client.toml");

        let mut config = ClientConfig::default();
        config.display.locale = Locale::Fr;
        config.save(Some(path.clone())).unwrap();

        let loaded = ClientConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.display.locale, Locale::Fr);
    }
}
