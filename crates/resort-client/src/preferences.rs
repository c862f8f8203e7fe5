//! # Display Preferences
//!
//! Currency, language and exchange rate chosen by the guest. Each lives
//! under its own key as a plain string (`"LBP"`, `"ar"`, `"89500"`).
//! Missing or unreadable values fall back to the configured defaults.

use tracing::warn;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::storage::{keys, KeyValueStore};
use resort_core::{Currency, DisplaySettings, ExchangeRate, Locale};

/// Persisted display preferences.
#[derive(Debug)]
pub struct Preferences<S> {
    store: S,
    defaults: DisplaySettings,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S, defaults: DisplaySettings) -> Self {
        Preferences { store, defaults }
    }

    /// Preferences whose fallbacks come from the client config.
    pub fn from_config(store: S, config: &ClientConfig) -> Self {
        Preferences::new(store, config.display_defaults())
    }

    fn read<T>(&self, key: &str, parse: impl FnOnce(&str) -> Option<T>) -> Option<T> {
        match self.store.get(key) {
            Ok(Some(raw)) => {
                let parsed = parse(raw.trim());
                if parsed.is_none() {
                    warn!(key, value = %raw, "Ignoring unreadable preference");
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "Could not read preference");
                None
            }
        }
    }

    pub fn currency(&self) -> Currency {
        self.read(keys::CURRENCY, |s| s.parse().ok())
            .unwrap_or(self.defaults.currency)
    }

    pub fn set_currency(&self, currency: Currency) -> ClientResult<()> {
        self.store.set(keys::CURRENCY, currency.code())?;
        Ok(())
    }

    pub fn locale(&self) -> Locale {
        self.read(keys::LANGUAGE, |s| s.parse().ok())
            .unwrap_or(self.defaults.locale)
    }

    pub fn set_locale(&self, locale: Locale) -> ClientResult<()> {
        self.store.set(keys::LANGUAGE, locale.code())?;
        Ok(())
    }

    /// Stored rate, or the default. A stored zero counts as unreadable.
    pub fn exchange_rate(&self) -> ExchangeRate {
        self.read(keys::EXCHANGE_RATE, |s| {
            s.parse::<u32>().ok().and_then(ExchangeRate::new)
        })
        .unwrap_or(self.defaults.exchange_rate)
    }

    pub fn set_exchange_rate(&self, rate: ExchangeRate) -> ClientResult<()> {
        self.store
            .set(keys::EXCHANGE_RATE, &rate.get().to_string())?;
        Ok(())
    }

    /// Formatter configuration from the current preferences.
    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            currency: self.currency(),
            locale: self.locale(),
            exchange_rate: self.exchange_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use resort_core::Money;

    fn prefs(store: MemoryStore) -> Preferences<MemoryStore> {
        Preferences::new(store, DisplaySettings::default())
    }

    #[test]
    fn test_defaults_when_nothing_stored() {
        let p = prefs(MemoryStore::new());
        assert_eq!(p.currency(), Currency::Usd);
        assert_eq!(p.locale(), Locale::En);
        assert_eq!(p.exchange_rate(), ExchangeRate::default());
    }

    #[test]
    fn test_round_trip_through_store() {
        let store = MemoryStore::new();
        let p = prefs(store.clone());
        p.set_currency(Currency::Lbp).unwrap();
        p.set_locale(Locale::Ar).unwrap();
        p.set_exchange_rate(ExchangeRate::new(90_000).unwrap())
            .unwrap();

        assert_eq!(store.get(keys::CURRENCY).unwrap().as_deref(), Some("LBP"));

        let reloaded = prefs(store);
        let settings = reloaded.display_settings();
        assert_eq!(settings.currency, Currency::Lbp);
        assert_eq!(settings.locale, Locale::Ar);
        assert_eq!(settings.exchange_rate.get(), 90_000);
    }

    #[test]
    fn test_garbage_values_fall_back() {
        let store = MemoryStore::new();
        store.set(keys::CURRENCY, "EUR").unwrap();
        store.set(keys::LANGUAGE, "klingon").unwrap();
        store.set(keys::EXCHANGE_RATE, "0").unwrap();

        let p = prefs(store);
        assert_eq!(p.currency(), Currency::Usd);
        assert_eq!(p.locale(), Locale::En);
        assert_eq!(p.exchange_rate().get(), 89_500);
    }

    #[test]
    fn test_display_settings_drive_formatter() {
        let store = MemoryStore::new();
        let p = prefs(store);
        p.set_currency(Currency::Lbp).unwrap();
        p.set_exchange_rate(ExchangeRate::new(90_000).unwrap())
            .unwrap();

        let shown = p
            .display_settings()
            .format(Money::from_minor(600), Currency::Usd);
        assert_eq!(shown, "540,000 L.L.");
    }
}
