//! Menu API configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable                  | Default         |
//! |---------------------------|-----------------|
//! | `MENU_API_BIND`           | `0.0.0.0`       |
//! | `MENU_API_PORT`           | `8080`          |
//! | `DATABASE_PATH`           | `./resort.db`   |
//! | `MENU_TAX_RATE_BPS`       | `0`             |
//! | `MENU_ORDER_CURRENCY`     | `USD`           |
//! | `MENU_EXCHANGE_RATE`      | `89500`         |
//! | `MENU_DB_MAX_CONNECTIONS` | `5`             |
//!
//! Orders settle in `MENU_ORDER_CURRENCY`. Lines priced in the other
//! currency are converted at `MENU_EXCHANGE_RATE` (whole LBP per USD).

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use resort_core::validation::validate_tax_rate_bps;
use resort_core::{Currency, ExchangeRate, OrderPricing, TaxRate};

/// Menu API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to listen on
    pub bind_address: IpAddr,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Tax applied to order subtotals
    pub tax_rate: TaxRate,

    /// Currency every order is totalled in
    pub order_currency: Currency,

    /// Rate for converting menu prices into the order currency
    pub exchange_rate: ExchangeRate,

    /// Upper bound for the SQLite pool
    pub db_max_connections: u32,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let tax_bps: u32 = var("MENU_TAX_RATE_BPS", "0")
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("MENU_TAX_RATE_BPS".to_string()))?;
        validate_tax_rate_bps(tax_bps)
            .map_err(|_| ConfigError::InvalidValue("MENU_TAX_RATE_BPS".to_string()))?;

        let config = ApiConfig {
            bind_address: var("MENU_API_BIND", "0.0.0.0")
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MENU_API_BIND".to_string()))?,

            port: var("MENU_API_PORT", "8080")
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MENU_API_PORT".to_string()))?,

            database_path: PathBuf::from(var("DATABASE_PATH", "./resort.db")),

            tax_rate: TaxRate::from_bps(tax_bps),

            order_currency: var("MENU_ORDER_CURRENCY", "USD")
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MENU_ORDER_CURRENCY".to_string()))?,

            exchange_rate: var("MENU_EXCHANGE_RATE", "89500")
                .trim()
                .parse()
                .ok()
                .and_then(ExchangeRate::new)
                .ok_or_else(|| ConfigError::InvalidValue("MENU_EXCHANGE_RATE".to_string()))?,

            db_max_connections: var("MENU_DB_MAX_CONNECTIONS", "5")
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MENU_DB_MAX_CONNECTIONS".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "MENU_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        if config.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("DATABASE_PATH".to_string()));
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    /// How `POST /api/orders` prices submissions.
    pub fn order_pricing(&self) -> OrderPricing {
        OrderPricing::new(self.tax_rate)
            .with_currency(self.order_currency)
            .with_exchange_rate(self.exchange_rate)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
