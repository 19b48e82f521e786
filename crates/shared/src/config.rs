//! Application configuration management.

use serde::Deserialize;

use crate::types::{Currency, MAX_DECIMAL_SCALE};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger posting configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger posting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    /// Functional currency of the books.
    #[serde(default)]
    pub currency: Currency,
    /// Number of fractional digits every posted amount must fit, at most
    /// [`MAX_DECIMAL_SCALE`].
    #[serde(default = "default_decimal_scale")]
    pub decimal_scale: u32,
}

fn default_decimal_scale() -> u32 {
    2
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            decimal_scale: default_decimal_scale(),
        }
    }
}

impl LedgerConfig {
    /// Checks the settings against what the journal tables can store.
    ///
    /// # Errors
    ///
    /// Returns an error if `decimal_scale` exceeds [`MAX_DECIMAL_SCALE`].
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.decimal_scale > MAX_DECIMAL_SCALE {
            return Err(config::ConfigError::Message(format!(
                "ledger.decimal_scale {} exceeds the maximum of {MAX_DECIMAL_SCALE}",
                self.decimal_scale
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones: `config/default`,
    /// `config/{RUN_MODE}`, then `SEASHORE__*` environment variables
    /// (e.g. `SEASHORE__DATABASE__URL`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the ledger
    /// settings are out of range.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SEASHORE").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.ledger.validate()?;
        Ok(config)
    }
}
