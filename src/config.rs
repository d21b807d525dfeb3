use rust_decimal::Decimal;
use serde::Deserialize;

use crate::account::AccountNumber;

/// Environment variable naming the settings file.
pub const CONFIG_PATH_ENV: &str = "ATM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/atm.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub log: LogSettings,
    /// Accounts opened at startup. Existing accounts are never reset.
    #[serde(default = "default_seed_accounts")]
    pub seed_accounts: Vec<SeedAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive, overridden by `RUST_LOG` when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedAccount {
    pub account_number: AccountNumber,
    pub balance: Decimal,
}

impl SeedAccount {
    fn demo(account_number: &'static str, balance: Decimal) -> Self {
        Self {
            account_number: AccountNumber::from_static(account_number),
            balance,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_seed_accounts() -> Vec<SeedAccount> {
    vec![
        SeedAccount::demo("12345", Decimal::new(100000, 2)),
        SeedAccount::demo("67890", Decimal::new(500000, 2)),
    ]
}

/// Loads settings from the file named by `ATM_CONFIG` (or
/// [`DEFAULT_CONFIG_PATH`]), then `ATM__*` environment variables.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_from(&path)
}

/// Both sources are optional; a missing file yields the built-in defaults.
pub fn load_from(path: &str) -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("ATM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
