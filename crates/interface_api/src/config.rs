//! API configuration

use serde::Deserialize;

use core_kernel::CoreError;
use domain_ledger::LedgerConfig;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Log level
    pub log_level: String,
    /// Log format
    pub log_format: LogFormat,
    /// Ledger parameters
    pub ledger: LedgerConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            ledger: LedgerConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `config/ledger.toml` (if present) and the environment
    ///
    /// Environment variables use the `API__` prefix and `__` between
    /// nesting levels, e.g. `API__LEDGER__CLAIMS__MAX_COVERAGE`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config/ledger")
    }

    /// Loads configuration from the given file stem and the environment
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("API")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Validates the ledger section
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.jwt_secret.is_empty() {
            return Err(CoreError::configuration("jwt_secret must not be empty"));
        }
        self.ledger.validate()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
