//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Company details printed on exported quotations.
    #[serde(default)]
    pub company: CompanyConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
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

/// JWT settings as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Shared HS256 secret of the identity provider issuing tokens.
    pub secret: String,
    /// Lifetime in seconds for tokens minted by the seeder.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    28800 // 8 hours
}

/// Company details used in the spreadsheet header.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    /// Company name.
    #[serde(default = "default_company_name")]
    pub name: String,
    /// Postal address line.
    #[serde(default = "default_company_address")]
    pub address: String,
    /// Contact phone.
    #[serde(default = "default_company_phone")]
    pub phone: String,
    /// Contact email.
    #[serde(default = "default_company_email")]
    pub email: String,
    /// Currency label appended to money cells.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Offset from UTC, in minutes, used for printed dates.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl Default for CompanyConfig {
    fn default() -> Self {
        Self {
            name: default_company_name(),
            address: default_company_address(),
            phone: default_company_phone(),
            email: default_company_email(),
            currency: default_currency(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

fn default_company_name() -> String {
    "Crystal Line Glass & Aluminum".to_string()
}

fn default_company_address() -> String {
    "Dubai, UAE".to_string()
}

fn default_company_phone() -> String {
    "+971-XX-XXXXXXX".to_string()
}

fn default_company_email() -> String {
    "info@crystalline.ae".to_string()
}

fn default_currency() -> String {
    "AED".to_string()
}

fn default_utc_offset_minutes() -> i32 {
    240 // Gulf Standard Time
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("QUOTEDESK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
