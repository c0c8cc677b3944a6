//! Application configuration loaded from environment variables and config files.
//!
//! Supports `.env` files for development and environment variables for production.
//! Config precedence: env vars > .env file > config.toml > defaults

use serde::Deserialize;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Get the global application configuration.
///
/// # Panics
/// Panics if config has not been initialized via [`init`].
pub fn get() -> &'static AppConfig {
    CONFIG.get().expect("Config not initialized. Call ams_common::config::init() first.")
}

/// Initialize the global configuration from environment.
///
/// Should be called once at application startup, before any other code accesses config.
pub fn init() -> Result<&'static AppConfig, config::ConfigError> {
    let app_config = load()?;
    Ok(CONFIG.get_or_init(|| app_config))
}

/// Build a configuration without touching the global slot.
pub fn load() -> Result<AppConfig, config::ConfigError> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let cfg = config::Config::builder()
        // Defaults
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("backend.base_url", "http://localhost:8080")?
        .set_default("backend.timeout_secs", 30)?
        .set_default("limits.max_roles", 250)?
        .set_default("limits.max_role_name_length", 100)?
        // Optional config file
        .add_source(config::File::with_name("config").required(false))
        // Environment variables (AMS_SERVER__PORT, AMS_BACKEND__BASE_URL, etc.)
        .add_source(
            config::Environment::with_prefix("AMS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    cfg.try_deserialize()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// When set, every `/api/role` request must send `Authorization: Bearer <api_token>`.
    pub api_token: Option<String>,
}

/// Where the console finds the REST backend.
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    /// Backend origin, e.g. `https://ams.example.com`. Role routes live under `/api/role`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Bearer token sent with every request, if set.
    pub token: Option<String>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
            token: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    pub max_roles: u32,
    pub max_role_name_length: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_roles: 250,
            max_role_name_length: 100,
        }
    }
}
