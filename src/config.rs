use async_trait::async_trait;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

use crate::{
    auth::{CredentialProvider, ErpNextCredentials},
    errors::ServiceError,
    nodes::ItemErrorPolicy,
};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STOCK_LOOKUP_CONCURRENCY: usize = 1;

/// Application configuration structure with validation
#[derive(Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base URL of the ERPNext site
    #[validate(url)]
    pub erpnext_domain: String,

    #[validate(length(min = 1, message = "API key is required"))]
    pub api_key: String,

    #[validate(length(min = 1, message = "API secret is required"))]
    pub api_secret: String,

    /// Upper bound for every ERPNext request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,

    /// Stock lookups allowed in flight during one availability check
    #[serde(default = "default_stock_lookup_concurrency")]
    #[validate(range(min = 1, max = 32))]
    pub stock_lookup_concurrency: usize,

    /// Batch behavior when an item fails
    #[serde(default)]
    pub item_error_policy: ItemErrorPolicy,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,
}

impl AppConfig {
    /// Configuration for `erpnext_domain` with every other setting at its default
    pub fn new(
        erpnext_domain: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            erpnext_domain: erpnext_domain.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            request_timeout_secs: default_request_timeout_secs(),
            stock_lookup_concurrency: default_stock_lookup_concurrency(),
            item_error_policy: ItemErrorPolicy::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn erpnext_credentials(&self) -> ErpNextCredentials {
        ErpNextCredentials::new(&self.erpnext_domain, &self.api_key, &self.api_secret)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("erpnext_domain", &self.erpnext_domain)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("stock_lookup_concurrency", &self.stock_lookup_concurrency)
            .field("item_error_policy", &self.item_error_policy)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .finish()
    }
}

#[async_trait]
impl CredentialProvider for AppConfig {
    async fn credentials(&self) -> Result<ErpNextCredentials, ServiceError> {
        let credentials = self.erpnext_credentials();
        credentials.validate()?;
        Ok(credentials)
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
fn default_stock_lookup_concurrency() -> usize {
    DEFAULT_STOCK_LOOKUP_CONCURRENCY
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::fmt;

    let default_directive = format!("erpnext_material_flow={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

fn profile_path(config_dir: &Path, profile: &str) -> String {
    config_dir.join(profile).to_string_lossy().into_owned()
}

/// Loads application configuration from the `config` directory
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    load_config_from(CONFIG_DIR)
}

/// Same as [`load_config`], reading files from `config_dir`
pub fn load_config_from(config_dir: impl AsRef<Path>) -> Result<AppConfig, AppConfigError> {
    let config_dir = config_dir.as_ref();
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let config = Config::builder()
        .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
        .set_default("stock_lookup_concurrency", DEFAULT_STOCK_LOOKUP_CONCURRENCY as u64)?
        .set_default("item_error_policy", "abort")?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&profile_path(config_dir, "default")).required(false))
        .add_source(File::with_name(&profile_path(config_dir, &run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    // Check for the site before deserialization to provide a clear error message
    if config.get_string("erpnext_domain").is_err() {
        error!("ERPNext domain is not configured. Set APP__ERPNEXT_DOMAIN or erpnext_domain in config/default.toml.");
        return Err(AppConfigError::Load(ConfigError::NotFound(
            "erpnext_domain is required but not configured".into(),
        )));
    }

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
