use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const CONFIG_DIR: &str = "config";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_MAX_FORECAST_DAYS: u32 = 3650;
const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;
const DEFAULT_SEASONAL_PERIOD: usize = 7;

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// CORS: comma-separated list of allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback when no origins are configured
    #[serde(default)]
    pub cors_allow_any_origin: bool,

    /// CORS: allow credentials
    #[serde(default = "default_true_bool")]
    pub cors_allow_credentials: bool,

    /// Upper bound accepted for `forecast_days` in a predict request
    #[validate(range(min = 1, max = 3650))]
    #[serde(default = "default_max_forecast_days")]
    pub max_forecast_days: u32,

    /// Confidence level used for the forecast uncertainty bands
    #[validate(custom = "validate_confidence_level")]
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    /// Seasonal cycle length in observations (7 = weekly cycle on daily data)
    #[validate(range(min = 1, max = 366))]
    #[serde(default = "default_seasonal_period")]
    pub seasonal_period: usize,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_cors_origins() -> Option<String> {
    Some(DEFAULT_CORS_ORIGINS.to_string())
}
fn default_true_bool() -> bool {
    true
}
fn default_max_forecast_days() -> u32 {
    DEFAULT_MAX_FORECAST_DAYS
}
fn default_confidence_level() -> f64 {
    DEFAULT_CONFIDENCE_LEVEL
}
fn default_seasonal_period() -> usize {
    DEFAULT_SEASONAL_PERIOD
}

fn validate_confidence_level(level: f64) -> Result<(), ValidationError> {
    if level <= 0.0 || level >= 1.0 {
        return Err(ValidationError::new("confidence_level_out_of_range"));
    }
    Ok(())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            log_json: false,
            cors_allowed_origins: default_cors_origins(),
            cors_allow_any_origin: false,
            cors_allow_credentials: true,
            max_forecast_days: default_max_forecast_days(),
            confidence_level: default_confidence_level(),
            seasonal_period: default_seasonal_period(),
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
            || self.environment.eq_ignore_ascii_case("dev")
    }

    /// Permissive CORS is only ever acceptable in development or when the
    /// operator opted in explicitly.
    pub fn should_allow_permissive_cors(&self) -> bool {
        self.cors_allow_any_origin || self.is_development()
    }
}

/// Errors produced while loading or validating the configuration
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Load configuration from `config/` files and `APP__*` environment
/// variables, layered over built-in defaults.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    // Support both RUN_ENV and APP_ENV for selecting config profile
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("host", DEFAULT_HOST)?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("cors_allowed_origins", DEFAULT_CORS_ORIGINS)?
        .set_default("max_forecast_days", DEFAULT_MAX_FORECAST_DAYS as i64)?
        .set_default("confidence_level", DEFAULT_CONFIDENCE_LEVEL)?
        .set_default("seasonal_period", DEFAULT_SEASONAL_PERIOD as i64)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}

/// Initialize the global tracing subscriber.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("forecast_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);
    let filter = EnvFilter::new(filter_directive);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes_validation() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.max_forecast_days, 3650);
        assert!(cfg.cors_allow_credentials);
    }

    #[test]
    fn confidence_level_must_be_a_proper_fraction() {
        let mut cfg = AppConfig::default();
        cfg.confidence_level = 1.0;
        assert!(cfg.validate().is_err());
        cfg.confidence_level = 0.0;
        assert!(cfg.validate().is_err());
        cfg.confidence_level = 0.8;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn development_environment_allows_permissive_cors() {
        let mut cfg = AppConfig::default();
        cfg.environment = "development".to_string();
        assert!(cfg.should_allow_permissive_cors());
        cfg.environment = "production".to_string();
        assert!(!cfg.should_allow_permissive_cors());
        cfg.cors_allow_any_origin = true;
        assert!(cfg.should_allow_permissive_cors());
    }
}
