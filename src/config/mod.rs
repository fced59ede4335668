use crate::core::{AppError, CurrencyCode, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub reports: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Tunables for the reporting engine
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Currency code used when an entity carries none of its own
    pub default_currency: CurrencyCode,
    /// Default look-ahead window for upcoming repayments, in days
    pub upcoming_window_days: u32,
    /// Per-process request budget for the report routes
    pub rate_limit_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            reports: ReportConfig {
                default_currency: env::var("DEFAULT_CURRENCY")
                    .unwrap_or_else(|_| "KES".to_string())
                    .parse()
                    .map_err(AppError::Configuration)?,
                upcoming_window_days: env::var("UPCOMING_WINDOW_DAYS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid UPCOMING_WINDOW_DAYS".to_string())
                    })?,
                rate_limit_per_minute: env::var("RATE_LIMIT_PER_MINUTE")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid RATE_LIMIT_PER_MINUTE".to_string())
                    })?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.reports.upcoming_window_days == 0 {
            return Err(AppError::Configuration(
                "Upcoming window must be greater than 0 days".to_string(),
            ));
        }

        if self.reports.rate_limit_per_minute == 0 {
            return Err(AppError::Configuration(
                "Rate limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
