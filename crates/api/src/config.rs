//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, falling back to
//! defaults for everything but malformed values.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (optional, the in-memory
//!   store is used without it)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `BOOKING_WINDOW_DAYS`: Days of slots listed when a request names no
//!   window (default: 30)

use eyre::{Result, WrapErr, eyre};
use std::env;
use tracing::Level;

use carebook_core::services::availability::MAX_WINDOW_DAYS;

/// Configuration for the Carebook API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use carebook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}", config.server_addr());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: Option<String>,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Default number of days listed by the slot endpoint
    pub booking_window_days: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database_url: None,
            log_level: Level::INFO,
            cors_origins: None,
            request_timeout: 30,
            booking_window_days: 30,
        }
    }
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API_PORT value cannot be parsed as a u16
    /// - BOOKING_WINDOW_DAYS is not a number between 1 and 366
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        // Network settings
        let host = env::var("API_HOST").unwrap_or(defaults.host);
        let port = match env::var("API_PORT") {
            Ok(port) => port.parse().wrap_err("Invalid API_PORT value")?,
            Err(_) => defaults.port,
        };

        // Database settings
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        // Logging settings
        let log_level = match env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(defaults.request_timeout);

        // Booking settings
        let booking_window_days = match env::var("BOOKING_WINDOW_DAYS") {
            Ok(days) => parse_window_days(&days)?,
            Err(_) => defaults.booking_window_days,
        };

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            booking_window_days,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_window_days(value: &str) -> Result<u32> {
    let days: u32 = value
        .trim()
        .parse()
        .wrap_err("Invalid BOOKING_WINDOW_DAYS value")?;
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(eyre!(
            "BOOKING_WINDOW_DAYS must be between 1 and {}, got {}",
            MAX_WINDOW_DAYS,
            days
        ));
    }
    Ok(days)
}
