//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the clinic API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `BOOKING_MIN_DURATION_MINUTES`: Shortest bookable slot (default: 15)
//! - `BOOKING_OPENING_HOUR` / `BOOKING_CLOSING_HOUR`: Business hours (default: 8 / 18)
//! - `BOOKING_MIN_LEAD_TIME_MINUTES`: Minimum notice before a slot (default: 60)
//! - `BOOKING_LOCK_TIMEOUT_SECONDS`: Wait limit for a doctor's schedule lock (default: 5,
//!   at most half of the request timeout)

use clinic_core::booking::BookingPolicy;
use eyre::{Result, WrapErr, eyre};
use std::{env, str::FromStr, time::Duration};
use tracing::Level;

/// Configuration for the clinic API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use clinic_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
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
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Thresholds applied by the booking rules
    pub booking_policy: BookingPolicy,

    /// How long a booking waits for another booking of the same doctor.
    /// Must stay at most half of `request_timeout` so a booking that got the
    /// lock still has time to commit before the request is cut off.
    pub lock_timeout: Duration,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - A BOOKING_* value is not a number or the resulting policy is inconsistent
    /// - BOOKING_LOCK_TIMEOUT_SECONDS exceeds half of API_REQUEST_TIMEOUT_SECONDS
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;

        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let lookup = |key: &str| env::var(key).ok();
        let booking_policy = booking_policy_from(lookup)?;
        let lock_timeout = Duration::from_secs(parse_or(lookup, "BOOKING_LOCK_TIMEOUT_SECONDS", 5)?);
        check_timeouts(lock_timeout, request_timeout)?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            booking_policy,
            lock_timeout,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn parse_log_level(value: &str) -> Level {
    match value {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Builds the booking policy from `BOOKING_*` keys, falling back to the defaults.
pub fn booking_policy_from<F>(lookup: F) -> Result<BookingPolicy>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = BookingPolicy::default();
    let policy = BookingPolicy {
        min_duration_minutes: parse_or(
            &lookup,
            "BOOKING_MIN_DURATION_MINUTES",
            defaults.min_duration_minutes,
        )?,
        opening_hour: parse_or(&lookup, "BOOKING_OPENING_HOUR", defaults.opening_hour)?,
        closing_hour: parse_or(&lookup, "BOOKING_CLOSING_HOUR", defaults.closing_hour)?,
        min_lead_time_minutes: parse_or(
            &lookup,
            "BOOKING_MIN_LEAD_TIME_MINUTES",
            defaults.min_lead_time_minutes,
        )?,
    };

    policy
        .validate()
        .map_err(|e| eyre!("Invalid booking policy: {}", e))?;
    Ok(policy)
}

/// Rejects a lock wait that could consume most of the request budget.
pub fn check_timeouts(lock_timeout: Duration, request_timeout_secs: u64) -> Result<()> {
    let request_timeout = Duration::from_secs(request_timeout_secs);
    if lock_timeout.saturating_mul(2) > request_timeout {
        return Err(eyre!(
            "BOOKING_LOCK_TIMEOUT_SECONDS ({}s) must be at most half of API_REQUEST_TIMEOUT_SECONDS ({}s)",
            lock_timeout.as_secs(),
            request_timeout_secs
        ));
    }
    Ok(())
}

fn parse_or<F, T>(lookup: F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {} value", key)),
        None => Ok(default),
    }
}
