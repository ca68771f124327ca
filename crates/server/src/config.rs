//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TADKA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `RESTAURANT_LAT` / `RESTAURANT_LNG` - restaurant origin coordinates
//! - `GOOGLE_MAPS_API_KEY` - geocoding API key
//!
//! ## Optional
//! - `TADKA_HOST` - Bind address (default: 127.0.0.1)
//! - `TADKA_PORT` - Listen port (default: 4000)
//! - `RESTAURANT_ID` - Public restaurant identifier returned by `/v1/info`
//! - `FREE_DELIVERY_RADIUS_KM` - Free delivery radius (default: 3)
//! - `MAX_DELIVERY_RADIUS_KM` - Maximum serviceable radius (default: 10)
//! - `GEOCODE_BASE_URL` - Geocoding endpoint override (tests/staging)
//! - `LOCATION_API_KEY` / `LOCATION_BASE_URL` - address plausibility lookup
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASS`, `SENDER_EMAIL`,
//!   `RECEIVER_EMAIL` - order confirmation email (email disabled when unset)
//! - `ALLOWED_ORIGINS` - comma-separated CORS origin allowlist
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - error tracking

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use tadka_core::{Coordinates, DEFAULT_FREE_RADIUS_KM, DEFAULT_MAX_RADIUS_KM};

/// Default geocoding endpoint (Google-style JSON).
const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Default forward-lookup endpoint used for address plausibility checks.
const DEFAULT_LOCATION_BASE_URL: &str = "https://us1.locationiq.com/v1/search";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Restaurant location and delivery radii
    pub restaurant: RestaurantConfig,
    /// Geocoding API configuration
    pub geocoder: GeocoderConfig,
    /// SMTP configuration; `None` disables the confirmation email
    pub email: Option<EmailConfig>,
    /// CORS origin allowlist (empty allows any origin, dev only)
    pub allowed_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Restaurant origin and delivery policy knobs.
#[derive(Debug, Clone)]
pub struct RestaurantConfig {
    /// Public restaurant identifier returned by `/v1/info`
    pub id: Option<String>,
    /// Fixed origin coordinate for distance calculation
    pub origin: Coordinates,
    /// Radius within which delivery is free, km
    pub free_radius_km: f64,
    /// Maximum serviceable radius, km
    pub max_radius_km: f64,
}

/// Geocoding API configuration.
///
/// Implements `Debug` manually to redact the API keys.
#[derive(Clone)]
pub struct GeocoderConfig {
    /// Geocoding endpoint returning Google-style geocode JSON
    pub geocode_base_url: String,
    /// Geocoding API key
    pub api_key: SecretString,
    /// Forward-lookup endpoint for address plausibility checks
    pub location_base_url: String,
    /// Forward-lookup API key; lookup is skipped when unset
    pub location_api_key: Option<SecretString>,
}

impl std::fmt::Debug for GeocoderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocoderConfig")
            .field("geocode_base_url", &self.geocode_base_url)
            .field("api_key", &"[REDACTED]")
            .field("location_base_url", &self.location_base_url)
            .field("location_api_key", &"[REDACTED]")
            .finish()
    }
}

/// SMTP configuration for the order confirmation email.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP relay host
    pub smtp_host: String,
    /// SMTP submission port
    pub smtp_port: u16,
    /// SMTP username
    pub smtp_username: String,
    /// SMTP password
    pub smtp_password: SecretString,
    /// From address on outgoing mail
    pub from_address: String,
    /// Restaurant inbox that receives new-order notifications
    pub order_inbox: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .field("order_inbox", &self.order_inbox)
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("TADKA_DATABASE_URL")?;
        let host = parse_env_or("TADKA_HOST", "127.0.0.1")?;
        let port = parse_env_or("TADKA_PORT", "4000")?;

        let restaurant = RestaurantConfig::from_env()?;
        let geocoder = GeocoderConfig::from_env()?;
        let email = EmailConfig::from_env()?;

        let allowed_origins = get_optional_env("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            restaurant,
            geocoder,
            email,
            allowed_origins,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl RestaurantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let lat: f64 = parse_required_env("RESTAURANT_LAT")?;
        let lng: f64 = parse_required_env("RESTAURANT_LNG")?;
        let free_radius_km =
            parse_env_or("FREE_DELIVERY_RADIUS_KM", &DEFAULT_FREE_RADIUS_KM.to_string())?;
        let max_radius_km =
            parse_env_or("MAX_DELIVERY_RADIUS_KM", &DEFAULT_MAX_RADIUS_KM.to_string())?;

        Ok(Self {
            id: get_optional_env("RESTAURANT_ID"),
            origin: Coordinates::new(lat, lng),
            free_radius_km,
            max_radius_km,
        })
    }
}

impl GeocoderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            geocode_base_url: get_env_or_default("GEOCODE_BASE_URL", DEFAULT_GEOCODE_BASE_URL),
            api_key: get_required_secret("GOOGLE_MAPS_API_KEY")?,
            location_base_url: get_env_or_default("LOCATION_BASE_URL", DEFAULT_LOCATION_BASE_URL),
            location_api_key: get_optional_env("LOCATION_API_KEY").map(SecretString::from),
        })
    }
}

impl EmailConfig {
    /// Email is optional: absent `SMTP_HOST` disables it entirely, but a
    /// partially configured block is a hard error.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_env_or("SMTP_PORT", "587")?,
            smtp_username: get_required_env("SMTP_USER")?,
            smtp_password: get_required_secret("SMTP_PASS")?,
            from_address: get_required_env("SENDER_EMAIL")?,
            order_inbox: get_required_env("RECEIVER_EMAIL")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse a required environment variable into `T`.
fn parse_required_env<T>(key: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_required_env(key)?
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}

/// Parse an environment variable into `T`, falling back to a default string.
fn parse_env_or<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 4000,
            restaurant: RestaurantConfig {
                id: Some("tadka".to_owned()),
                origin: Coordinates::new(48.78, 9.18),
                free_radius_km: 3.0,
                max_radius_km: 10.0,
            },
            geocoder: GeocoderConfig {
                geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_owned(),
                api_key: SecretString::from("key"),
                location_base_url: DEFAULT_LOCATION_BASE_URL.to_owned(),
                location_api_key: None,
            },
            email: None,
            allowed_origins: vec![],
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4000);
    }

    #[test]
    fn test_geocoder_debug_redacts_key() {
        let config = GeocoderConfig {
            geocode_base_url: DEFAULT_GEOCODE_BASE_URL.to_owned(),
            api_key: SecretString::from("super_secret_api_key"),
            location_base_url: DEFAULT_LOCATION_BASE_URL.to_owned(),
            location_api_key: Some(SecretString::from("another_secret")),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_key"));
        assert!(!debug_output.contains("another_secret"));
    }

    #[test]
    fn test_email_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_owned(),
            smtp_port: 587,
            smtp_username: "orders@example.com".to_owned(),
            smtp_password: SecretString::from("smtp_password_value"),
            from_address: "orders@example.com".to_owned(),
            order_inbox: "kitchen@example.com".to_owned(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("smtp_password_value"));
    }
}
