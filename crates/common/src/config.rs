//! Application configuration.

use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Session cookie configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Weather lookup configuration.
    #[serde(default)]
    pub weather: WeatherConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Name of the cookie carrying the one-shot admin flash message.
    #[serde(default = "default_flash_cookie_name")]
    pub flash_cookie_name: String,
    /// Whether cookies are marked `Secure` (HTTPS only).
    #[serde(default)]
    pub secure: bool,
}

/// Weather lookup configuration.
///
/// The coordinates are fixed: the forecast always targets one city.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo API base URL.
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Latitude of the configured location.
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Longitude of the configured location.
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// IANA timezone used both for the request and for "now".
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// City name echoed back in the weather payload.
    #[serde(default = "default_city")]
    pub city: String,
    /// Request timeout in seconds.
    #[serde(default = "default_weather_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

fn default_cookie_name() -> String {
    "where2go_session".to_string()
}

fn default_flash_cookie_name() -> String {
    "where2go_flash".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

const fn default_latitude() -> f64 {
    44.6983
}

const fn default_longitude() -> f64 {
    10.6312
}

fn default_timezone() -> String {
    "Europe/Rome".to_string()
}

fn default_city() -> String {
    "Reggio Emilia".to_string()
}

const fn default_weather_timeout() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            flash_cookie_name: default_flash_cookie_name(),
            secure: false,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            latitude: default_latitude(),
            longitude: default_longitude(),
            timezone: default_timezone(),
            city: default_city(),
            timeout_secs: default_weather_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `WHERE2GO_ENV`)
    /// 3. Environment variables with `WHERE2GO_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("WHERE2GO_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WHERE2GO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("WHERE2GO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_defaults_target_reggio_emilia() {
        let weather = WeatherConfig::default();
        assert_eq!(weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(weather.timezone, "Europe/Rome");
        assert_eq!(weather.city, "Reggio Emilia");
        assert_eq!(weather.timeout_secs, 10);
        assert!((weather.latitude - 44.6983).abs() < f64::EPSILON);
        assert!((weather.longitude - 10.6312).abs() < f64::EPSILON);
    }

    #[test]
    fn test_session_defaults() {
        let session = SessionConfig::default();
        assert_eq!(session.cookie_name, "where2go_session");
        assert_eq!(session.flash_cookie_name, "where2go_flash");
        assert!(!session.secure);
    }

    #[test]
    fn test_deserialize_minimal_config() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "database": { "url": "postgres://localhost/where2go" }
        }))
        .unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.session.cookie_name, "where2go_session");
        assert_eq!(config.weather.city, "Reggio Emilia");
    }
}
