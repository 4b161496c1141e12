//! Environment-driven configuration for the weather service.

use std::env;
use std::str::FromStr;

use anyhow::{Result, anyhow};

/// Root configuration, assembled from environment variables with sensible
/// defaults for local development.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    /// Port the HTTP server binds to
    pub http_port: u16,
    /// SQLite connection string for the forecast store
    pub database_url: String,
    /// Path to the JSON city reference list
    pub cities_path: String,
    /// Provider endpoint prefix; the city name is appended
    pub provider_base_url: String,
    /// Provider API key, if the endpoint needs one
    pub provider_api_key: Option<String>,
    /// Half-width of the cache coverage window, in minutes
    pub coverage_interval_mins: i64,
    /// How far into the future a forecast may be requested, in days
    pub max_forecast_days: i64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            http_port: 8000,
            database_url: "sqlite:weatherservice.db".to_string(),
            cities_path: "all_cities.json".to_string(),
            provider_base_url: "https://api.openweathermap.org/data/2.5/forecast?q=".to_string(),
            provider_api_key: None,
            coverage_interval_mins: 180,
            max_forecast_days: 5,
        }
    }
}

impl WeatherConfig {
    /// Reads the configuration from the environment, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            http_port: parse_env("WEATHER_HTTP_PORT", defaults.http_port)?,
            database_url: env::var("WEATHER_DATABASE_URL").unwrap_or(defaults.database_url),
            cities_path: env::var("WEATHER_CITIES_PATH").unwrap_or(defaults.cities_path),
            provider_base_url: env::var("OWM_API_BASE_URL").unwrap_or(defaults.provider_base_url),
            provider_api_key: env::var("OWM_API_KEY").ok(),
            coverage_interval_mins: parse_env(
                "WEATHER_COVERAGE_INTERVAL_MINS",
                defaults.coverage_interval_mins,
            )?,
            max_forecast_days: parse_env("WEATHER_MAX_FORECAST_DAYS", defaults.max_forecast_days)?,
        })
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| anyhow!("Invalid value for {key}: '{raw}'")),
        Err(_) => Ok(default),
    }
}
