//! Data model: the city directory, cached forecast samples, and the raw
//! provider wire types.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Immutable set of recognised city names, loaded once at startup and
/// injected wherever city validation is needed.
#[derive(Debug, Clone)]
pub struct CityDirectory {
    names: HashSet<String>,
}

impl CityDirectory {
    #[must_use]
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Loads the directory from a JSON file containing a flat array of names.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read city list from {}", path.display()))?;
        let names: Vec<String> =
            serde_json::from_str(&raw).context("Failed to parse city list JSON")?;
        Ok(Self::new(names))
    }

    #[must_use]
    pub fn contains(&self, city: &str) -> bool {
        self.names.contains(city)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One cached weather sample for a city at a specific instant.
///
/// Stored units are canonical: temperature in Kelvin, pressure in
/// hectopascals, humidity and cloud cover as percentages. `forecast_for` is
/// the compact `YYYYMMDDHHMM` local-clock timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ForecastSample {
    pub city: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub cloud_cover: f64,
    pub forecast_for: i64,
}

/// Raw provider payload shapes. The provider reports a batch of samples under
/// `list`, each with an epoch timestamp and nested measurement sections.
pub mod wire {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ProviderResponse {
        pub list: Vec<ProviderEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProviderEntry {
        /// Unix epoch seconds of the instant this entry forecasts
        pub dt: i64,
        pub main: ProviderMain,
        pub clouds: ProviderClouds,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProviderMain {
        /// Temperature in Kelvin
        pub temp: f64,
        /// Relative humidity percentage
        pub humidity: f64,
        /// Pressure in hectopascals
        pub pressure: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProviderClouds {
        /// Cloud cover percentage
        pub all: f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_directory_membership() {
        let cities = CityDirectory::new(["London".to_string(), "Nairobi".to_string()]);
        assert_eq!(cities.len(), 2);
        assert!(cities.contains("London"));
        assert!(!cities.contains("london"));
        assert!(!cities.contains("Gotham"));
    }

    #[test]
    fn test_provider_payload_parsing() {
        let payload = r#"{
            "list": [
                {
                    "dt": 1581785600,
                    "main": {"temp": 283.15, "humidity": 57.0, "pressure": 1013.0},
                    "clouds": {"all": 67.0}
                }
            ]
        }"#;
        let parsed: wire::ProviderResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.list.len(), 1);
        assert_eq!(parsed.list[0].dt, 1_581_785_600);
        assert_eq!(parsed.list[0].main.temp, 283.15);
        assert_eq!(parsed.list[0].clouds.all, 67.0);
    }
}
