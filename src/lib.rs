//! `weatherservice` - weather forecast HTTP API backed by a local cache
//!
//! This library provides the core functionality: unit and date
//! normalization, a time-indexed forecast cache with nearest-match
//! selection, and the orchestration that turns a city plus an instant into
//! a formatted forecast response.

pub mod api;
pub mod cache;
pub mod config;
pub mod datetime;
pub mod error;
pub mod models;
pub mod provider;
pub mod service;
pub mod store;
pub mod units;
pub mod web;

// Re-export core types for public API
pub use cache::ForecastCache;
pub use config::WeatherConfig;
pub use error::{ErrorBody, WeatherError};
pub use models::{CityDirectory, ForecastSample};
pub use provider::{ForecastProvider, HttpForecastProvider};
pub use service::{ForecastReport, ForecastRequest, ForecastService};
pub use store::ForecastStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;
