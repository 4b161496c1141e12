use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use weatherservice::cache::ForecastCache;
use weatherservice::config::WeatherConfig;
use weatherservice::models::CityDirectory;
use weatherservice::provider::HttpForecastProvider;
use weatherservice::service::ForecastService;
use weatherservice::store::ForecastStore;
use weatherservice::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = WeatherConfig::from_env()?;

    let cities = CityDirectory::load(&config.cities_path)?;
    tracing::info!(cities = cities.len(), "city directory loaded");

    let store = ForecastStore::connect(&config.database_url)
        .await
        .context("Failed to open forecast database")?;
    store
        .seed_cities(cities.iter())
        .await
        .context("Failed to seed city table")?;

    let provider = HttpForecastProvider::new(
        &config.provider_base_url,
        config.provider_api_key.clone(),
    )?;
    let cache = ForecastCache::new(store, Arc::new(provider), config.coverage_interval_mins);
    let service = Arc::new(ForecastService::new(
        cities,
        cache,
        config.max_forecast_days,
    ));

    web::run(service, config.http_port).await
}
