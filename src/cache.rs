//! Time-indexed forecast cache: coverage windows, populate-on-miss, and
//! nearest-match selection.

use std::sync::Arc;

use chrono::{Duration, Local, TimeZone};
use tracing::{debug, info, instrument};

use crate::datetime::{self, CanonicalInstant};
use crate::error::WeatherError;
use crate::models::{ForecastSample, wire::ProviderResponse};
use crate::provider::ForecastProvider;
use crate::store::ForecastStore;

/// Write-through populate-on-miss cache over the forecast store. Existing
/// rows are never invalidated or expired; batches accumulate.
pub struct ForecastCache {
    store: ForecastStore,
    provider: Arc<dyn ForecastProvider>,
    coverage_interval: Duration,
}

impl ForecastCache {
    #[must_use]
    pub fn new(
        store: ForecastStore,
        provider: Arc<dyn ForecastProvider>,
        coverage_interval_mins: i64,
    ) -> Self {
        Self {
            store,
            provider,
            coverage_interval: Duration::minutes(coverage_interval_mins),
        }
    }

    /// Returns the cached samples inside the coverage window around
    /// `instant`, fetching and persisting a fresh provider batch first when
    /// the window is empty.
    #[instrument(skip(self))]
    pub async fn ensure_coverage(
        &self,
        city: &str,
        instant: CanonicalInstant,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        let min = datetime::to_compact_int(&(instant - self.coverage_interval));
        let max = datetime::to_compact_int(&(instant + self.coverage_interval));

        let cached = self.store.samples_in_window(city, min, max).await?;
        if !cached.is_empty() {
            debug!(samples = cached.len(), "coverage window already populated");
            return Ok(cached);
        }

        info!(city, "no cached samples in window, fetching from provider");
        let batch = self.provider.fetch(city).await?;
        let samples = convert_batch(city, &batch);
        self.store.insert_samples(&samples).await?;

        self.store.samples_in_window(city, min, max).await
    }
}

/// Converts a raw provider batch into canonical storage form: epoch
/// timestamps become compact local-clock integers; temperature arrives in
/// Kelvin and pressure in hectopascals, so those pass through unchanged.
fn convert_batch(city: &str, batch: &ProviderResponse) -> Vec<ForecastSample> {
    batch
        .list
        .iter()
        .filter_map(|entry| {
            let local = Local.timestamp_opt(entry.dt, 0).single()?;
            Some(ForecastSample {
                city: city.to_string(),
                temperature: entry.main.temp,
                humidity: entry.main.humidity,
                pressure: entry.main.pressure,
                cloud_cover: entry.clouds.all,
                forecast_for: datetime::to_compact_int(&local.naive_local()),
            })
        })
        .collect()
}

/// Picks the sample closest in time to `target` from a list ordered most
/// recent first.
///
/// This is deliberately an early-stopping local-minimum scan, not a global
/// minimum search: walk the list tracking the best absolute distance seen so
/// far, and stop at the first sample that is no closer than the current best
/// (ties keep the sample seen earlier in the scan). Callers depend on this
/// exact behavior, including its result on lists that are not perfectly
/// ordered.
#[must_use]
pub fn select_nearest(samples: &[ForecastSample], target: i64) -> Option<&ForecastSample> {
    let (first, rest) = samples.split_first()?;
    let mut best = first;
    let mut best_distance = (first.forecast_for - target).abs();

    for sample in rest {
        let distance = (sample.forecast_for - target).abs();
        if distance < best_distance {
            best = sample;
            best_distance = distance;
        } else {
            break;
        }
    }

    Some(best)
}
