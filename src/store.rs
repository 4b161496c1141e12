//! SQLite persistence for the city reference table and cached forecasts.
//!
//! Two tables: `cities(name PK)` and `forecast(id PK, city FK, measurements,
//! forecast_for BIGINT)`. Schema creation is idempotent so the service can be
//! pointed at a fresh database file and just run.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, instrument};

use crate::error::WeatherError;
use crate::models::ForecastSample;

#[derive(Debug, Clone)]
pub struct ForecastStore {
    pool: SqlitePool,
}

impl ForecastStore {
    /// Opens (creating if missing) the database and ensures the schema.
    pub async fn connect(database_url: &str) -> Result<Self, WeatherError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(WeatherError::from)?
            .create_if_missing(true);

        // Single connection: SQLite serializes writes anyway, and a pool of
        // one keeps in-memory databases usable (each new connection to
        // `sqlite::memory:` would otherwise see an empty schema).
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), WeatherError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cities (
                 name TEXT PRIMARY KEY
             )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS forecast (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 city TEXT NOT NULL REFERENCES cities(name) ON DELETE CASCADE,
                 humidity REAL NOT NULL,
                 pressure REAL NOT NULL,
                 temperature REAL NOT NULL,
                 cloud_cover REAL NOT NULL,
                 forecast_for BIGINT NOT NULL
             )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_forecast_city_time
                 ON forecast (city, forecast_for)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Idempotently seeds the city reference table.
    #[instrument(skip_all)]
    pub async fn seed_cities<'a>(
        &self,
        cities: impl Iterator<Item = &'a str>,
    ) -> Result<(), WeatherError> {
        let mut tx = self.pool.begin().await?;
        let mut seeded = 0usize;
        for name in cities {
            sqlx::query("INSERT OR IGNORE INTO cities (name) VALUES (?1)")
                .bind(name)
                .execute(&mut *tx)
                .await?;
            seeded += 1;
        }
        tx.commit().await?;
        debug!(seeded, "city table seeded");
        Ok(())
    }

    /// Samples for `city` with `forecast_for` in `[min, max]`, most recent
    /// first. The descending order is what nearest-match selection expects.
    pub async fn samples_in_window(
        &self,
        city: &str,
        min: i64,
        max: i64,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        let samples = sqlx::query_as::<_, ForecastSample>(
            "SELECT city, humidity, pressure, temperature, cloud_cover, forecast_for
                 FROM forecast
                 WHERE city = ?1 AND forecast_for >= ?2 AND forecast_for <= ?3
                 ORDER BY forecast_for DESC",
        )
        .bind(city)
        .bind(min)
        .bind(max)
        .fetch_all(&self.pool)
        .await?;
        Ok(samples)
    }

    /// Persists a provider batch in a single transaction, so a failed fetch
    /// or insert commits nothing. No dedup: repeated fetches accumulate.
    #[instrument(skip_all, fields(samples = samples.len()))]
    pub async fn insert_samples(&self, samples: &[ForecastSample]) -> Result<(), WeatherError> {
        let mut tx = self.pool.begin().await?;
        for sample in samples {
            sqlx::query(
                "INSERT INTO forecast
                     (city, humidity, pressure, temperature, cloud_cover, forecast_for)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .bind(&sample.city)
            .bind(sample.humidity)
            .bind(sample.pressure)
            .bind(sample.temperature)
            .bind(sample.cloud_cover)
            .bind(sample.forecast_for)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Total number of stored samples for a city, any timestamp.
    pub async fn sample_count(&self, city: &str) -> Result<i64, WeatherError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forecast WHERE city = ?1")
            .bind(city)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(city: &str, forecast_for: i64) -> ForecastSample {
        ForecastSample {
            city: city.to_string(),
            temperature: 283.15,
            humidity: 57.0,
            pressure: 1013.0,
            cloud_cover: 67.0,
            forecast_for,
        }
    }

    async fn memory_store() -> ForecastStore {
        let store = ForecastStore::connect("sqlite::memory:").await.unwrap();
        store.seed_cities(["London", "Nairobi"].into_iter()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_window_query_orders_descending() {
        let store = memory_store().await;
        store
            .insert_samples(&[
                sample("London", 202_002_150_900),
                sample("London", 202_002_151_500),
                sample("London", 202_002_151_200),
            ])
            .await
            .unwrap();

        let rows = store
            .samples_in_window("London", 202_002_150_000, 202_002_152_359)
            .await
            .unwrap();
        let times: Vec<i64> = rows.iter().map(|s| s.forecast_for).collect();
        assert_eq!(times, vec![202_002_151_500, 202_002_151_200, 202_002_150_900]);
    }

    #[tokio::test]
    async fn test_window_query_filters_city_and_range() {
        let store = memory_store().await;
        store
            .insert_samples(&[
                sample("London", 202_002_151_200),
                sample("Nairobi", 202_002_151_200),
                sample("London", 202_003_011_200),
            ])
            .await
            .unwrap();

        let rows = store
            .samples_in_window("London", 202_002_150_000, 202_002_152_359)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].city, "London");
        assert_eq!(rows[0].forecast_for, 202_002_151_200);
    }

    #[tokio::test]
    async fn test_inserts_accumulate_without_dedup() {
        let store = memory_store().await;
        let batch = [sample("London", 202_002_151_200)];
        store.insert_samples(&batch).await.unwrap();
        store.insert_samples(&batch).await.unwrap();
        assert_eq!(store.sample_count("London").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seed_cities_is_idempotent() {
        let store = memory_store().await;
        store.seed_cities(["London"].into_iter()).await.unwrap();
        // A second seeding of the same name must not fail.
        store.seed_cities(["London"].into_iter()).await.unwrap();
    }
}
