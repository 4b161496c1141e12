//! Request orchestration: input validation, business rules, and response
//! formatting.

use chrono::{Duration, Local, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::cache::{self, ForecastCache};
use crate::datetime::{self, CanonicalInstant};
use crate::error::WeatherError;
use crate::models::{CityDirectory, ForecastSample};
use crate::units::{self, PressureUnit, TemperatureUnit};

/// Decimal digits carried by formatted response values.
const RESPONSE_PRECISION: u32 = 2;

/// Query-string options accepted by the forecast endpoint.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ForecastRequest {
    /// Requested instant; defaults to now
    pub at: Option<String>,
    /// One of `K`, `C`, `F`; defaults to Celsius
    pub temp_units: Option<String>,
    /// One of `pa`, `bar`, `atm`, `torr`, `psi`, `hpa`; defaults to hPa
    pub pressure_units: Option<String>,
}

/// Formatted forecast as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub humidity: String,
    pub pressure: String,
    pub temperature: String,
    pub clouds: String,
}

pub struct ForecastService {
    cities: CityDirectory,
    cache: ForecastCache,
    max_forecast_days: i64,
}

impl ForecastService {
    #[must_use]
    pub fn new(cities: CityDirectory, cache: ForecastCache, max_forecast_days: i64) -> Self {
        Self {
            cities,
            cache,
            max_forecast_days,
        }
    }

    /// Produces the formatted forecast for `city` at the requested instant.
    #[instrument(skip(self, request))]
    pub async fn forecast(
        &self,
        city: &str,
        request: &ForecastRequest,
    ) -> Result<ForecastReport, WeatherError> {
        if !self.cities.contains(city) {
            return Err(WeatherError::city_not_found(city));
        }

        let temp_unit = match request.temp_units.as_deref() {
            Some(code) => {
                TemperatureUnit::from_code(code).ok_or_else(|| WeatherError::invalid_unit(code))?
            }
            None => TemperatureUnit::Celsius,
        };
        let pressure_unit = match request.pressure_units.as_deref() {
            Some(code) => {
                PressureUnit::from_code(code).ok_or_else(|| WeatherError::invalid_unit(code))?
            }
            None => PressureUnit::Hectopascal,
        };

        let now = Local::now().naive_local();
        let instant = match request.at.as_deref() {
            Some(raw) => datetime::parse_date_string(raw)?,
            None => now,
        };
        check_range(instant, now, self.max_forecast_days)?;

        let target = datetime::to_compact_int(&instant);
        let samples = self.cache.ensure_coverage(city, instant).await?;
        let sample = cache::select_nearest(&samples, target)
            .ok_or_else(|| WeatherError::internal("no forecast samples available"))?;

        build_report(sample, temp_unit, pressure_unit)
    }
}

/// A requested instant must not precede the start of the current day and must
/// not lie beyond `now + max_forecast_days`.
fn check_range(
    instant: CanonicalInstant,
    now: CanonicalInstant,
    max_forecast_days: i64,
) -> Result<(), WeatherError> {
    let today = now.date().and_time(NaiveTime::MIN);
    if instant < today {
        return Err(WeatherError::DateInPast);
    }
    if instant > now + Duration::days(max_forecast_days) {
        return Err(WeatherError::DateTooFarAhead);
    }
    Ok(())
}

fn build_report(
    sample: &ForecastSample,
    temp_unit: TemperatureUnit,
    pressure_unit: PressureUnit,
) -> Result<ForecastReport, WeatherError> {
    let temperature = units::convert_temperature(
        sample.temperature,
        TemperatureUnit::Kelvin,
        temp_unit,
        RESPONSE_PRECISION,
        true,
    )?;
    let pressure = units::convert_pressure(
        sample.pressure,
        PressureUnit::Hectopascal,
        pressure_unit,
        RESPONSE_PRECISION,
        true,
    )?;

    Ok(ForecastReport {
        humidity: format!("{}%", sample.humidity),
        pressure: pressure.to_string(),
        temperature: temperature.to_string(),
        clouds: describe_cloud_cover(sample.cloud_cover).to_string(),
    })
}

/// Buckets cloud cover into the fixed ordinal scale. Boundaries are inclusive
/// upper bounds checked in ascending order.
#[must_use]
pub fn describe_cloud_cover(percentage: f64) -> &'static str {
    if percentage <= 10.0 {
        "clear sky"
    } else if percentage <= 36.0 {
        "few clouds"
    } else if percentage <= 60.0 {
        "scattered clouds"
    } else if percentage <= 84.0 {
        "broken clouds"
    } else {
        "overcast"
    }
}
