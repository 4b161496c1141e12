//! Error types and HTTP mapping for the weather service.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire shape shared by every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub error_code: String,
}

/// Main error type for the weather service
#[derive(Error, Debug)]
pub enum WeatherError {
    /// The requested city is not in the reference list
    #[error("Cannot find city '{city}'")]
    CityNotFound { city: String },

    /// The `at` parameter matched none of the supported date formats
    #[error("'{value}' is not a recognised date format")]
    InvalidDateFormat { value: String },

    /// Requested instant lies before the start of the current day
    #[error("date is in the past")]
    DateInPast,

    /// Requested instant lies beyond the forecast horizon
    #[error("date too far in the future")]
    DateTooFarAhead,

    /// Unit parameter is not one of the supported unit codes
    #[error("'{value}' is not a valid unit")]
    InvalidUnit { value: String },

    /// Conversion between this unit pair is not implemented
    #[error("conversion of {from} to {to} is not supported")]
    UnsupportedConversion { from: String, to: String },

    /// The upstream forecast provider failed
    #[error("forecast provider request failed: {message}")]
    Provider { message: String },

    /// Persistence errors
    #[error("database error: {source}")]
    Database {
        #[from]
        source: sqlx::Error,
    },

    /// Anything else that should never reach a client verbatim
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl WeatherError {
    /// Create a new city-not-found error
    pub fn city_not_found<S: Into<String>>(city: S) -> Self {
        Self::CityNotFound { city: city.into() }
    }

    /// Create a new invalid-date-format error
    pub fn invalid_date<S: Into<String>>(value: S) -> Self {
        Self::InvalidDateFormat {
            value: value.into(),
        }
    }

    /// Create a new invalid-unit error
    pub fn invalid_unit<S: Into<String>>(value: S) -> Self {
        Self::InvalidUnit {
            value: value.into(),
        }
    }

    /// Create a new unsupported-conversion error
    pub fn unsupported_conversion<S: Into<String>>(from: S, to: S) -> Self {
        Self::UnsupportedConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new provider-failure error
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status this error maps to
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CityNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidDateFormat { .. }
            | Self::DateInPast
            | Self::DateTooFarAhead
            | Self::InvalidUnit { .. } => StatusCode::BAD_REQUEST,
            Self::UnsupportedConversion { .. }
            | Self::Provider { .. }
            | Self::Database { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code included in every error body
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CityNotFound { .. } => "city not found",
            Self::InvalidDateFormat { .. } | Self::DateInPast | Self::DateTooFarAhead => {
                "invalid date"
            }
            Self::InvalidUnit { .. } => "invalid_units",
            Self::UnsupportedConversion { .. }
            | Self::Provider { .. }
            | Self::Database { .. }
            | Self::Internal { .. } => "internal error",
        }
    }

    /// Message safe to expose to clients. Server-side failures collapse to a
    /// generic message so internal detail never leaks.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "something went wrong".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: self.public_message(),
            error_code: self.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let city_err = WeatherError::city_not_found("Gotham");
        assert!(matches!(city_err, WeatherError::CityNotFound { .. }));

        let date_err = WeatherError::invalid_date("yesterday-ish");
        assert!(matches!(date_err, WeatherError::InvalidDateFormat { .. }));

        let unit_err = WeatherError::invalid_unit("beans");
        assert!(matches!(unit_err, WeatherError::InvalidUnit { .. }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WeatherError::city_not_found("Gotham").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WeatherError::invalid_unit("beans").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WeatherError::DateInPast.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WeatherError::provider("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            WeatherError::city_not_found("Gotham").error_code(),
            "city not found"
        );
        assert_eq!(WeatherError::DateTooFarAhead.error_code(), "invalid date");
        assert_eq!(
            WeatherError::invalid_unit("beans").error_code(),
            "invalid_units"
        );
        assert_eq!(
            WeatherError::unsupported_conversion("C", "F").error_code(),
            "internal error"
        );
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let err = WeatherError::provider("connection refused to 10.0.0.5");
        assert_eq!(err.public_message(), "something went wrong");

        let err = WeatherError::city_not_found("Gotham");
        assert_eq!(err.public_message(), "Cannot find city 'Gotham'");
    }
}
