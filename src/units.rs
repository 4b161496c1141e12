//! Scalar unit conversion for temperature and pressure.
//!
//! All stored values use canonical units (temperature in Kelvin, pressure in
//! hectopascals); this module converts them to whatever the caller asked for,
//! with controllable rounding and optional unit-suffixed string output.

use std::fmt;

use crate::error::WeatherError;

/// Default rounding: high enough that only floating point noise is cut off.
pub const DEFAULT_PRECISION: u32 = 10;

/// Supported temperature units. Codes are matched case-sensitively: callers
/// pass exactly `K`, `C` or `F`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "K" => Some(Self::Kelvin),
            "C" => Some(Self::Celsius),
            "F" => Some(Self::Fahrenheit),
            _ => None,
        }
    }

    /// Display symbol appended in suffixed output
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Kelvin => "K",
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Supported pressure units. Query parameters use the lowercase codes; the
/// display symbols keep their canonical casing via a fixed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnit {
    Hectopascal,
    Pascal,
    Bar,
    Atmosphere,
    Torr,
    Psi,
}

impl PressureUnit {
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "hpa" => Some(Self::Hectopascal),
            "pa" => Some(Self::Pascal),
            "bar" => Some(Self::Bar),
            "atm" => Some(Self::Atmosphere),
            "torr" => Some(Self::Torr),
            "psi" => Some(Self::Psi),
            _ => None,
        }
    }

    /// Display symbol appended in suffixed output
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Hectopascal => "hPa",
            Self::Pascal => "Pa",
            Self::Bar => "bar",
            Self::Atmosphere => "atm",
            Self::Torr => "Torr",
            Self::Psi => "psi",
        }
    }
}

impl fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Result of a conversion: a bare number, or a unit-suffixed string when the
/// caller asked for display output.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertedValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for ConvertedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(15) as i32);
    (value * factor).round() / factor
}

fn render(value: f64, symbol: &str, with_suffix: bool) -> ConvertedValue {
    if with_suffix {
        ConvertedValue::Text(format!("{value}{symbol}"))
    } else {
        ConvertedValue::Number(value)
    }
}

/// Converts a temperature between units, rounded to `precision` decimal
/// digits. Supported pairs: Kelvin↔Celsius, Kelvin→Fahrenheit, plus identity
/// (storage is Kelvin, so `temp_units=K` must still be answerable).
pub fn convert_temperature(
    value: f64,
    from: TemperatureUnit,
    to: TemperatureUnit,
    precision: u32,
    with_suffix: bool,
) -> Result<ConvertedValue, WeatherError> {
    use TemperatureUnit::{Celsius, Fahrenheit, Kelvin};

    let converted = match (from, to) {
        (Kelvin, Celsius) => value - 273.15,
        (Celsius, Kelvin) => value + 273.15,
        (Kelvin, Fahrenheit) => value * 9.0 / 5.0 - 459.67,
        (from, to) if from == to => value,
        (from, to) => {
            return Err(WeatherError::unsupported_conversion(
                from.symbol(),
                to.symbol(),
            ));
        }
    };

    Ok(render(round_to(converted, precision), to.symbol(), with_suffix))
}

/// Converts a pressure from hectopascals to the target unit. Pa and bar stay
/// exact arithmetic; atm, Torr and psi are rounded to `precision`; the hPa
/// target is an unrounded passthrough. Any source other than hPa is an
/// unsupported conversion.
pub fn convert_pressure(
    value: f64,
    from: PressureUnit,
    to: PressureUnit,
    precision: u32,
    with_suffix: bool,
) -> Result<ConvertedValue, WeatherError> {
    if from != PressureUnit::Hectopascal {
        return Err(WeatherError::unsupported_conversion(
            from.symbol(),
            to.symbol(),
        ));
    }

    let converted = match to {
        PressureUnit::Hectopascal => value,
        PressureUnit::Pascal => value * 100.0,
        PressureUnit::Bar => value / 1000.0,
        PressureUnit::Atmosphere => round_to(value / 1013.25, precision),
        PressureUnit::Torr => round_to(value / 1.33, precision),
        PressureUnit::Psi => round_to(value / 68.95, precision),
    };

    Ok(render(converted, to.symbol(), with_suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(99.0, TemperatureUnit::Kelvin, TemperatureUnit::Celsius, DEFAULT_PRECISION, -174.15)]
    #[case(0.0, TemperatureUnit::Celsius, TemperatureUnit::Kelvin, DEFAULT_PRECISION, 273.15)]
    #[case(1.0, TemperatureUnit::Kelvin, TemperatureUnit::Fahrenheit, 2, -457.87)]
    #[case(283.15, TemperatureUnit::Kelvin, TemperatureUnit::Kelvin, 2, 283.15)]
    fn test_convert_temperature(
        #[case] value: f64,
        #[case] from: TemperatureUnit,
        #[case] to: TemperatureUnit,
        #[case] precision: u32,
        #[case] expected: f64,
    ) {
        let result = convert_temperature(value, from, to, precision, false).unwrap();
        assert_eq!(result, ConvertedValue::Number(expected));
    }

    #[rstest]
    #[case(99.0, TemperatureUnit::Kelvin, TemperatureUnit::Celsius, 2, "-174.15C")]
    #[case(0.0, TemperatureUnit::Celsius, TemperatureUnit::Kelvin, 2, "273.15K")]
    #[case(1.0, TemperatureUnit::Kelvin, TemperatureUnit::Fahrenheit, 2, "-457.87F")]
    fn test_convert_temperature_with_suffix(
        #[case] value: f64,
        #[case] from: TemperatureUnit,
        #[case] to: TemperatureUnit,
        #[case] precision: u32,
        #[case] expected: &str,
    ) {
        let result = convert_temperature(value, from, to, precision, true).unwrap();
        assert_eq!(result, ConvertedValue::Text(expected.to_string()));
    }

    #[test]
    fn test_unsupported_temperature_pairs() {
        let err = convert_temperature(
            20.0,
            TemperatureUnit::Celsius,
            TemperatureUnit::Fahrenheit,
            2,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, WeatherError::UnsupportedConversion { .. }));

        let err = convert_temperature(
            20.0,
            TemperatureUnit::Fahrenheit,
            TemperatureUnit::Kelvin,
            2,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, WeatherError::UnsupportedConversion { .. }));
    }

    #[rstest]
    #[case(1.0, PressureUnit::Pascal, 2, 100.0)]
    #[case(10.0, PressureUnit::Bar, 2, 0.01)]
    #[case(10.0, PressureUnit::Atmosphere, 6, 0.009869)]
    #[case(1.0, PressureUnit::Torr, 2, 0.75)]
    #[case(1.0, PressureUnit::Psi, 4, 0.0145)]
    #[case(1013.25, PressureUnit::Hectopascal, 2, 1013.25)]
    fn test_convert_pressure(
        #[case] value: f64,
        #[case] to: PressureUnit,
        #[case] precision: u32,
        #[case] expected: f64,
    ) {
        let result =
            convert_pressure(value, PressureUnit::Hectopascal, to, precision, false).unwrap();
        assert_eq!(result, ConvertedValue::Number(expected));
    }

    #[rstest]
    #[case(1.0, PressureUnit::Pascal, 2, "100Pa")]
    #[case(10.0, PressureUnit::Bar, 2, "0.01bar")]
    #[case(10.0, PressureUnit::Atmosphere, 6, "0.009869atm")]
    #[case(1.0, PressureUnit::Torr, 2, "0.75Torr")]
    #[case(1.0, PressureUnit::Psi, 4, "0.0145psi")]
    fn test_convert_pressure_with_suffix(
        #[case] value: f64,
        #[case] to: PressureUnit,
        #[case] precision: u32,
        #[case] expected: &str,
    ) {
        let result =
            convert_pressure(value, PressureUnit::Hectopascal, to, precision, true).unwrap();
        assert_eq!(result, ConvertedValue::Text(expected.to_string()));
    }

    #[test]
    fn test_pressure_source_must_be_hectopascal() {
        let err = convert_pressure(1.0, PressureUnit::Pascal, PressureUnit::Bar, 2, false)
            .unwrap_err();
        assert!(matches!(err, WeatherError::UnsupportedConversion { .. }));
    }

    #[test]
    fn test_pa_and_bar_are_not_rounded() {
        // Rounding to 0 digits would destroy these values; exact arithmetic
        // must survive regardless of the requested precision.
        let pa = convert_pressure(
            0.055,
            PressureUnit::Hectopascal,
            PressureUnit::Pascal,
            0,
            false,
        )
        .unwrap();
        assert_eq!(pa, ConvertedValue::Number(5.5));

        let bar = convert_pressure(
            10.0,
            PressureUnit::Hectopascal,
            PressureUnit::Bar,
            0,
            false,
        )
        .unwrap();
        assert_eq!(bar, ConvertedValue::Number(0.01));
    }

    #[test]
    fn test_unit_codes_are_case_sensitive() {
        assert!(TemperatureUnit::from_code("K").is_some());
        assert!(TemperatureUnit::from_code("k").is_none());
        assert!(TemperatureUnit::from_code("beans").is_none());

        assert!(PressureUnit::from_code("hpa").is_some());
        assert!(PressureUnit::from_code("hPa").is_none());
        assert!(PressureUnit::from_code("beans").is_none());
    }
}
