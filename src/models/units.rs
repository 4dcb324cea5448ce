//! Temperature unit preference and conversion
//!
//! Samples always carry Celsius; the preference only affects presentation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Temperature unit used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Convert a Celsius value into this unit
    #[must_use]
    pub fn convert(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => (celsius * 9.0 / 5.0) + 32.0,
        }
    }

    /// The other unit
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Convert and round to a whole degree
    #[must_use]
    pub fn rounded(self, celsius: f64) -> i64 {
        self.convert(celsius).round() as i64
    }

    /// Format a Celsius value as a rounded reading, e.g. `68°F`
    #[must_use]
    pub fn format(self, celsius: f64) -> String {
        format!("{}{}", self.rounded(celsius), self.symbol())
    }
}

/// Convert a Celsius temperature into `unit`
#[must_use]
pub fn convert_temperature(celsius: f64, unit: TemperatureUnit) -> f64 {
    unit.convert(celsius)
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius => write!(f, "celsius"),
            Self::Fahrenheit => write!(f, "fahrenheit"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = crate::WeatherDashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "celsius" | "c" => Ok(Self::Celsius),
            "fahrenheit" | "f" => Ok(Self::Fahrenheit),
            other => Err(crate::WeatherDashError::validation(format!(
                "unknown temperature unit '{other}'"
            ))),
        }
    }
}
