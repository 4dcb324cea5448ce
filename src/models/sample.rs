//! Weather sample model and validation

use crate::{Result, WeatherDashError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary weather condition category reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
    Fog,
    Haze,
    /// Any category outside the known set, kept verbatim
    Other(String),
}

impl WeatherCondition {
    /// Provider name of the category
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Drizzle => "Drizzle",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Haze => "Haze",
            Self::Other(name) => name,
        }
    }

    /// Icon shown next to the category
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::Clouds => "☁️",
            Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::Thunderstorm => "⛈️",
            Self::Drizzle => "🌦️",
            Self::Mist | Self::Fog | Self::Haze => "🌫️",
            Self::Other(_) => "🌤️",
        }
    }
}

impl From<&str> for WeatherCondition {
    fn from(name: &str) -> Self {
        match name {
            "Clear" => Self::Clear,
            "Clouds" => Self::Clouds,
            "Rain" => Self::Rain,
            "Snow" => Self::Snow,
            "Thunderstorm" => Self::Thunderstorm,
            "Drizzle" => Self::Drizzle,
            "Mist" => Self::Mist,
            "Fog" => Self::Fog,
            "Haze" => Self::Haze,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for WeatherCondition {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<WeatherCondition> for String {
    fn from(condition: WeatherCondition) -> Self {
        condition.as_str().to_string()
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Rain or snow accumulation over the provider's reporting windows, in mm
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationVolume {
    /// Volume over the last hour
    pub one_hour: Option<f64>,
    /// Volume over the last three hours
    pub three_hours: Option<f64>,
}

impl PrecipitationVolume {
    /// True when either window strictly exceeds its limit
    #[must_use]
    pub fn exceeds(&self, one_hour_limit: f64, three_hours_limit: f64) -> bool {
        self.one_hour.is_some_and(|v| v > one_hour_limit)
            || self.three_hours.is_some_and(|v| v > three_hours_limit)
    }
}

/// One weather reading, current or forecast. Temperatures are always Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Instant the reading applies to
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Apparent temperature in Celsius
    pub feels_like: f64,
    /// Minimum temperature in Celsius
    pub temp_min: f64,
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
    /// Atmospheric pressure in hPa
    pub pressure: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind gust speed in m/s
    pub wind_gust: Option<f64>,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: Option<f64>,
    /// Cloud cover percentage (0-100)
    pub cloudiness: u8,
    /// Visibility in meters
    pub visibility: f64,
    /// Probability of precipitation (0-1)
    pub precipitation_probability: Option<f64>,
    pub rain: PrecipitationVolume,
    pub snow: PrecipitationVolume,
    pub condition: WeatherCondition,
    /// Free-text description of the conditions
    pub description: String,
}

impl Sample {
    /// A mild, clear reading at `timestamp`; handy as a base for struct update syntax.
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature,
            feels_like: temperature,
            temp_min: temperature,
            temp_max: temperature,
            humidity: 50,
            pressure: 1013.0,
            wind_speed: 0.0,
            wind_gust: None,
            wind_direction: None,
            cloudiness: 0,
            visibility: 10_000.0,
            precipitation_probability: None,
            rain: PrecipitationVolume::default(),
            snow: PrecipitationVolume::default(),
            condition: WeatherCondition::Clear,
            description: "clear sky".to_string(),
        }
    }

    /// Check every numeric field against its physical range
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("temperature", self.temperature),
            ("feels_like", self.feels_like),
            ("temp_min", self.temp_min),
            ("temp_max", self.temp_max),
            ("pressure", self.pressure),
            ("wind_speed", self.wind_speed),
            ("visibility", self.visibility),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(WeatherDashError::validation(format!(
                "{name} must be a finite number"
            )));
        }

        if self.humidity > 100 {
            return Err(WeatherDashError::validation(format!(
                "humidity {} is outside 0-100",
                self.humidity
            )));
        }
        if self.cloudiness > 100 {
            return Err(WeatherDashError::validation(format!(
                "cloudiness {} is outside 0-100",
                self.cloudiness
            )));
        }
        if self.wind_speed < 0.0 {
            return Err(WeatherDashError::validation("wind speed cannot be negative"));
        }
        if self.visibility < 0.0 {
            return Err(WeatherDashError::validation("visibility cannot be negative"));
        }
        if let Some(gust) = self.wind_gust
            && (!gust.is_finite() || gust < 0.0)
        {
            return Err(WeatherDashError::validation("wind gust must be a non-negative number"));
        }
        if let Some(direction) = self.wind_direction
            && !direction.is_finite()
        {
            return Err(WeatherDashError::validation("wind direction must be finite"));
        }
        if let Some(pop) = self.precipitation_probability
            && !(0.0..=1.0).contains(&pop)
        {
            return Err(WeatherDashError::validation(format!(
                "precipitation probability {pop} is outside 0-1"
            )));
        }

        let volumes = [
            self.rain.one_hour,
            self.rain.three_hours,
            self.snow.one_hour,
            self.snow.three_hours,
        ];
        if volumes
            .iter()
            .flatten()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(WeatherDashError::validation(
                "precipitation volume must be a non-negative number",
            ));
        }

        Ok(())
    }
}
