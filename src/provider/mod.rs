//! Weather and geocoding collaborators
//!
//! Traits the dashboard talks to, plus the HTTP adapters that implement them.
//! Everything crossing these traits is already validated.

pub mod geocode;
pub mod openweather;

use crate::Result;
use crate::models::{Coordinates, Location, Sample};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};

pub use geocode::GeocoderChain;
pub use openweather::OpenWeatherClient;

/// Current reading for a place
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub location: Location,
    pub sample: Sample,
    /// Offset of the place's local time from UTC
    pub utc_offset: FixedOffset,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

/// Time-ordered forecast samples for a place
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    pub samples: Vec<Sample>,
    pub utc_offset: FixedOffset,
}

/// Source of current conditions and forecasts
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_by_city(&self, city: &str) -> Result<CurrentConditions>;

    /// Forecast covering `days` days from now
    async fn forecast_by_city(&self, city: &str, days: u8) -> Result<ForecastSeries>;

    async fn current_by_coordinates(&self, coordinates: Coordinates) -> Result<CurrentConditions>;

    async fn forecast_by_coordinates(
        &self,
        coordinates: Coordinates,
        days: u8,
    ) -> Result<ForecastSeries>;
}

/// Mask every `appid=` query value in text that may echo a request URL
pub(crate) fn redact_api_key(text: &str) -> String {
    const MARKER: &str = "appid=";

    let mut redacted = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(MARKER) {
        let (head, tail) = rest.split_at(pos + MARKER.len());
        redacted.push_str(head);
        redacted.push_str("***");
        let end = tail
            .find(|c: char| matches!(c, '&' | ')' | '"' | '\'') || c.is_whitespace())
            .unwrap_or(tail.len());
        rest = &tail[end..];
    }
    redacted.push_str(rest);
    redacted
}

/// Turns coordinates into a human-readable place name
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn place_name(&self, coordinates: Coordinates) -> Result<String>;
}
