//! Summary statistics for the temperature, humidity and wind chart series

use crate::models::{Sample, TemperatureUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Padding added around the rounded temperature axis, in display degrees
const TEMPERATURE_AXIS_PADDING: f64 = 2.0;

/// Average and extrema of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    /// Stats over `values`, or `None` when there are none
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            sum += value;
            min = min.min(value);
            max = max.max(value);
        }

        (count > 0).then(|| Self {
            average: sum / count as f64,
            min,
            max,
        })
    }
}

/// Humidity bands used to color the humidity chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HumidityLevel {
    Low,
    Comfortable,
    Moderate,
    High,
}

impl HumidityLevel {
    #[must_use]
    pub fn classify(humidity: u8) -> Self {
        match humidity {
            h if h > 80 => Self::High,
            h if h > 60 => Self::Moderate,
            h if h > 40 => Self::Comfortable,
            _ => Self::Low,
        }
    }
}

impl fmt::Display for HumidityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HumidityLevel::Low => write!(f, "Low Humidity"),
            HumidityLevel::Comfortable => write!(f, "Comfortable"),
            HumidityLevel::Moderate => write!(f, "Moderate Humidity"),
            HumidityLevel::High => write!(f, "High Humidity"),
        }
    }
}

/// Chart statistics over a forecast series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSummary {
    pub unit: TemperatureUnit,
    /// Per-point temperatures are converted and rounded before aggregation
    pub temperature: SeriesStats,
    /// Y-axis domain `(low, high)` for the temperature chart
    pub temperature_axis: (f64, f64),
    pub humidity: SeriesStats,
    pub wind_speed: SeriesStats,
    /// Highest gust, missing gusts counted as 0
    pub max_gust: f64,
}

impl ChartSummary {
    /// Summarize `samples` for display in `unit`; `None` for an empty series
    #[must_use]
    pub fn from_samples(samples: &[Sample], unit: TemperatureUnit) -> Option<Self> {
        let temperature =
            SeriesStats::from_values(samples.iter().map(|s| unit.convert(s.temperature).round()))?;
        let humidity = SeriesStats::from_values(samples.iter().map(|s| f64::from(s.humidity)))?;
        let wind_speed =
            SeriesStats::from_values(samples.iter().map(|s| round_one_decimal(s.wind_speed)))?;
        let max_gust = samples
            .iter()
            .map(|s| s.wind_gust.map_or(0.0, round_one_decimal))
            .fold(0.0, f64::max);

        Some(Self {
            unit,
            temperature_axis: temperature_axis(temperature.min, temperature.max),
            temperature,
            humidity,
            wind_speed,
            max_gust,
        })
    }
}

/// Axis bounds snapped outward to multiples of five, plus padding
#[must_use]
pub fn temperature_axis(min: f64, max: f64) -> (f64, f64) {
    (
        (min / 5.0).floor() * 5.0 - TEMPERATURE_AXIS_PADDING,
        (max / 5.0).ceil() * 5.0 + TEMPERATURE_AXIS_PADDING,
    )
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
