//! Report view-model assembled from one search

use crate::analysis::{
    Alert, AlertEvaluator, ChartSummary, CurrentInsights, DayAggregate, DayBucket, WindCategory,
    compass_direction, dew_point_clamped, group_by_day,
};
use crate::models::{Location, Sample, TemperatureUnit};
use crate::provider::{CurrentConditions, ForecastSeries};
use chrono::{DateTime, FixedOffset, Utc};

/// One forecast day: its samples and their summary
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub bucket: DayBucket,
    pub aggregate: DayAggregate,
}

impl DaySummary {
    #[must_use]
    pub fn from_bucket(bucket: DayBucket) -> Self {
        let aggregate = DayAggregate::from_bucket(&bucket);
        Self { bucket, aggregate }
    }

    /// `max / min` in `unit`
    #[must_use]
    pub fn format_range(&self, unit: TemperatureUnit) -> String {
        self.aggregate.format_range(unit)
    }
}

/// Everything the presentation layer shows for a place
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: Location,
    pub current: Sample,
    pub utc_offset: FixedOffset,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
    /// Dew point of the current reading in Celsius
    pub dew_point: Option<f64>,
    /// 16-point compass name of the current wind, when reported
    pub wind_direction: Option<&'static str>,
    pub wind_category: WindCategory,
    /// Clothing, trend, wind and visibility notes for the current reading
    pub insights: CurrentInsights,
    pub days: Vec<DaySummary>,
    /// Alerts over the current reading and the whole forecast
    pub alerts: Vec<Alert>,
    /// Forecast samples in time order, for the charts
    pub forecast: Vec<Sample>,
}

impl WeatherReport {
    /// Derive the report. Days are grouped in the place's local time and
    /// capped at `max_days`.
    #[must_use]
    pub fn build(
        location: Location,
        current: CurrentConditions,
        forecast: ForecastSeries,
        evaluator: &AlertEvaluator,
        max_days: usize,
    ) -> Self {
        let sample = current.sample;
        let days = group_by_day(&forecast.samples, &forecast.utc_offset, max_days)
            .into_iter()
            .map(DaySummary::from_bucket)
            .collect();
        let alerts = evaluator.evaluate_with_current(&sample, &forecast.samples);

        Self {
            location,
            dew_point: dew_point_clamped(sample.temperature, f64::from(sample.humidity)),
            wind_direction: sample.wind_direction.map(compass_direction),
            wind_category: WindCategory::classify(sample.wind_speed),
            insights: CurrentInsights::from_sample(&sample),
            current: sample,
            utc_offset: current.utc_offset,
            sunrise: current.sunrise,
            sunset: current.sunset,
            days,
            alerts,
            forecast: forecast.samples,
        }
    }

    /// Sunrise in the place's local time
    #[must_use]
    pub fn local_sunrise(&self) -> Option<DateTime<FixedOffset>> {
        self.sunrise.map(|at| at.with_timezone(&self.utc_offset))
    }

    /// Sunset in the place's local time
    #[must_use]
    pub fn local_sunset(&self) -> Option<DateTime<FixedOffset>> {
        self.sunset.map(|at| at.with_timezone(&self.utc_offset))
    }

    /// False when the forecast produced no day buckets
    #[must_use]
    pub fn has_forecast(&self) -> bool {
        !self.days.is_empty()
    }

    #[must_use]
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Chart statistics over the forecast in `unit`
    #[must_use]
    pub fn chart_summary(&self, unit: TemperatureUnit) -> Option<ChartSummary> {
        ChartSummary::from_samples(&self.forecast, unit)
    }
}
