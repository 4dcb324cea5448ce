//! Daily summary statistics over a day bucket

use super::grouping::DayBucket;
use crate::models::{TemperatureUnit, WeatherCondition};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Read-only summary of one day of forecast samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAggregate {
    pub date: NaiveDate,
    /// Lowest `temp_min` of the day in Celsius
    pub min_temp: f64,
    /// Highest `temp_max` of the day in Celsius
    pub max_temp: f64,
    /// Most frequent condition; ties go to the first category to reach the top count
    pub dominant_condition: WeatherCondition,
    /// Mean precipitation probability (0-1), missing values counted as 0
    pub avg_precipitation_probability: f64,
    /// Mean wind speed in m/s
    pub avg_wind_speed: f64,
    pub sample_count: usize,
}

impl DayAggregate {
    /// Summarize a bucket. Buckets are never empty, so this cannot fail.
    #[must_use]
    pub fn from_bucket(bucket: &DayBucket) -> Self {
        let samples = bucket.samples();
        let count = samples.len() as f64;

        let min_temp = samples
            .iter()
            .map(|s| s.temp_min)
            .fold(f64::INFINITY, f64::min);
        let max_temp = samples
            .iter()
            .map(|s| s.temp_max)
            .fold(f64::NEG_INFINITY, f64::max);

        let avg_precipitation_probability = samples
            .iter()
            .map(|s| s.precipitation_probability.unwrap_or(0.0))
            .sum::<f64>()
            / count;
        let avg_wind_speed = samples.iter().map(|s| s.wind_speed).sum::<f64>() / count;

        Self {
            date: bucket.date(),
            min_temp,
            max_temp,
            dominant_condition: dominant_condition(samples.iter().map(|s| &s.condition))
                .unwrap_or_else(|| WeatherCondition::Other(String::new())),
            avg_precipitation_probability,
            avg_wind_speed,
            sample_count: samples.len(),
        }
    }

    /// `max / min` rendered in `unit`, e.g. `24°C / 13°C`
    #[must_use]
    pub fn format_range(&self, unit: TemperatureUnit) -> String {
        format!("{} / {}", unit.format(self.max_temp), unit.format(self.min_temp))
    }

    /// Precipitation chance as a whole percentage
    #[must_use]
    pub fn precipitation_percent(&self) -> u8 {
        (self.avg_precipitation_probability * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Mode of a condition sequence. On a tie the category that first reaches the
/// winning count during a single left-to-right scan wins.
pub fn dominant_condition<'a, I>(conditions: I) -> Option<WeatherCondition>
where
    I: IntoIterator<Item = &'a WeatherCondition>,
{
    let mut counts: Vec<(&WeatherCondition, usize)> = Vec::new();
    let mut best: Option<(&WeatherCondition, usize)> = None;

    for condition in conditions {
        let count = match counts.iter_mut().find(|(c, _)| *c == condition) {
            Some((_, n)) => {
                *n += 1;
                *n
            }
            None => {
                counts.push((condition, 1));
                1
            }
        };
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((condition, count));
        }
    }

    best.map(|(condition, _)| condition.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;
    use chrono::{DateTime, Duration, Utc};

    fn bucket(samples: Vec<Sample>) -> DayBucket {
        let date = samples[0].timestamp.date_naive();
        DayBucket::new(date, samples).unwrap()
    }

    fn day(conditions: &[WeatherCondition]) -> Vec<Sample> {
        let start: DateTime<Utc> = "2024-06-01T00:00:00Z".parse().unwrap();
        conditions
            .iter()
            .enumerate()
            .map(|(i, c)| Sample {
                condition: c.clone(),
                ..Sample::new(start + Duration::hours(3 * i as i64), 15.0)
            })
            .collect()
    }

    #[test]
    fn test_tie_goes_to_first_to_reach_max() {
        use WeatherCondition::{Clear, Rain};
        let agg = DayAggregate::from_bucket(&bucket(day(&[Rain, Clear, Rain, Clear])));
        assert_eq!(agg.dominant_condition, Rain);
    }

    #[test]
    fn test_later_majority_wins() {
        use WeatherCondition::{Clear, Clouds, Rain};
        let conditions = [Clear, Rain, Clouds, Rain, Clouds, Clouds];
        assert_eq!(dominant_condition(&conditions), Some(Clouds));
        assert_eq!(dominant_condition(&[]), None);
    }

    #[test]
    fn test_extrema_use_min_and_max_fields() {
        let mut samples = day(&vec![WeatherCondition::Clear; 3]);
        samples[0].temp_min = 9.5;
        samples[1].temp_max = 27.0;
        samples[2].temperature = 40.0; // instantaneous temp is ignored

        let agg = DayAggregate::from_bucket(&bucket(samples));
        assert_eq!(agg.min_temp, 9.5);
        assert_eq!(agg.max_temp, 27.0);
    }

    #[test]
    fn test_averages_treat_missing_probability_as_zero() {
        let mut samples = day(&vec![WeatherCondition::Rain; 4]);
        samples[0].precipitation_probability = Some(0.8);
        samples[1].precipitation_probability = Some(0.4);
        for (s, wind) in samples.iter_mut().zip([2.0, 4.0, 6.0, 8.0]) {
            s.wind_speed = wind;
        }

        let agg = DayAggregate::from_bucket(&bucket(samples));
        assert!((agg.avg_precipitation_probability - 0.3).abs() < 1e-12);
        assert_eq!(agg.avg_wind_speed, 5.0);
        assert_eq!(agg.precipitation_percent(), 30);
        assert_eq!(agg.sample_count, 4);
    }

    #[test]
    fn test_recomputation_is_identical() {
        let b = bucket(day(&[WeatherCondition::Snow, WeatherCondition::Clouds]));
        assert_eq!(DayAggregate::from_bucket(&b), DayAggregate::from_bucket(&b));
    }

    #[test]
    fn test_format_range() {
        let mut samples = day(&[WeatherCondition::Clear]);
        samples[0].temp_min = 0.0;
        samples[0].temp_max = 100.0;
        let agg = DayAggregate::from_bucket(&bucket(samples));
        assert_eq!(agg.format_range(TemperatureUnit::Fahrenheit), "212°F / 32°F");
    }
}
