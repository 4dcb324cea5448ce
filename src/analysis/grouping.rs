//! Partition a forecast into calendar-day buckets

use crate::models::Sample;
use crate::{Result, WeatherDashError};
use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Most days a grouped forecast keeps
pub const MAX_FORECAST_DAYS: usize = 7;

/// Samples sharing one local calendar date, in ascending timestamp order.
/// Never empty; deserialization goes through [`DayBucket::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDayBucket")]
pub struct DayBucket {
    date: NaiveDate,
    samples: Vec<Sample>,
}

#[derive(Deserialize)]
struct RawDayBucket {
    date: NaiveDate,
    samples: Vec<Sample>,
}

impl TryFrom<RawDayBucket> for DayBucket {
    type Error = WeatherDashError;

    fn try_from(raw: RawDayBucket) -> Result<Self> {
        Self::new(raw.date, raw.samples)
    }
}

impl DayBucket {
    /// Build a bucket from samples already known to share `date`
    pub fn new(date: NaiveDate, samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(WeatherDashError::validation(format!(
                "day bucket for {date} has no samples"
            )));
        }
        if samples.windows(2).any(|w| w[1].timestamp < w[0].timestamp) {
            return Err(WeatherDashError::validation(format!(
                "day bucket for {date} is not in ascending time order"
            )));
        }
        Ok(Self { date, samples })
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// First sample of the day
    #[must_use]
    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; present for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Group time-ordered samples by their calendar date in `tz`.
///
/// Buckets appear in order of first appearance and samples keep their input
/// order; nothing is re-sorted. At most `max_days` buckets are kept, earliest
/// first. Empty input yields no buckets.
pub fn group_by_day<Tz: TimeZone>(samples: &[Sample], tz: &Tz, max_days: usize) -> Vec<DayBucket> {
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut days: HashMap<NaiveDate, Vec<Sample>> = HashMap::new();

    for sample in samples {
        let date = sample.timestamp.with_timezone(tz).date_naive();
        days.entry(date)
            .or_insert_with(|| {
                order.push(date);
                Vec::new()
            })
            .push(sample.clone());
    }

    order
        .into_iter()
        .take(max_days)
        .filter_map(|date| {
            days.remove(&date)
                .map(|samples| DayBucket { date, samples })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, FixedOffset, Utc};

    fn three_hourly(start: DateTime<Utc>, count: usize) -> Vec<Sample> {
        (0..count)
            .map(|i| Sample::new(start + Duration::hours(3 * i as i64), i as f64))
            .collect()
    }

    fn start() -> DateTime<Utc> {
        "2024-03-10T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_empty_input_yields_no_buckets() {
        assert!(group_by_day(&[], &Utc, MAX_FORECAST_DAYS).is_empty());
    }

    #[test]
    fn test_five_day_forecast_covers_every_sample_once() {
        let samples = three_hourly(start(), 40);
        let buckets = group_by_day(&samples, &Utc, MAX_FORECAST_DAYS);

        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| b.len() == 8));

        let flattened: Vec<&Sample> = buckets.iter().flat_map(|b| b.samples()).collect();
        assert_eq!(flattened.len(), samples.len());
        for (grouped, original) in flattened.iter().zip(&samples) {
            assert_eq!(*grouped, original);
        }
    }

    #[test]
    fn test_buckets_are_disjoint_and_keep_order() {
        let samples = three_hourly(start() + Duration::hours(15), 20);
        let buckets = group_by_day(&samples, &Utc, MAX_FORECAST_DAYS);

        for pair in buckets.windows(2) {
            assert!(pair[0].date() < pair[1].date());
        }
        for bucket in &buckets {
            assert!(bucket.samples().iter().all(|s| s.timestamp.date_naive() == bucket.date()));
            assert!(bucket.samples().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        }
        // 15:00 and 18:00 and 21:00 on the first day
        assert_eq!(buckets[0].len(), 3);
    }

    #[test]
    fn test_caps_at_seven_days() {
        let samples = three_hourly(start(), 8 * 10);
        let buckets = group_by_day(&samples, &Utc, MAX_FORECAST_DAYS);

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].date(), start().date_naive());
        assert_eq!(buckets[6].date(), (start() + Duration::days(6)).date_naive());
    }

    #[test]
    fn test_local_offset_moves_day_boundary() {
        // 22:00 UTC is already the next day at UTC+3
        let late = Sample::new("2024-03-10T22:00:00Z".parse().unwrap(), 10.0);
        let next = Sample::new("2024-03-11T01:00:00Z".parse().unwrap(), 11.0);
        let samples = vec![late, next];

        let utc_buckets = group_by_day(&samples, &Utc, MAX_FORECAST_DAYS);
        assert_eq!(utc_buckets.len(), 2);

        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        let local_buckets = group_by_day(&samples, &plus_three, MAX_FORECAST_DAYS);
        assert_eq!(local_buckets.len(), 1);
        assert_eq!(local_buckets[0].date().to_string(), "2024-03-11");
    }

    #[test]
    fn test_bucket_rejects_empty_and_unordered() {
        let date = start().date_naive();
        assert!(DayBucket::new(date, Vec::new()).is_err());

        let mut samples = three_hourly(start(), 2);
        samples.reverse();
        assert!(DayBucket::new(date, samples).is_err());

        let ok = DayBucket::new(date, three_hourly(start(), 2)).unwrap();
        assert_eq!(ok.first().map(|s| s.temperature), Some(0.0));
        assert!(!ok.is_empty());
    }

    #[test]
    fn test_deserialize_validates_samples() {
        let empty = serde_json::from_str::<DayBucket>(r#"{"date":"2024-01-01","samples":[]}"#);
        assert!(empty.is_err());
        assert!(serde_json::from_str::<DayBucket>(r#"{"samples":[]}"#).is_err());

        let mut samples = three_hourly(start(), 2);
        samples.reverse();
        let unordered = serde_json::json!({ "date": "2024-03-10", "samples": samples });
        assert!(serde_json::from_value::<DayBucket>(unordered).is_err());

        let bucket = DayBucket::new(start().date_naive(), three_hourly(start(), 3)).unwrap();
        let json = serde_json::to_string(&bucket).unwrap();
        assert_eq!(serde_json::from_str::<DayBucket>(&json).unwrap(), bucket);
    }
}
