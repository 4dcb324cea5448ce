//! Recent search history
//!
//! A short recency list keyed by case-insensitive city name. Persisting it is
//! the preference store's job; this type only manipulates the list.

use crate::models::{TemperatureUnit, WeatherCondition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries kept unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// One remembered search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub city: String,
    pub captured_at: DateTime<Utc>,
    /// Temperature at search time, rounded, in Celsius
    pub temperature: i64,
    pub condition: WeatherCondition,
}

impl HistoryEntry {
    /// Temperature in `unit`, e.g. `68°F`
    #[must_use]
    pub fn display_temperature(&self, unit: TemperatureUnit) -> String {
        unit.format(self.temperature as f64)
    }

    fn is_city(&self, city: &str) -> bool {
        self.city.to_lowercase() == city.to_lowercase()
    }
}

/// Bounded, deduplicating recency list, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistory {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SearchHistory {
    /// Empty history holding at most `capacity` entries (at least one)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Restore persisted entries, trimming to `capacity`
    #[must_use]
    pub fn from_entries(entries: Vec<HistoryEntry>, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        history.entries = entries;
        history.entries.truncate(history.capacity);
        history
    }

    /// Remember a search made now
    pub fn record(&mut self, city: &str, captured_temp: f64, condition: WeatherCondition) {
        self.record_at(city, captured_temp, condition, Utc::now());
    }

    /// Remember a search made at `captured_at`.
    ///
    /// Any entry for the same city (ignoring case) is dropped and the new one
    /// goes to the front; entries past capacity fall off the end.
    pub fn record_at(
        &mut self,
        city: &str,
        captured_temp: f64,
        condition: WeatherCondition,
        captured_at: DateTime<Utc>,
    ) {
        self.entries.retain(|entry| !entry.is_city(city));
        self.entries.insert(
            0,
            HistoryEntry {
                city: city.to_string(),
                captured_at,
                temperature: captured_temp.round() as i64,
                condition,
            },
        );
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
