//! `WeatherDash` - weather dashboard engine
//!
//! This library turns current conditions and a multi-day forecast into the
//! structures a dashboard displays: day buckets and their aggregates,
//! threshold alerts, chart statistics and a recent-search history.

pub mod analysis;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod provider;
pub mod storage;

// Re-export core types for public API
pub use analysis::{
    Alert, AlertCategory, AlertEvaluator, AlertSeverity, AlertThresholds, DayAggregate,
    DayBucket, compass_direction, dew_point, group_by_day,
};
pub use config::DashboardConfig;
pub use dashboard::{DashboardService, DashboardState, View, WeatherReport};
pub use error::{GeolocationError, WeatherDashError};
pub use history::{HistoryEntry, SearchHistory};
pub use models::{Coordinates, Location, Sample, TemperatureUnit, WeatherCondition};
pub use provider::{GeocoderChain, OpenWeatherClient, ReverseGeocoder, WeatherProvider};
pub use storage::PreferenceStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherDashError>;
