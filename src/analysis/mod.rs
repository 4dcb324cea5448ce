//! Forecast analysis
//!
//! Pure, synchronous derivations over validated samples:
//! - Day grouping and daily aggregates
//! - Threshold alerts
//! - Dew point, compass direction and chart statistics
//! - Current-conditions insights

pub mod aggregate;
pub mod alerts;
pub mod dew_point;
pub mod grouping;
pub mod insights;
pub mod series;
pub mod wind;

// Re-export commonly used types from submodules
pub use aggregate::{DayAggregate, dominant_condition};
pub use alerts::{Alert, AlertCategory, AlertEvaluator, AlertSeverity, AlertThresholds};
pub use dew_point::{dew_point, dew_point_clamped};
pub use grouping::{DayBucket, MAX_FORECAST_DAYS, group_by_day};
pub use insights::{
    ClothingAdvice, CurrentInsights, TemperatureTrend, VisibilityLevel, WindStrength,
};
pub use series::{ChartSummary, HumidityLevel, SeriesStats};
pub use wind::{WindCategory, compass_direction};
