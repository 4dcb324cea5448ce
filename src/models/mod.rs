//! Data models for the WeatherDash engine
//!
//! This module contains the core domain models organized by concern:
//! - Sample: validated weather readings and condition categories
//! - Units: temperature unit preference and conversion
//! - Location: coordinates and place names

pub mod location;
pub mod sample;
pub mod units;

// Re-export all public types for convenient access
pub use location::{Coordinates, Location};
pub use sample::{PrecipitationVolume, Sample, WeatherCondition};
pub use units::{TemperatureUnit, convert_temperature};
