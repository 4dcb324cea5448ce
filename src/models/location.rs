//! Location model for geographic coordinates and place names

use crate::{Result, WeatherDashError};
use serde::{Deserialize, Serialize};

/// A validated latitude/longitude pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting values off the globe
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherDashError::validation(format!(
                "coordinates ({latitude}, {longitude}) are outside lat -90..90 / lon -180..180"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Coordinates rendered as a place name of last resort
    #[must_use]
    pub fn fallback_name(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Where a report applies
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: None,
            coordinates: None,
        }
    }

    /// Name with the country suffix when known, e.g. `Paris, FR`
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.country {
            Some(country) if !country.is_empty() => format!("{}, {country}", self.name),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_name_uses_four_decimals() {
        let coords = Coordinates::new(46.818_234, 8.227_456).unwrap();
        assert_eq!(coords.fallback_name(), "46.8182, 8.2275");
    }

    #[test]
    fn test_coordinates_out_of_range() {
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_display_name() {
        let mut location = Location::new("Paris");
        assert_eq!(location.display_name(), "Paris");
        location.country = Some("FR".to_string());
        assert_eq!(location.display_name(), "Paris, FR");
    }
}
