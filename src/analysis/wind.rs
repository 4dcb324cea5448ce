//! Wind direction and speed classification

use serde::{Deserialize, Serialize};
use std::fmt;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Map a bearing in degrees to one of the 16 compass points.
///
/// Any real bearing is accepted: values at or above 360 and negative values
/// wrap around. Non-finite input maps to `N`.
#[must_use]
pub fn compass_direction(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return COMPASS_POINTS[0];
    }
    let sector = (degrees / 22.5).round().rem_euclid(16.0) as usize;
    COMPASS_POINTS[sector % COMPASS_POINTS.len()]
}

/// Wind speed categories used for chart reference bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindCategory {
    /// Below 0.5 m/s
    Calm,
    /// 0.5 - 5 m/s
    LightBreeze,
    /// 5 - 10 m/s
    Moderate,
    /// 10 m/s and above
    Strong,
}

impl WindCategory {
    #[must_use]
    pub fn classify(speed_ms: f64) -> Self {
        match speed_ms {
            s if s < 0.5 => Self::Calm,
            s if s < 5.0 => Self::LightBreeze,
            s if s < 10.0 => Self::Moderate,
            _ => Self::Strong,
        }
    }
}

impl fmt::Display for WindCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindCategory::Calm => write!(f, "Calm"),
            WindCategory::LightBreeze => write!(f, "Light Breeze"),
            WindCategory::Moderate => write!(f, "Moderate"),
            WindCategory::Strong => write!(f, "Strong"),
        }
    }
}
