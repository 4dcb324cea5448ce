//! Plain-language insights for the current-conditions card
//!
//! Temperature bands are in Celsius, on the reading rounded to a whole degree,
//! whatever unit the dashboard displays.

use crate::models::{Sample, WeatherCondition};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to wear for the current reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClothingAdvice {
    /// Raining, regardless of temperature
    RainGear,
    /// Below 0°C
    WinterCoat,
    /// 0 - 10°C
    WarmLayers,
    /// 10 - 20°C
    LightJacket,
    /// 20 - 30°C
    TShirt,
    /// 30°C and above
    Breathable,
}

impl ClothingAdvice {
    #[must_use]
    pub fn recommend(temperature_c: f64, condition: &WeatherCondition) -> Self {
        if *condition == WeatherCondition::Rain {
            return Self::RainGear;
        }
        match temperature_c.round() {
            t if t < 0.0 => Self::WinterCoat,
            t if t < 10.0 => Self::WarmLayers,
            t if t < 20.0 => Self::LightJacket,
            t if t < 30.0 => Self::TShirt,
            _ => Self::Breathable,
        }
    }
}

impl fmt::Display for ClothingAdvice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::RainGear => "Waterproof jacket and umbrella recommended",
            Self::WinterCoat => "Heavy winter coat, gloves, and hat",
            Self::WarmLayers => "Warm jacket and layers",
            Self::LightJacket => "Light jacket or sweater",
            Self::TShirt => "T-shirt and comfortable clothing",
            Self::Breathable => "Light, breathable clothing. Stay hydrated!",
        };
        f.write_str(text)
    }
}

/// Current temperature against the midpoint of the reported min and max
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureTrend {
    /// More than 2° above the midpoint
    Warmer,
    /// More than 2° below the midpoint
    Cooler,
    Typical,
}

impl TemperatureTrend {
    #[must_use]
    pub fn classify(temperature_c: f64, min_c: f64, max_c: f64) -> Self {
        let current = temperature_c.round();
        let midpoint = (min_c.round() + max_c.round()) / 2.0;
        if current > midpoint + 2.0 {
            Self::Warmer
        } else if current < midpoint - 2.0 {
            Self::Cooler
        } else {
            Self::Typical
        }
    }
}

impl fmt::Display for TemperatureTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Warmer => "Warmer than average for this time",
            Self::Cooler => "Cooler than average for this time",
            Self::Typical => "Typical temperatures for this season",
        };
        f.write_str(text)
    }
}

/// Wind strength as described on the current card.
///
/// Finer than the chart's [`super::WindCategory`]: 15 m/s and above is its own band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindStrength {
    /// Below 0.5 m/s
    Calm,
    /// 0.5 - 5 m/s
    LightBreeze,
    /// 5 - 10 m/s
    Moderate,
    /// 10 - 15 m/s
    Strong,
    /// 15 m/s and above
    VeryStrong,
}

impl WindStrength {
    #[must_use]
    pub fn classify(speed_ms: f64) -> Self {
        match speed_ms {
            s if s < 0.5 => Self::Calm,
            s if s < 5.0 => Self::LightBreeze,
            s if s < 10.0 => Self::Moderate,
            s if s < 15.0 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }
}

impl fmt::Display for WindStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Calm => "Calm conditions",
            Self::LightBreeze => "Light breeze",
            Self::Moderate => "Moderate wind",
            Self::Strong => "Strong wind",
            Self::VeryStrong => "Very strong wind, be cautious outdoors",
        };
        f.write_str(text)
    }
}

/// Visibility bands; every boundary belongs to the lower band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisibilityLevel {
    /// Above 10 km
    Excellent,
    /// Above 5 km
    Good,
    /// Above 2 km
    Moderate,
    Poor,
}

impl VisibilityLevel {
    #[must_use]
    pub fn classify(visibility_m: f64) -> Self {
        match visibility_m {
            v if v > 10_000.0 => Self::Excellent,
            v if v > 5_000.0 => Self::Good,
            v if v > 2_000.0 => Self::Moderate,
            _ => Self::Poor,
        }
    }
}

impl fmt::Display for VisibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Excellent => "Excellent visibility",
            Self::Good => "Good visibility",
            Self::Moderate => "Moderate visibility",
            Self::Poor => "Poor visibility, drive carefully",
        };
        f.write_str(text)
    }
}

/// The four insights shown under the current conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentInsights {
    pub clothing: ClothingAdvice,
    pub trend: TemperatureTrend,
    pub wind: WindStrength,
    pub visibility: VisibilityLevel,
}

impl CurrentInsights {
    #[must_use]
    pub fn from_sample(sample: &Sample) -> Self {
        Self {
            clothing: ClothingAdvice::recommend(sample.temperature, &sample.condition),
            trend: TemperatureTrend::classify(sample.temperature, sample.temp_min, sample.temp_max),
            wind: WindStrength::classify(sample.wind_speed),
            visibility: VisibilityLevel::classify(sample.visibility),
        }
    }
}
