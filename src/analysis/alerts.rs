//! Threshold-based weather alerts
//!
//! Every rule tests an existential predicate over the whole sample sequence
//! (current reading followed by the forecast). Rules are independent, so
//! several alerts can be active at once; output follows rule order, not
//! severity.

use crate::models::{Sample, WeatherCondition};
use crate::{Result, WeatherDashError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;

/// How serious an active alert is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    #[must_use]
    pub fn risk_label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Moderate Risk",
            Self::High => "High Risk",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertSeverity::Low => write!(f, "low"),
            AlertSeverity::Medium => write!(f, "medium"),
            AlertSeverity::High => write!(f, "high"),
        }
    }
}

/// Kind of hazard an alert reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    ExtremeTemperature,
    HeavyRainfall,
    HighWind,
    Thunderstorm,
    HeavySnowfall,
    LowVisibility,
}

impl AlertCategory {
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::ExtremeTemperature => "🌡️",
            Self::HeavyRainfall => "🌧️",
            Self::HighWind => "💨",
            Self::Thunderstorm => "⛈️",
            Self::HeavySnowfall => "❄️",
            Self::LowVisibility => "🌫️",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertCategory::ExtremeTemperature => "Extreme temperature",
            AlertCategory::HeavyRainfall => "Heavy rainfall",
            AlertCategory::HighWind => "High wind",
            AlertCategory::Thunderstorm => "Thunderstorm",
            AlertCategory::HeavySnowfall => "Heavy snowfall",
            AlertCategory::LowVisibility => "Low visibility",
        };
        f.write_str(name)
    }
}

/// An active warning derived from the samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub category: AlertCategory,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    /// Recommended actions, in display order
    pub remediation: Vec<String>,
}

/// Trigger levels for every rule. Comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Temperatures above this (°C) are extreme
    #[serde(default = "default_extreme_heat")]
    pub extreme_heat_c: f64,
    /// Temperatures below this (°C) are extreme
    #[serde(default = "default_extreme_cold")]
    pub extreme_cold_c: f64,
    #[serde(default = "default_heavy_rain")]
    pub heavy_rain_1h_mm: f64,
    #[serde(default = "default_heavy_rain")]
    pub heavy_rain_3h_mm: f64,
    /// Wind speed (m/s) above this is high
    #[serde(default = "default_high_wind")]
    pub high_wind_ms: f64,
    #[serde(default = "default_heavy_snow_1h")]
    pub heavy_snow_1h_mm: f64,
    #[serde(default = "default_heavy_snow_3h")]
    pub heavy_snow_3h_mm: f64,
    /// Visibility (m) below this is low
    #[serde(default = "default_low_visibility")]
    pub low_visibility_m: f64,
}

fn default_extreme_heat() -> f64 {
    35.0
}

fn default_extreme_cold() -> f64 {
    -10.0
}

fn default_heavy_rain() -> f64 {
    10.0
}

fn default_high_wind() -> f64 {
    8.0
}

fn default_heavy_snow_1h() -> f64 {
    2.0
}

fn default_heavy_snow_3h() -> f64 {
    5.0
}

fn default_low_visibility() -> f64 {
    2000.0
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            extreme_heat_c: default_extreme_heat(),
            extreme_cold_c: default_extreme_cold(),
            heavy_rain_1h_mm: default_heavy_rain(),
            heavy_rain_3h_mm: default_heavy_rain(),
            high_wind_ms: default_high_wind(),
            heavy_snow_1h_mm: default_heavy_snow_1h(),
            heavy_snow_3h_mm: default_heavy_snow_3h(),
            low_visibility_m: default_low_visibility(),
        }
    }
}

impl AlertThresholds {
    /// Reject thresholds that would make rules meaningless
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.extreme_heat_c,
            self.extreme_cold_c,
            self.heavy_rain_1h_mm,
            self.heavy_rain_3h_mm,
            self.high_wind_ms,
            self.heavy_snow_1h_mm,
            self.heavy_snow_3h_mm,
            self.low_visibility_m,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(WeatherDashError::validation("alert thresholds must be finite"));
        }
        if self.extreme_cold_c >= self.extreme_heat_c {
            return Err(WeatherDashError::validation(
                "extreme cold threshold must be below the extreme heat threshold",
            ));
        }
        if values[2..].iter().any(|v| *v < 0.0) {
            return Err(WeatherDashError::validation(
                "volume, wind and visibility thresholds cannot be negative",
            ));
        }
        Ok(())
    }
}

struct AlertRule {
    category: AlertCategory,
    severity: AlertSeverity,
    title: &'static str,
    message: &'static str,
    remediation: [&'static str; 3],
    triggered_by: fn(&Sample, &AlertThresholds) -> bool,
}

impl AlertRule {
    fn to_alert(&self) -> Alert {
        Alert {
            category: self.category,
            severity: self.severity,
            title: self.title.to_string(),
            message: self.message.to_string(),
            remediation: self.remediation.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Rules in output order
static RULES: [AlertRule; 6] = [
    AlertRule {
        category: AlertCategory::ExtremeTemperature,
        severity: AlertSeverity::High,
        title: "Extreme Temperature",
        message: "Temperatures are outside normal ranges. Take precautions.",
        remediation: [
            "Stay hydrated and avoid prolonged exposure",
            "Wear appropriate clothing",
            "Check on vulnerable individuals",
        ],
        triggered_by: |s, t| s.temperature > t.extreme_heat_c || s.temperature < t.extreme_cold_c,
    },
    AlertRule {
        category: AlertCategory::HeavyRainfall,
        severity: AlertSeverity::Medium,
        title: "Heavy Rainfall",
        message: "Significant rainfall expected. Flooding possible.",
        remediation: [
            "Avoid low-lying areas",
            "Use caution while driving",
            "Have umbrella and waterproof gear ready",
        ],
        triggered_by: |s, t| {
            s.condition == WeatherCondition::Rain
                && s.rain.exceeds(t.heavy_rain_1h_mm, t.heavy_rain_3h_mm)
        },
    },
    AlertRule {
        category: AlertCategory::HighWind,
        severity: AlertSeverity::Medium,
        title: "High Wind Conditions",
        message: "Strong winds expected. Secure loose objects.",
        remediation: [
            "Secure outdoor furniture",
            "Be cautious when driving",
            "Watch for falling branches",
        ],
        triggered_by: |s, t| s.wind_speed > t.high_wind_ms,
    },
    AlertRule {
        category: AlertCategory::Thunderstorm,
        severity: AlertSeverity::High,
        title: "Thunderstorm Warning",
        message: "Thunderstorms in the area. Lightning risk present.",
        remediation: [
            "Seek indoor shelter",
            "Avoid open fields and water",
            "Unplug sensitive electronics",
        ],
        triggered_by: |s, _| s.condition == WeatherCondition::Thunderstorm,
    },
    AlertRule {
        category: AlertCategory::HeavySnowfall,
        severity: AlertSeverity::Medium,
        title: "Snowfall Alert",
        message: "Significant snowfall expected. Travel may be affected.",
        remediation: [
            "Allow extra travel time",
            "Check road conditions",
            "Dress in warm layers",
        ],
        triggered_by: |s, t| {
            s.condition == WeatherCondition::Snow
                && s.snow.exceeds(t.heavy_snow_1h_mm, t.heavy_snow_3h_mm)
        },
    },
    AlertRule {
        category: AlertCategory::LowVisibility,
        severity: AlertSeverity::Low,
        title: "Low Visibility",
        message: "Reduced visibility conditions.",
        remediation: [
            "Use low beam headlights",
            "Reduce driving speed",
            "Increase following distance",
        ],
        triggered_by: |s, t| s.visibility < t.low_visibility_m,
    },
];

/// Stateless rule scan producing the active alert list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertEvaluator {
    thresholds: AlertThresholds,
}

impl AlertEvaluator {
    #[must_use]
    pub fn new(thresholds: AlertThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Alerts active anywhere in `samples`. Empty input yields no alerts.
    #[must_use]
    pub fn evaluate(&self, samples: &[Sample]) -> Vec<Alert> {
        self.scan(|| samples.iter())
    }

    /// Alerts over the current reading followed by the forecast
    #[must_use]
    pub fn evaluate_with_current(&self, current: &Sample, forecast: &[Sample]) -> Vec<Alert> {
        self.scan(|| iter::once(current).chain(forecast))
    }

    fn scan<'a, F, I>(&self, samples: F) -> Vec<Alert>
    where
        F: Fn() -> I,
        I: Iterator<Item = &'a Sample>,
    {
        let alerts: Vec<Alert> = RULES
            .iter()
            .filter(|rule| samples().any(|s| (rule.triggered_by)(s, &self.thresholds)))
            .map(AlertRule::to_alert)
            .collect();

        if !alerts.is_empty() {
            tracing::debug!(
                count = alerts.len(),
                categories = ?alerts.iter().map(|a| a.category).collect::<Vec<_>>(),
                "Weather alerts active"
            );
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrecipitationVolume;
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn reading(temp: f64, wind: f64, visibility: f64, condition: WeatherCondition) -> Sample {
        Sample {
            wind_speed: wind,
            visibility,
            condition,
            ..Sample::new(Utc::now(), temp)
        }
    }

    fn categories(alerts: &[Alert]) -> Vec<AlertCategory> {
        alerts.iter().map(|a| a.category).collect()
    }

    #[test]
    fn test_no_samples_no_alerts() {
        assert!(AlertEvaluator::default().evaluate(&[]).is_empty());
    }

    #[test]
    fn test_calm_day_has_no_alerts() {
        let samples = [reading(20.0, 3.0, 10_000.0, WeatherCondition::Clouds)];
        assert!(AlertEvaluator::default().evaluate(&samples).is_empty());
    }

    #[test]
    fn test_heat_produces_single_high_alert() {
        let samples = [reading(36.0, 2.0, 9000.0, WeatherCondition::Clear)];
        let alerts = AlertEvaluator::default().evaluate(&samples);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].category, AlertCategory::ExtremeTemperature);
        assert_eq!(alerts[0].category.to_string(), "Extreme temperature");
        assert_eq!(alerts[0].severity, AlertSeverity::High);
        assert_eq!(alerts[0].remediation.len(), 3);
    }

    #[test]
    fn test_co_occurring_alerts_follow_rule_order() {
        // wind sample first, cold sample second: output order is still rule order
        let samples = [
            reading(5.0, 9.0, 10_000.0, WeatherCondition::Clear),
            reading(-15.0, 1.0, 10_000.0, WeatherCondition::Clear),
        ];
        let alerts = AlertEvaluator::default().evaluate(&samples);
        assert_eq!(
            categories(&alerts),
            vec![AlertCategory::ExtremeTemperature, AlertCategory::HighWind]
        );
    }

    #[rstest]
    #[case(35.0, false)]
    #[case(35.1, true)]
    #[case(-10.0, false)]
    #[case(-10.5, true)]
    fn test_temperature_thresholds_are_strict(#[case] temp: f64, #[case] alert: bool) {
        let samples = [reading(temp, 0.0, 10_000.0, WeatherCondition::Clear)];
        assert_eq!(!AlertEvaluator::default().evaluate(&samples).is_empty(), alert);
    }

    #[rstest]
    #[case(WeatherCondition::Rain, Some(10.5), None, true)]
    #[case(WeatherCondition::Rain, None, Some(11.0), true)]
    #[case(WeatherCondition::Rain, Some(10.0), Some(10.0), false)]
    #[case(WeatherCondition::Drizzle, Some(20.0), None, false)]
    fn test_heavy_rain(
        #[case] condition: WeatherCondition,
        #[case] one_hour: Option<f64>,
        #[case] three_hours: Option<f64>,
        #[case] expected: bool,
    ) {
        let sample = Sample {
            rain: PrecipitationVolume {
                one_hour,
                three_hours,
            },
            ..reading(12.0, 1.0, 10_000.0, condition)
        };
        let alerts = AlertEvaluator::default().evaluate(&[sample]);
        assert_eq!(categories(&alerts).contains(&AlertCategory::HeavyRainfall), expected);
    }

    #[rstest]
    #[case(Some(2.5), None, true)]
    #[case(Some(2.0), None, false)]
    #[case(None, Some(5.5), true)]
    #[case(None, Some(4.0), false)]
    fn test_heavy_snow(
        #[case] one_hour: Option<f64>,
        #[case] three_hours: Option<f64>,
        #[case] expected: bool,
    ) {
        let sample = Sample {
            snow: PrecipitationVolume {
                one_hour,
                three_hours,
            },
            ..reading(-2.0, 1.0, 10_000.0, WeatherCondition::Snow)
        };
        let alerts = AlertEvaluator::default().evaluate(&[sample]);
        assert_eq!(categories(&alerts).contains(&AlertCategory::HeavySnowfall), expected);
    }

    #[test]
    fn test_all_rules_fire_in_declared_order() {
        let storm = reading(40.0, 12.0, 500.0, WeatherCondition::Thunderstorm);
        let rain = Sample {
            rain: PrecipitationVolume {
                one_hour: None,
                three_hours: Some(15.0),
            },
            ..reading(20.0, 0.0, 10_000.0, WeatherCondition::Rain)
        };
        let snow = Sample {
            snow: PrecipitationVolume {
                one_hour: Some(3.0),
                three_hours: None,
            },
            ..reading(0.0, 0.0, 10_000.0, WeatherCondition::Snow)
        };

        let alerts = AlertEvaluator::default().evaluate(&[snow, storm, rain]);
        assert_eq!(
            categories(&alerts),
            vec![
                AlertCategory::ExtremeTemperature,
                AlertCategory::HeavyRainfall,
                AlertCategory::HighWind,
                AlertCategory::Thunderstorm,
                AlertCategory::HeavySnowfall,
                AlertCategory::LowVisibility,
            ]
        );
        assert_eq!(alerts[5].severity, AlertSeverity::Low);
    }

    #[test]
    fn test_current_reading_is_included() {
        let current = reading(20.0, 0.0, 1500.0, WeatherCondition::Mist);
        let later = Sample {
            timestamp: current.timestamp + Duration::hours(3),
            ..reading(20.0, 0.0, 10_000.0, WeatherCondition::Clear)
        };
        let evaluator = AlertEvaluator::default();

        assert!(evaluator.evaluate(std::slice::from_ref(&later)).is_empty());
        let alerts = evaluator.evaluate_with_current(&current, &[later]);
        assert_eq!(categories(&alerts), vec![AlertCategory::LowVisibility]);
    }

    #[test]
    fn test_identical_input_gives_equal_output() {
        let samples = [reading(-20.0, 10.0, 100.0, WeatherCondition::Fog)];
        let evaluator = AlertEvaluator::default();
        assert_eq!(evaluator.evaluate(&samples), evaluator.evaluate(&samples));
    }

    #[test]
    fn test_custom_thresholds() {
        let evaluator = AlertEvaluator::new(AlertThresholds {
            high_wind_ms: 15.0,
            ..AlertThresholds::default()
        });
        let samples = [reading(20.0, 9.0, 10_000.0, WeatherCondition::Clear)];
        assert!(evaluator.evaluate(&samples).is_empty());
    }

    #[test]
    fn test_threshold_validation() {
        assert!(AlertThresholds::default().validate().is_ok());

        let inverted = AlertThresholds {
            extreme_cold_c: 40.0,
            ..AlertThresholds::default()
        };
        assert!(inverted.validate().is_err());

        let negative = AlertThresholds {
            low_visibility_m: -1.0,
            ..AlertThresholds::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_risk_labels() {
        assert_eq!(AlertSeverity::Medium.risk_label(), "Moderate Risk");
        assert!(AlertSeverity::High > AlertSeverity::Low);
    }
}
