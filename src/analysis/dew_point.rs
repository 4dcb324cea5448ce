//! Dew point estimation using the Magnus approximation

use crate::{Result, WeatherDashError};

const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Dew point in Celsius for `temperature` (Celsius) and relative `humidity` (percent).
///
/// Humidity must lie in `(0, 100]`; the logarithm in the formula is undefined at
/// zero, so values outside that range are rejected instead of producing NaN.
pub fn dew_point(temperature: f64, humidity: f64) -> Result<f64> {
    if !temperature.is_finite() || !humidity.is_finite() {
        return Err(WeatherDashError::validation(
            "dew point needs finite temperature and humidity",
        ));
    }
    if humidity <= 0.0 || humidity > 100.0 {
        return Err(WeatherDashError::validation(format!(
            "humidity {humidity} is outside (0, 100]"
        )));
    }

    let alpha = (MAGNUS_A * temperature) / (MAGNUS_B + temperature) + (humidity / 100.0).ln();
    Ok((MAGNUS_B * alpha) / (MAGNUS_A - alpha))
}

/// Dew point with humidity clamped into `[1, 100]`, for display paths that
/// must always show a value. Returns `None` only for a non-finite temperature.
#[must_use]
pub fn dew_point_clamped(temperature: f64, humidity: f64) -> Option<f64> {
    let humidity = if humidity.is_finite() {
        humidity.clamp(1.0, 100.0)
    } else {
        100.0
    };
    dew_point(temperature, humidity).ok()
}
