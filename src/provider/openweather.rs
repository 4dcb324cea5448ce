//! OpenWeather client
//!
//! Fetches current conditions and the 3-hourly forecast from the OpenWeather
//! REST API and validates every reading before it leaves this module.

use super::{CurrentConditions, ForecastSeries, WeatherProvider, redact_api_key};
use crate::config::WeatherConfig;
use crate::models::{
    Coordinates, Location, PrecipitationVolume, Sample, WeatherCondition,
};
use crate::{Result, WeatherDashError};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = concat!("weatherdash/", env!("CARGO_PKG_VERSION"));

/// Reported when the provider omits visibility, its documented maximum
const MAX_VISIBILITY_M: f64 = 10_000.0;

/// Message used when an error body carries none
const DEFAULT_API_ERROR: &str = "API request failed";

#[derive(Debug, Clone, Deserialize)]
pub struct CoordPayload {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionPayload {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainPayload {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindPayload {
    pub speed: f64,
    pub deg: Option<f64>,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloudsPayload {
    #[serde(default)]
    pub all: f64,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct VolumePayload {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

impl From<VolumePayload> for PrecipitationVolume {
    fn from(volume: VolumePayload) -> Self {
        Self {
            one_hour: volume.one_hour,
            three_hours: volume.three_hours,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SysPayload {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// Body of `/weather`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPayload {
    pub coord: Option<CoordPayload>,
    #[serde(default)]
    pub weather: Vec<ConditionPayload>,
    pub main: MainPayload,
    pub visibility: Option<f64>,
    pub wind: WindPayload,
    #[serde(default)]
    pub clouds: CloudsPayload,
    pub rain: Option<VolumePayload>,
    pub snow: Option<VolumePayload>,
    pub dt: i64,
    #[serde(default)]
    pub sys: SysPayload,
    /// Shift from UTC in seconds
    #[serde(default)]
    pub timezone: i32,
    #[serde(default)]
    pub name: String,
}

/// One entry of the `/forecast` list
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastItemPayload {
    pub dt: i64,
    pub main: MainPayload,
    #[serde(default)]
    pub weather: Vec<ConditionPayload>,
    #[serde(default)]
    pub clouds: CloudsPayload,
    pub wind: WindPayload,
    pub visibility: Option<f64>,
    pub pop: Option<f64>,
    pub rain: Option<VolumePayload>,
    pub snow: Option<VolumePayload>,
    pub dt_txt: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityPayload {
    #[serde(default)]
    pub name: String,
    pub country: Option<String>,
    #[serde(default)]
    pub timezone: i32,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// Body of `/forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    #[serde(default)]
    pub list: Vec<ForecastItemPayload>,
    #[serde(default)]
    pub city: CityPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

struct Reading<'a> {
    dt: i64,
    main: &'a MainPayload,
    weather: &'a [ConditionPayload],
    clouds: &'a CloudsPayload,
    wind: &'a WindPayload,
    visibility: Option<f64>,
    pop: Option<f64>,
    rain: Option<VolumePayload>,
    snow: Option<VolumePayload>,
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| WeatherDashError::validation(format!("timestamp {seconds} is out of range")))
}

fn utc_offset(seconds: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(seconds)
        .ok_or_else(|| WeatherDashError::validation(format!("UTC offset {seconds}s is out of range")))
}

fn percentage(name: &str, value: f64) -> Result<u8> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(WeatherDashError::validation(format!(
            "{name} {value} is outside 0-100"
        )));
    }
    Ok(value.round() as u8)
}

impl Reading<'_> {
    fn into_sample(self) -> Result<Sample> {
        let condition = self
            .weather
            .first()
            .ok_or_else(|| WeatherDashError::validation("reading has no weather condition"))?;

        let sample = Sample {
            timestamp: timestamp(self.dt)?,
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            humidity: percentage("humidity", self.main.humidity)?,
            pressure: self.main.pressure,
            wind_speed: self.wind.speed,
            wind_gust: self.wind.gust,
            wind_direction: self.wind.deg,
            cloudiness: percentage("cloudiness", self.clouds.all)?,
            visibility: self.visibility.unwrap_or(MAX_VISIBILITY_M),
            precipitation_probability: self.pop,
            rain: self.rain.unwrap_or_default().into(),
            snow: self.snow.unwrap_or_default().into(),
            condition: WeatherCondition::from(condition.main.as_str()),
            description: condition.description.clone(),
        };
        sample.validate()?;
        Ok(sample)
    }
}

impl TryFrom<&ForecastItemPayload> for Sample {
    type Error = WeatherDashError;

    fn try_from(item: &ForecastItemPayload) -> Result<Self> {
        Reading {
            dt: item.dt,
            main: &item.main,
            weather: &item.weather,
            clouds: &item.clouds,
            wind: &item.wind,
            visibility: item.visibility,
            pop: item.pop,
            rain: item.rain,
            snow: item.snow,
        }
        .into_sample()
    }
}

impl TryFrom<&CurrentPayload> for CurrentConditions {
    type Error = WeatherDashError;

    fn try_from(payload: &CurrentPayload) -> Result<Self> {
        let sample = Reading {
            dt: payload.dt,
            main: &payload.main,
            weather: &payload.weather,
            clouds: &payload.clouds,
            wind: &payload.wind,
            visibility: payload.visibility,
            pop: None,
            rain: payload.rain,
            snow: payload.snow,
        }
        .into_sample()?;

        let coordinates = payload
            .coord
            .as_ref()
            .map(|c| Coordinates::new(c.lat, c.lon))
            .transpose()?;

        Ok(Self {
            location: Location {
                name: payload.name.clone(),
                country: payload.sys.country.clone(),
                coordinates,
            },
            sample,
            utc_offset: utc_offset(payload.timezone)?,
            sunrise: payload.sys.sunrise.map(timestamp).transpose()?,
            sunset: payload.sys.sunset.map(timestamp).transpose()?,
        })
    }
}

impl ForecastPayload {
    /// Validated samples, keeping at most `limit` from the front of the list
    pub fn into_series(self, limit: usize) -> Result<ForecastSeries> {
        let samples = self
            .list
            .iter()
            .take(limit)
            .map(Sample::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(ForecastSeries {
            samples,
            utc_offset: utc_offset(self.city.timezone)?,
        })
    }
}

/// HTTP client for the OpenWeather API
#[derive(Debug)]
pub struct OpenWeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
    samples_per_day: usize,
}

impl OpenWeatherClient {
    /// Create a client; fails without an API key
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                WeatherDashError::config(
                    "OpenWeather API key is not set. Add weather.api_key to config.toml or set WEATHERDASH_WEATHER__API_KEY.",
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherDashError::api(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            samples_per_day: config.samples_per_day,
        })
    }

    /// GET `endpoint?query` in metric units and decode the body
    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, query: &str) -> Result<T> {
        let start_time = Instant::now();
        debug!(endpoint, query, "OpenWeather request");

        let url = format!(
            "{}/{endpoint}?{query}&appid={}&units=metric",
            self.base_url, self.api_key
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| network_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| DEFAULT_API_ERROR.to_string());
            warn!(endpoint, %status, "OpenWeather request failed: {}", message);
            return Err(WeatherDashError::api(message));
        }

        let body = response.json::<T>().await.map_err(|e| {
            WeatherDashError::validation(format!(
                "unexpected {endpoint} payload: {}",
                e.without_url()
            ))
        })?;

        debug!(
            endpoint,
            "Response decoded in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );
        Ok(body)
    }

    async fn current(&self, query: &str) -> Result<CurrentConditions> {
        let payload: CurrentPayload = self.fetch("weather", query).await?;
        let current = CurrentConditions::try_from(&payload)?;
        info!(
            "Current conditions for {}: {:.1}°C, {}",
            current.location.display_name(),
            current.sample.temperature,
            current.sample.condition
        );
        Ok(current)
    }

    async fn forecast(&self, query: &str, days: u8) -> Result<ForecastSeries> {
        let payload: ForecastPayload = self.fetch("forecast", query).await?;
        let series = payload.into_series(usize::from(days) * self.samples_per_day)?;
        info!("Forecast with {} samples", series.samples.len());
        Ok(series)
    }
}

/// Transport failure without the request URL, which carries the key
fn network_error(endpoint: &str, e: reqwest_middleware::Error) -> WeatherDashError {
    let detail = match e {
        reqwest_middleware::Error::Reqwest(e) => e.without_url().to_string(),
        reqwest_middleware::Error::Middleware(e) => format!("{e:#}"),
    };
    let detail = redact_api_key(&detail);
    warn!(endpoint, "Network error: {}", detail);
    WeatherDashError::api(format!("Network error: {detail}"))
}

fn city_query(city: &str) -> String {
    format!("q={}", urlencoding::encode(city))
}

fn coordinates_query(coordinates: Coordinates) -> String {
    format!("lat={}&lon={}", coordinates.latitude, coordinates.longitude)
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current_by_city(&self, city: &str) -> Result<CurrentConditions> {
        self.current(&city_query(city)).await
    }

    #[instrument(skip(self))]
    async fn forecast_by_city(&self, city: &str, days: u8) -> Result<ForecastSeries> {
        self.forecast(&city_query(city), days).await
    }

    #[instrument(skip(self), fields(lat = %coordinates.latitude, lon = %coordinates.longitude))]
    async fn current_by_coordinates(&self, coordinates: Coordinates) -> Result<CurrentConditions> {
        self.current(&coordinates_query(coordinates)).await
    }

    #[instrument(skip(self), fields(lat = %coordinates.latitude, lon = %coordinates.longitude))]
    async fn forecast_by_coordinates(
        &self,
        coordinates: Coordinates,
        days: u8,
    ) -> Result<ForecastSeries> {
        self.forecast(&coordinates_query(coordinates), days).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_json() -> serde_json::Value {
        serde_json::json!({
            "coord": { "lon": 2.35, "lat": 48.85 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "main": {
                "temp": 21.4, "feels_like": 20.9, "temp_min": 19.0, "temp_max": 23.1,
                "pressure": 1016, "humidity": 48
            },
            "wind": { "speed": 3.6, "deg": 250 },
            "clouds": { "all": 0 },
            "dt": 1_717_243_200,
            "sys": { "country": "FR", "sunrise": 1_717_213_000, "sunset": 1_717_270_000 },
            "timezone": 7200,
            "name": "Paris"
        })
    }

    #[test]
    fn test_current_payload_conversion() {
        let payload: CurrentPayload = serde_json::from_value(current_json()).unwrap();
        let current = CurrentConditions::try_from(&payload).unwrap();

        assert_eq!(current.location.display_name(), "Paris, FR");
        assert_eq!(current.sample.humidity, 48);
        assert_eq!(current.sample.condition, WeatherCondition::Clear);
        assert_eq!(current.sample.wind_direction, Some(250.0));
        assert_eq!(current.sample.visibility, MAX_VISIBILITY_M);
        assert_eq!(current.utc_offset.local_minus_utc(), 7200);
        assert!(current.sunrise.is_some());
    }

    #[test]
    fn test_missing_condition_is_rejected() {
        let mut json = current_json();
        json["weather"] = serde_json::json!([]);
        let payload: CurrentPayload = serde_json::from_value(json).unwrap();

        let err = CurrentConditions::try_from(&payload).unwrap_err();
        assert!(matches!(err, WeatherDashError::Validation { .. }));
    }

    #[test]
    fn test_humidity_out_of_range_is_rejected() {
        let mut json = current_json();
        json["main"]["humidity"] = serde_json::json!(140);
        let payload: CurrentPayload = serde_json::from_value(json).unwrap();
        assert!(CurrentConditions::try_from(&payload).is_err());
    }

    #[test]
    fn test_forecast_is_truncated() {
        let item = serde_json::json!({
            "dt": 1_717_243_200,
            "main": {
                "temp": 12.0, "feels_like": 11.0, "temp_min": 10.0, "temp_max": 13.0,
                "pressure": 1009, "humidity": 81
            },
            "weather": [{ "main": "Rain", "description": "light rain" }],
            "clouds": { "all": 90 },
            "wind": { "speed": 5.1, "deg": 180, "gust": 9.2 },
            "visibility": 8000,
            "pop": 0.6,
            "rain": { "3h": 1.2 },
            "dt_txt": "2024-06-01 12:00:00"
        });
        let list = vec![item; 12];
        let payload: ForecastPayload = serde_json::from_value(serde_json::json!({
            "list": list,
            "city": { "name": "Bergen", "country": "NO", "timezone": 3600 }
        }))
        .unwrap();

        let series = payload.into_series(8).unwrap();
        assert_eq!(series.samples.len(), 8);
        assert_eq!(series.samples[0].rain.three_hours, Some(1.2));
        assert_eq!(series.samples[0].precipitation_probability, Some(0.6));
        assert_eq!(series.utc_offset.local_minus_utc(), 3600);
    }

    #[test]
    fn test_client_requires_api_key() {
        let err = OpenWeatherClient::new(&WeatherConfig::default()).unwrap_err();
        assert!(matches!(err, WeatherDashError::Config { .. }));
    }

    #[test]
    fn test_city_query_is_encoded() {
        assert_eq!(city_query("São Paulo"), "q=S%C3%A3o%20Paulo");
    }
}
