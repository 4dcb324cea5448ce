//! Reverse geocoding with fallbacks
//!
//! Nominatim is asked first. If it fails, the OpenWeather geo API is asked.
//! If that fails too the coordinates themselves become the name.

use super::{ReverseGeocoder, redact_api_key};
use crate::config::{GeocodingConfig, WeatherConfig};
use crate::models::Coordinates;
use crate::{Result, WeatherDashError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const USER_AGENT: &str = concat!("weatherdash/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl NominatimAddress {
    fn place_name(self) -> Option<String> {
        let locality = [self.city, self.town, self.village, self.county]
            .into_iter()
            .flatten()
            .find(|part| !part.trim().is_empty());
        join_parts([locality, self.state, self.country])
    }
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    name: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl GeoPlace {
    fn place_name(self) -> Option<String> {
        join_parts([self.name, self.state, self.country])
    }
}

/// Non-empty parts joined with ", ", or `None` when nothing is left
fn join_parts(parts: [Option<String>; 3]) -> Option<String> {
    let parts: Vec<String> = parts
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Reverse geocoder that never fails
#[derive(Debug, Clone)]
pub struct GeocoderChain {
    client: reqwest::Client,
    nominatim_url: String,
    fallback_url: String,
    api_key: Option<String>,
}

impl GeocoderChain {
    pub fn new(geocoding: &GeocodingConfig, weather: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(weather.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherDashError::api(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            nominatim_url: geocoding.nominatim_url.trim_end_matches('/').to_string(),
            fallback_url: geocoding.fallback_url.trim_end_matches('/').to_string(),
            api_key: weather.api_key.clone().filter(|key| !key.trim().is_empty()),
        })
    }

    /// `Ok(None)` when Nominatim answered without an address
    async fn nominatim(&self, coordinates: Coordinates) -> Result<Option<String>> {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}&zoom=10",
            self.nominatim_url, coordinates.latitude, coordinates.longitude
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                WeatherDashError::api(format!("Nominatim request failed: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            return Err(WeatherDashError::api(format!(
                "Failed to fetch address (HTTP {})",
                response.status()
            )));
        }

        let body: NominatimResponse = response
            .json()
            .await
            .map_err(|e| {
                WeatherDashError::api(format!("Invalid Nominatim response: {}", e.without_url()))
            })?;
        Ok(body.address.and_then(NominatimAddress::place_name))
    }

    async fn openweather(&self, coordinates: Coordinates) -> Result<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeatherDashError::config("no API key for the geocoding fallback"))?;

        let url = format!(
            "{}/reverse?lat={}&lon={}&limit=1&appid={api_key}",
            self.fallback_url, coordinates.latitude, coordinates.longitude
        );
        let places: Vec<GeoPlace> = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| geocoding_error("Geocoding request failed", e))?
            .json()
            .await
            .map_err(|e| geocoding_error("Invalid geocoding response", e))?;

        Ok(places.into_iter().next().and_then(GeoPlace::place_name))
    }
}

fn geocoding_error(context: &str, e: reqwest::Error) -> WeatherDashError {
    let detail = redact_api_key(&e.without_url().to_string());
    WeatherDashError::api(format!("{context}: {detail}"))
}

#[async_trait]
impl ReverseGeocoder for GeocoderChain {
    #[instrument(skip(self), fields(lat = %coordinates.latitude, lon = %coordinates.longitude))]
    async fn place_name(&self, coordinates: Coordinates) -> Result<String> {
        let resolved = match self.nominatim(coordinates).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Nominatim lookup failed, trying fallback: {}", e);
                self.openweather(coordinates).await.unwrap_or_else(|e| {
                    warn!("Fallback geocoder failed: {}", e);
                    None
                })
            }
        };

        let name = resolved.unwrap_or_else(|| coordinates.fallback_name());
        debug!("Resolved place name '{}'", name);
        Ok(name)
    }
}
