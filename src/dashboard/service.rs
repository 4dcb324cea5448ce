//! Orchestrates searches against the providers and keeps dashboard state

use super::report::WeatherReport;
use super::state::{Action, DashboardState, RequestId, View};
use crate::analysis::AlertEvaluator;
use crate::config::DashboardConfig;
use crate::error::GeolocationError;
use crate::history::{HistoryEntry, SearchHistory};
use crate::models::{Coordinates, Location, TemperatureUnit};
use crate::provider::{CurrentConditions, ForecastSeries, ReverseGeocoder, WeatherProvider};
use crate::storage::PreferenceStore;
use crate::{Result, WeatherDashError};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

/// Shown for any failed search by coordinates
const LOCATION_SEARCH_FAILED: &str = "Failed to get weather for your location";

pub struct DashboardService<P, G> {
    provider: P,
    geocoder: G,
    evaluator: AlertEvaluator,
    store: Option<PreferenceStore>,
    forecast_days: u8,
    max_days: usize,
    history_capacity: usize,
    state: Mutex<DashboardState>,
}

impl<P, G> DashboardService<P, G>
where
    P: WeatherProvider,
    G: ReverseGeocoder,
{
    #[must_use]
    pub fn new(provider: P, geocoder: G, config: &DashboardConfig) -> Self {
        let history_capacity = config.history.capacity;
        Self {
            provider,
            geocoder,
            evaluator: AlertEvaluator::new(config.alerts.clone()),
            store: None,
            forecast_days: config.weather.forecast_days,
            max_days: config.weather.max_days,
            history_capacity,
            state: Mutex::new(DashboardState::new(
                TemperatureUnit::default(),
                View::default(),
                SearchHistory::new(history_capacity),
            )),
        }
    }

    /// Attach a preference store and restore unit, view and history from it.
    /// Unreadable values fall back to defaults.
    pub async fn with_store(mut self, store: PreferenceStore) -> Self {
        let unit = store.load_unit().await.unwrap_or_else(|e| {
            warn!("Could not read unit preference: {:#}", e);
            TemperatureUnit::default()
        });
        let view = store.load_view().await.unwrap_or_else(|e| {
            warn!("Could not read view preference: {:#}", e);
            View::default()
        });
        let entries = store.load_history().await.unwrap_or_else(|e| {
            warn!("Could not read search history: {:#}", e);
            Vec::new()
        });

        self.state = Mutex::new(DashboardState::new(
            unit,
            view,
            SearchHistory::from_entries(entries, self.history_capacity),
        ));
        self.store = Some(store);
        self
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> DashboardState {
        self.state.lock().await.clone()
    }

    async fn dispatch(&self, action: Action) -> DashboardState {
        let mut state = self.state.lock().await;
        *state = std::mem::take(&mut *state).reduce(action);
        state.clone()
    }

    async fn start_search(&self) -> Result<RequestId> {
        self.dispatch(Action::SearchStarted)
            .await
            .latest_request()
            .ok_or_else(|| WeatherDashError::general("search was not registered"))
    }

    /// Search by city name
    #[instrument(skip(self))]
    pub async fn search_city(&self, city: &str) -> Result<WeatherReport> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherDashError::validation("Location cannot be empty"));
        }

        let request = self.start_search().await?;
        let fetched = tokio::try_join!(
            self.provider.current_by_city(city),
            self.provider.forecast_by_city(city, self.forecast_days),
        );

        match fetched {
            Ok((current, forecast)) => {
                let location = current.location.clone();
                Ok(self.complete(request, city, location, current, forecast).await)
            }
            Err(e) => {
                self.fail(request, e.user_message()).await;
                Err(e)
            }
        }
    }

    /// Search by position: resolve a place name first, then fetch
    #[instrument(skip(self))]
    pub async fn search_coordinates(&self, latitude: f64, longitude: f64) -> Result<WeatherReport> {
        let coordinates = Coordinates::new(latitude, longitude)?;

        let request = self.start_search().await?;
        let place = self
            .geocoder
            .place_name(coordinates)
            .await
            .unwrap_or_else(|e| {
                warn!("Reverse geocoding failed: {}", e);
                coordinates.fallback_name()
            });

        let fetched = tokio::try_join!(
            self.provider.current_by_coordinates(coordinates),
            self.provider
                .forecast_by_coordinates(coordinates, self.forecast_days),
        );

        match fetched {
            Ok((current, forecast)) => {
                let location = Location {
                    name: place.clone(),
                    country: None,
                    coordinates: Some(coordinates),
                };
                Ok(self.complete(request, &place, location, current, forecast).await)
            }
            Err(e) => {
                warn!("Search by coordinates failed: {}", e);
                self.fail(request, LOCATION_SEARCH_FAILED.to_string()).await;
                Err(WeatherDashError::api(LOCATION_SEARCH_FAILED))
            }
        }
    }

    async fn complete(
        &self,
        request: RequestId,
        searched: &str,
        location: Location,
        current: CurrentConditions,
        forecast: ForecastSeries,
    ) -> WeatherReport {
        let report =
            WeatherReport::build(location, current, forecast, &self.evaluator, self.max_days);

        // Store writes happen under the state lock so they land in state order
        let mut state = self.state.lock().await;
        let accepted = state.is_current(request);
        let mut next = std::mem::take(&mut *state).reduce(Action::ReportLoaded {
            request,
            report: Box::new(report.clone()),
        });
        if accepted {
            next = next.reduce(Action::RecordSearch {
                city: searched.to_string(),
                temperature: report.current.temperature,
                condition: report.current.condition.clone(),
                at: Utc::now(),
            });
        }
        *state = next;

        if accepted {
            info!(
                "Loaded {} ({} days, {} alerts)",
                report.location.display_name(),
                report.days.len(),
                report.alerts.len()
            );
            self.persist_history(state.history()).await;
        }
        drop(state);

        report
    }

    async fn fail(&self, request: RequestId, message: String) {
        self.dispatch(Action::RequestFailed { request, message }).await;
    }

    /// Record that the platform could not provide a position
    pub async fn report_geolocation_failure(&self, error: GeolocationError) -> DashboardState {
        self.dispatch(Action::GeolocationFailed(error)).await
    }

    pub async fn toggle_unit(&self) -> TemperatureUnit {
        let mut state = self.state.lock().await;
        *state = std::mem::take(&mut *state).reduce(Action::ToggleUnit);
        let unit = state.unit();
        self.persist_unit(unit).await;
        unit
    }

    pub async fn set_unit(&self, unit: TemperatureUnit) {
        let mut state = self.state.lock().await;
        *state = std::mem::take(&mut *state).reduce(Action::SetUnit(unit));
        self.persist_unit(unit).await;
    }

    pub async fn select_view(&self, view: View) {
        let mut state = self.state.lock().await;
        *state = std::mem::take(&mut *state).reduce(Action::SelectView(view));
        if let Some(store) = &self.store
            && let Err(e) = store.save_view(view).await
        {
            warn!("Could not save view preference: {:#}", e);
        }
    }

    pub async fn clear_history(&self) {
        let mut state = self.state.lock().await;
        *state = std::mem::take(&mut *state).reduce(Action::ClearHistory);
        self.persist_history(state.history()).await;
    }

    async fn persist_unit(&self, unit: TemperatureUnit) {
        if let Some(store) = &self.store
            && let Err(e) = store.save_unit(unit).await
        {
            warn!("Could not save unit preference: {:#}", e);
        }
    }

    async fn persist_history(&self, entries: &[HistoryEntry]) {
        if let Some(store) = &self.store
            && let Err(e) = store.save_history(entries).await
        {
            warn!("Could not save search history: {:#}", e);
        }
    }
}
