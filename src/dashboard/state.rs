//! Dashboard state and its transitions
//!
//! `DashboardState` is a plain value; every change goes through
//! [`DashboardState::reduce`]. Each search gets a [`RequestId`] and only the
//! most recent one may land its result.

use super::report::WeatherReport;
use crate::error::GeolocationError;
use crate::history::{HistoryEntry, SearchHistory};
use crate::models::{TemperatureUnit, WeatherCondition};
use crate::{Result, WeatherDashError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Which panel the dashboard shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Current,
    Forecast,
    Charts,
    Alerts,
}

impl View {
    pub const ALL: [View; 4] = [View::Current, View::Forecast, View::Charts, View::Alerts];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            View::Current => "current",
            View::Forecast => "forecast",
            View::Charts => "charts",
            View::Alerts => "alerts",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = WeatherDashError;

    fn from_str(s: &str) -> Result<Self> {
        View::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                WeatherDashError::validation(format!(
                    "unknown view '{s}', expected one of: current, forecast, charts, alerts"
                ))
            })
    }
}

/// Identifies one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    /// A search began; allocates a new request id and supersedes older ones
    SearchStarted,
    ReportLoaded {
        request: RequestId,
        report: Box<WeatherReport>,
    },
    RequestFailed {
        request: RequestId,
        message: String,
    },
    GeolocationFailed(GeolocationError),
    ToggleUnit,
    SetUnit(TemperatureUnit),
    SelectView(View),
    RecordSearch {
        city: String,
        temperature: f64,
        condition: WeatherCondition,
        at: DateTime<Utc>,
    },
    ClearHistory,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    unit: TemperatureUnit,
    view: View,
    loading: bool,
    error: Option<String>,
    address: Option<String>,
    report: Option<WeatherReport>,
    history: SearchHistory,
    latest_request: Option<RequestId>,
    issued_requests: u64,
}

impl DashboardState {
    /// Initial state from persisted preferences
    #[must_use]
    pub fn new(unit: TemperatureUnit, view: View, history: SearchHistory) -> Self {
        Self {
            unit,
            view,
            history,
            ..Self::default()
        }
    }

    /// Apply one action, returning the next state
    #[must_use]
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::SearchStarted => {
                self.issued_requests += 1;
                let request = RequestId(self.issued_requests);
                debug!(%request, "Search started");
                self.latest_request = Some(request);
                self.loading = true;
                self.error = None;
            }
            Action::ReportLoaded { request, report } => {
                if self.is_current(request) {
                    self.loading = false;
                    self.error = None;
                    self.address = Some(report.location.name.clone());
                    self.report = Some(*report);
                } else {
                    warn!(%request, "Discarding result of a superseded search");
                }
            }
            Action::RequestFailed { request, message } => {
                if self.is_current(request) {
                    self.loading = false;
                    self.error = Some(message);
                    self.report = None;
                } else {
                    warn!(%request, "Discarding failure of a superseded search");
                }
            }
            Action::GeolocationFailed(error) => {
                self.loading = false;
                self.error = Some(error.user_message().to_string());
            }
            Action::ToggleUnit => self.unit = self.unit.toggled(),
            Action::SetUnit(unit) => self.unit = unit,
            Action::SelectView(view) => self.view = view,
            Action::RecordSearch {
                city,
                temperature,
                condition,
                at,
            } => self.history.record_at(&city, temperature, condition, at),
            Action::ClearHistory => self.history.clear(),
        }
        self
    }

    /// True when `request` is the most recently started search
    #[must_use]
    pub fn is_current(&self, request: RequestId) -> bool {
        self.latest_request == Some(request)
    }

    #[must_use]
    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest_request
    }

    #[must_use]
    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Name of the place shown in the header
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    #[must_use]
    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }
}
