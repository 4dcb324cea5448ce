//! Dashboard orchestration
//!
//! Report view-model, state transitions and the service that drives searches.

pub mod report;
pub mod service;
pub mod state;

pub use report::{DaySummary, WeatherReport};
pub use service::DashboardService;
pub use state::{Action, DashboardState, RequestId, View};
