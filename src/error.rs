//! Error types and handling for the `WeatherDash` engine

use thiserror::Error;

/// Why a device position could not be obtained
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    /// The user refused the location permission
    #[error("location permission denied")]
    PermissionDenied,
    /// The platform could not produce a position
    #[error("location unavailable")]
    Unavailable,
    /// No position arrived before the request deadline
    #[error("location request timed out")]
    Timeout,
    /// The platform has no location service at all
    #[error("geolocation not supported")]
    Unsupported,
}

impl GeolocationError {
    /// Message shown to the user. Timeouts are reported as unavailability.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            GeolocationError::PermissionDenied => {
                "Location access denied. Please allow location access."
            }
            GeolocationError::Unsupported => "Geolocation is not supported on this device",
            GeolocationError::Unavailable | GeolocationError::Timeout => {
                "Location unavailable. Please try again."
            }
        }
    }
}

/// Main error type for the `WeatherDash` engine
#[derive(Error, Debug)]
pub enum WeatherDashError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Weather or geocoding provider errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Device location errors
    #[error("Geolocation error: {source}")]
    Geolocation {
        #[from]
        source: GeolocationError,
    },

    /// Preference store errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl WeatherDashError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get the single user-visible message for this failure
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeatherDashError::Config { message } => format!("Configuration error: {message}"),
            WeatherDashError::Api { message } => message.clone(),
            WeatherDashError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WeatherDashError::Geolocation { source } => source.user_message().to_string(),
            WeatherDashError::Storage { .. } => {
                "Saved preferences could not be accessed.".to_string()
            }
            WeatherDashError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WeatherDashError::General { message } => message.clone(),
        }
    }
}
