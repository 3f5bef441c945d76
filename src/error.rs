//! Error types for the location dialog

use thiserror::Error;

/// Main error type for the location dialog
#[derive(Error, Debug)]
pub enum LocationError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Geospatial API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Host dialog interaction errors
    #[error("Dialog error: {message}")]
    Dialog { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl LocationError {
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

    /// Create a new dialog error
    pub fn dialog<S: Into<String>>(message: S) -> Self {
        Self::Dialog {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            LocationError::Config { .. } => {
                "Configuration error. Please check your config file and Bing Maps key.".to_string()
            }
            LocationError::Api { .. } => {
                "Unable to reach the location service. Please try again later.".to_string()
            }
            LocationError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            LocationError::Dialog { .. } => {
                "The conversation could not continue. Please start over.".to_string()
            }
            LocationError::Io { .. } => {
                "Reading your answer failed. Please try again.".to_string()
            }
        }
    }
}

impl From<reqwest_middleware::Error> for LocationError {
    fn from(err: reqwest_middleware::Error) -> Self {
        LocationError::api(format!("Request failed: {err}"))
    }
}
