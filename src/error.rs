//! Error taxonomy for the itinerary pipeline.
//!
//! Generation failures (`BackendUnavailable`, `EmptyGeneration`) are retryable by the
//! caller. Format failures are not: retrying the same prompt against the same backend
//! rarely fixes a payload the model has already decided to shape differently.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ItineraryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Generation backend returned no text")]
    EmptyGeneration,

    #[error("No structured payload found in generated text")]
    NoStructuredPayloadFound,

    #[error("Malformed JSON at line {line}, column {column}: {message}")]
    MalformedJson {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Schema violation at `{field}`: {reason}")]
    SchemaViolation { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ItineraryError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::BackendUnavailable(message.into())
    }

    pub fn schema<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ItineraryError::BackendUnavailable(_) | ItineraryError::EmptyGeneration
        )
    }

    /// Message safe to show to an end user. Diagnostics stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ItineraryError::InvalidInput(message) => message.clone(),
            ItineraryError::BackendUnavailable(_) | ItineraryError::EmptyGeneration => {
                "The itinerary service is busy. Please try again in a moment.".to_string()
            }
            ItineraryError::Configuration(_) => "The itinerary service is not configured.".to_string(),
            ItineraryError::NoStructuredPayloadFound
            | ItineraryError::MalformedJson { .. }
            | ItineraryError::SchemaViolation { .. } => {
                "Could not generate an itinerary for this request.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ItineraryError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL can carry credentials.
        let err = err.without_url();
        if err.is_timeout() {
            ItineraryError::BackendUnavailable(format!("request timed out: {}", err))
        } else {
            ItineraryError::BackendUnavailable(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ItineraryError {
    fn from(err: serde_json::Error) -> Self {
        ItineraryError::MalformedJson {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ItineraryError>;
