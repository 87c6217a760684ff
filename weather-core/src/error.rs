use reqwest::StatusCode;

/// Failures of the location-to-conditions sequence.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Permission to access location was denied")]
    PermissionDenied,

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),
}

/// Coarse category used by the presentation layer to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    PermissionDenied,
    Network,
    DataUnavailable,
}

// Request URLs carry the API key as a query parameter; never keep them.
impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::Network(err.without_url())
    }
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::PermissionDenied => ErrorKind::PermissionDenied,
            WeatherError::Network(_) | WeatherError::Api { .. } => ErrorKind::Network,
            WeatherError::DataUnavailable(_) => ErrorKind::DataUnavailable,
        }
    }

    pub(crate) fn data(msg: impl Into<String>) -> Self {
        WeatherError::DataUnavailable(msg.into())
    }
}
