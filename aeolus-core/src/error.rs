use thiserror::Error;

/// Failures surfaced by the weather client.
///
/// None of these are retried; the UI shows the message once and moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WeatherError {
    /// Geocoding produced no usable match (or could not be reached) for the city.
    #[error("no coordinates for city '{0}'")]
    NotFound(String),

    /// Transport error or non-2xx status from the weather endpoints.
    #[error("weather request failed: {0}")]
    NetworkFailure(String),

    /// The payload arrived but a required field was missing or unusable.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::NetworkFailure(detail.into())
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse(detail.into())
    }
}
