use thiserror::Error;

/// Error taxonomy for one forecast cycle.
///
/// Both variants are terminal for the current cycle; there is no automatic
/// retry. The payload is a human-readable message, never a raw provider body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    /// Permission denied, no position fix, or the location service timed out.
    #[error("Could not determine your location: {0}")]
    LocationUnavailable(String),

    /// Transport error, non-2xx response, or a malformed forecast payload.
    #[error("Could not fetch the forecast: {0}")]
    NetworkFailure(String),
}

impl ForecastError {
    pub fn location(message: impl Into<String>) -> Self {
        Self::LocationUnavailable(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure(message.into())
    }
}
