use thiserror::Error;

/// Classified outcome of a failed lookup.
///
/// Display strings are the user-facing messages; underlying causes are only
/// reachable through [`std::error::Error::source`] so they end up in logs
/// and never in responses.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Nieprawidłowa nazwa miasta")]
    InvalidInput,

    /// Neither the gazetteer nor the geocoder produced coordinates. This also
    /// covers geocoder transport failures.
    #[error("Nie znaleziono miasta")]
    NotFound,

    #[error("Przekroczono czas oczekiwania")]
    Timeout(#[source] FetchError),

    #[error("Błąd pobierania danych pogodowych")]
    UpstreamUnavailable(#[source] FetchError),

    #[error("Wystąpił błąd")]
    Internal(#[from] anyhow::Error),
}

impl From<FetchError> for LookupError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout => LookupError::Timeout(err),
            other => LookupError::UpstreamUnavailable(other),
        }
    }
}

/// Failure of a single forecast provider call.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("forecast provider did not answer in time")]
    Timeout,

    #[error("forecast request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("forecast provider returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed forecast payload: {0}")]
    Payload(String),
}

impl FetchError {
    /// Sorts a transport error into the timeout / other bucket.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() { FetchError::Timeout } else { FetchError::Request(err) }
    }
}

/// Transport-level failure of the geocoder. Never surfaced past the resolver.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoder returned status {0}")]
    Status(reqwest::StatusCode),
}
