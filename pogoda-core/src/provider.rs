use crate::{
    Config,
    clock::Clock,
    error::{FetchError, GeocodeError},
    model::{Coordinates, ForecastReading},
    provider::{nominatim::NominatimGeocoder, open_meteo::OpenMeteoProvider},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod nominatim;
pub mod open_meteo;

/// Deadline applied to every outbound provider call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Remote free-text place search.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Returns the first candidate for `query`, or `None` if there is none or
    /// its coordinates cannot be parsed.
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Remote current-conditions source.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, at: Coordinates) -> Result<ForecastReading, FetchError>;
}

/// Construct the geocoder described by `config`.
pub fn geocoder_from_config(config: &Config) -> anyhow::Result<Arc<dyn Geocoder>> {
    let geocoder = NominatimGeocoder::new(
        config.geocoder.url.clone(),
        &config.geocoder.user_agent,
        REQUEST_TIMEOUT,
    )?;
    Ok(Arc::new(geocoder))
}

/// Construct the forecast provider described by `config`.
pub fn forecast_from_config(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<dyn ForecastProvider>> {
    let provider = OpenMeteoProvider::new(config.forecast.url.clone(), REQUEST_TIMEOUT, clock)?;
    Ok(Arc::new(provider))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
