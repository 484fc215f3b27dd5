use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, header::HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{error::GeocodeError, model::Coordinates};

use super::Geocoder;

/// Geocoder backed by a Nominatim `search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    url: String,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(url: String, user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        let user_agent =
            HeaderValue::from_str(user_agent).context("Invalid geocoder user agent")?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build geocoder HTTP client")?;

        Ok(Self { url, http })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimCandidate {
    lat: String,
    lon: String,
}

impl NominatimCandidate {
    fn coordinates(&self) -> Option<Coordinates> {
        let latitude = self.lat.trim().parse::<f64>().ok()?;
        let longitude = self.lon.trim().parse::<f64>().ok()?;
        Some(Coordinates::new(latitude, longitude))
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let res = self
            .http
            .get(&self.url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let body = res.text().await?;

        let candidates: Vec<NominatimCandidate> = match serde_json::from_str(&body) {
            Ok(c) => c,
            Err(e) => {
                debug!("Unparseable geocoder response for {query:?}: {e}");
                return Ok(None);
            }
        };

        let Some(first) = candidates.first() else {
            debug!("Geocoder has no candidates for {query:?}");
            return Ok(None);
        };

        let coords = first.coordinates();
        if coords.is_none() {
            debug!("Geocoder candidate for {query:?} has bad coordinates: {first:?}");
        }
        Ok(coords)
    }
}
