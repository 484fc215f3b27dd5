//! City name to coordinates, gazetteer first, remote geocoder second.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    gazetteer::Gazetteer,
    model::{Coordinates, LookupRequest},
    provider::Geocoder,
};

#[derive(Debug, Clone)]
pub struct LocationResolver {
    gazetteer: Gazetteer,
    geocoder: Arc<dyn Geocoder>,
}

impl LocationResolver {
    pub fn new(gazetteer: Gazetteer, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { gazetteer, geocoder }
    }

    /// Resolves the request to coordinates, or `None` if neither tier can.
    ///
    /// Geocoder transport failures are logged and reported as `None`, the
    /// same as a genuine miss.
    pub async fn resolve(&self, request: &LookupRequest) -> Option<Coordinates> {
        let key = request.key();

        if let Some(coords) = self.gazetteer.get(&key) {
            debug!("Gazetteer hit for {key}");
            return Some(coords);
        }

        match self.geocoder.geocode(&request.city).await {
            Ok(Some(coords)) => {
                debug!("Geocoded {:?} to ({}, {})", request.city, coords.latitude, coords.longitude);
                Some(coords)
            }
            Ok(None) => {
                debug!("Geocoder found nothing for {:?}", request.city);
                None
            }
            Err(e) => {
                warn!("Geocoder unavailable while resolving {:?}: {e}", request.city);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeocodeError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    enum Answer {
        Found(Coordinates),
        Nothing,
        Down,
    }

    #[derive(Debug)]
    struct FakeGeocoder {
        answer: Answer,
        calls: AtomicUsize,
        last_query: parking_lot::Mutex<Option<String>>,
    }

    impl FakeGeocoder {
        fn new(answer: Answer) -> Arc<Self> {
            Arc::new(Self { answer, calls: AtomicUsize::new(0), last_query: Default::default() })
        }
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock() = Some(query.to_string());
            match self.answer {
                Answer::Found(c) => Ok(Some(c)),
                Answer::Nothing => Ok(None),
                Answer::Down => Err(GeocodeError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE)),
            }
        }
    }

    fn request(city: &str) -> LookupRequest {
        LookupRequest::parse(city).unwrap()
    }

    #[tokio::test]
    async fn gazetteer_hit_skips_geocoder() {
        let geocoder = FakeGeocoder::new(Answer::Down);
        let resolver = LocationResolver::new(Gazetteer::default(), geocoder.clone());

        let coords = resolver.resolve(&request(" WARSZAWA ")).await;

        assert_eq!(coords, Some(Coordinates::new(52.2297, 21.0122)));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn gazetteer_miss_queries_geocoder_with_display_text() {
        let geocoder = FakeGeocoder::new(Answer::Found(Coordinates::new(49.6218, 20.6971)));
        let resolver = LocationResolver::new(Gazetteer::default(), geocoder.clone());

        let coords = resolver.resolve(&request("Nowy  Sącz")).await;

        assert_eq!(coords, Some(Coordinates::new(49.6218, 20.6971)));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(geocoder.last_query.lock().as_deref(), Some("Nowy  Sącz"));
    }

    #[tokio::test]
    async fn no_candidates_resolves_to_none() {
        let geocoder = FakeGeocoder::new(Answer::Nothing);
        let resolver = LocationResolver::new(Gazetteer::default(), geocoder);

        assert_eq!(resolver.resolve(&request("Nieistniejącamiejscowość123")).await, None);
    }

    #[tokio::test]
    async fn geocoder_failure_resolves_to_none() {
        let geocoder = FakeGeocoder::new(Answer::Down);
        let resolver = LocationResolver::new(Gazetteer::empty(), geocoder.clone());

        assert_eq!(resolver.resolve(&request("Warszawa")).await, None);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }
}
