use futures::FutureExt;
use std::{any::Any, panic::AssertUnwindSafe, sync::Arc};
use tracing::{debug, error, info, instrument, warn};

use crate::{
    Config,
    cache::{CACHE_TTL, CacheStore, InMemoryCache},
    clock::{Clock, SystemClock},
    error::LookupError,
    gazetteer::Gazetteer,
    model::{LookupRequest, WeatherResult},
    provider::{ForecastProvider, forecast_from_config, geocoder_from_config},
    resolver::LocationResolver,
};

/// Single entry point for weather lookups by city name.
///
/// Holds no per-call state; the cache is the only thing shared between
/// concurrent lookups. Identical concurrent lookups are not coalesced and
/// may each reach the providers.
#[derive(Debug, Clone)]
pub struct WeatherLookup {
    resolver: LocationResolver,
    forecast: Arc<dyn ForecastProvider>,
    cache: Arc<dyn CacheStore>,
}

impl WeatherLookup {
    pub fn new(
        resolver: LocationResolver,
        forecast: Arc<dyn ForecastProvider>,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self { resolver, forecast, cache }
    }

    /// Wires the public providers, the Polish gazetteer and an in-memory cache.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let resolver = LocationResolver::new(Gazetteer::default(), geocoder_from_config(config)?);
        let forecast = forecast_from_config(config, clock)?;
        let cache = Arc::new(InMemoryCache::new());

        Ok(Self::new(resolver, forecast, cache))
    }

    /// Looks up current weather for a decoded, otherwise unvalidated city string.
    ///
    /// Steps run strictly in order: validate, cache check, resolve, fetch,
    /// cache write. Nothing is cached on failure, and a cache hit makes no
    /// outbound calls. A panic anywhere below is reported as
    /// [`LookupError::Internal`].
    #[instrument(skip(self))]
    pub async fn lookup(&self, raw_city: &str) -> Result<WeatherResult, LookupError> {
        match AssertUnwindSafe(self.run(raw_city)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Weather lookup panicked: {message}");
                Err(LookupError::Internal(anyhow::anyhow!("weather lookup panicked: {message}")))
            }
        }
    }

    async fn run(&self, raw_city: &str) -> Result<WeatherResult, LookupError> {
        let request = LookupRequest::parse(raw_city)?;
        let key = request.key().cache_key();

        if let Some(cached) = self.cache.get(&key).await? {
            debug!("Cache hit for {key}");
            return Ok(cached);
        }
        debug!("Cache miss for {key}");

        let coords = self.resolver.resolve(&request).await.ok_or(LookupError::NotFound)?;

        let reading = self.forecast.fetch(coords).await.map_err(|e| {
            warn!("Forecast fetch failed for {:?}: {e}", request.city);
            LookupError::from(e)
        })?;

        let result = WeatherResult::from_reading(request.city, reading);
        self.cache.put(&key, result.clone(), CACHE_TTL).await?;

        info!("Weather for {:?}: {}", result.city, result.description);
        Ok(result)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
