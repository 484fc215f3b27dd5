//! HTTP endpoint for weather lookups.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/weather/{city}/` | Current weather for a URL-encoded city name |
//!
//! Success bodies are `{city, temperature, humidity, wind_speed, description}`.
//! Failures are `{"error": "<message>"}` with status 400 (bad input),
//! 404 (unknown city), 504 (forecast timeout), 502 (forecast unavailable)
//! or 500 (anything else, panics included).

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use pogoda_core::{LookupError, WeatherLookup, WeatherResult};
use std::{any::Any, sync::Arc};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info, warn};

#[derive(Clone)]
struct AppState {
    lookup: Arc<WeatherLookup>,
}

pub fn router(lookup: WeatherLookup) -> Router {
    let state = AppState { lookup: Arc::new(lookup) };

    Router::new()
        .route("/api/weather/{city}", get(handle_weather))
        .route("/api/weather/{city}/", get(handle_weather))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Binds `bind` and serves until Ctrl-C.
pub async fn run(lookup: WeatherLookup, bind: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    info!("Weather endpoint listening on http://{bind}/api/weather/{{city}}/");

    axum::serve(listener, router(lookup))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
    }
}

async fn handle_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherResult>, ApiError> {
    let result = state.lookup.lookup(&city).await?;
    Ok(Json(result))
}

/// JSON body for a failed lookup.
pub fn error_body(err: &LookupError) -> serde_json::Value {
    serde_json::json!({ "error": err.to_string() })
}

fn status_for(err: &LookupError) -> StatusCode {
    match err {
        LookupError::InvalidInput => StatusCode::BAD_REQUEST,
        LookupError::NotFound => StatusCode::NOT_FOUND,
        LookupError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        LookupError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        LookupError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

struct ApiError(LookupError);

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if let LookupError::Internal(cause) = &self.0 {
            error!("Weather lookup failed internally: {cause:#}");
        }
        (status, Json(error_body(&self.0))).into_response()
    }
}

fn handle_panic(_payload: Box<dyn Any + Send + 'static>) -> Response {
    ApiError(LookupError::Internal(anyhow::anyhow!("weather handler panicked"))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pogoda_core::{
        Coordinates, FetchError, ForecastProvider, ForecastReading, Gazetteer, GeocodeError,
        Geocoder, InMemoryCache, LocationResolver,
    };

    #[derive(Debug)]
    struct NoGeocoder;

    #[async_trait]
    impl Geocoder for NoGeocoder {
        async fn geocode(&self, _query: &str) -> Result<Option<Coordinates>, GeocodeError> {
            Ok(None)
        }
    }

    #[derive(Debug)]
    struct FixedForecast(Option<ForecastReading>);

    #[async_trait]
    impl ForecastProvider for FixedForecast {
        async fn fetch(&self, _at: Coordinates) -> Result<ForecastReading, FetchError> {
            self.0.clone().ok_or(FetchError::Timeout)
        }
    }

    fn state(reading: Option<ForecastReading>) -> AppState {
        let lookup = WeatherLookup::new(
            LocationResolver::new(Gazetteer::default(), Arc::new(NoGeocoder)),
            Arc::new(FixedForecast(reading)),
            Arc::new(InMemoryCache::new()),
        );
        AppState { lookup: Arc::new(lookup) }
    }

    async fn call(state: AppState, city: &str) -> (StatusCode, serde_json::Value) {
        let response = handle_weather(State(state), Path(city.to_string())).await.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn success_returns_result_shape() {
        let reading = ForecastReading {
            temperature: Some(20.0),
            humidity: None,
            wind_speed: Some(3.5),
            weather_code: Some(2),
        };

        let (status, body) = call(state(Some(reading)), "Poznań").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Poznań");
        assert_eq!(body["description"], "Częściowe zachmurzenie");
        assert!(body["humidity"].is_null());
    }

    #[tokio::test]
    async fn short_city_is_bad_request() {
        let (status, body) = call(state(None), "x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Nieprawidłowa nazwa miasta");
    }

    #[tokio::test]
    async fn unknown_city_is_not_found() {
        let (status, body) = call(state(None), "Atlantyda").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Nie znaleziono miasta");
    }

    #[tokio::test]
    async fn forecast_timeout_is_gateway_timeout() {
        let (status, body) = call(state(None), "Lublin").await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(body["error"], "Przekroczono czas oczekiwania");
    }

    #[test]
    fn upstream_and_internal_statuses() {
        let upstream = LookupError::UpstreamUnavailable(FetchError::Payload("bad".into()));
        assert_eq!(status_for(&upstream), StatusCode::BAD_GATEWAY);

        let internal = LookupError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(status_for(&internal), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_body(&internal)["error"], "Wystąpił błąd");
    }

    #[tokio::test]
    async fn panic_becomes_generic_internal_error() {
        let response = handle_panic(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Wystąpił błąd");
    }
}
