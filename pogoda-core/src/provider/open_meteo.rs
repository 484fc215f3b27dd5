use anyhow::Context;
use async_trait::async_trait;
use chrono::Timelike;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};

use crate::{
    clock::Clock,
    error::FetchError,
    model::{Coordinates, ForecastReading},
    provider::truncate_body,
};

use super::ForecastProvider;

/// Timezone the hourly series is aligned to.
pub const FORECAST_TIMEZONE: Tz = chrono_tz::Europe::Warsaw;

/// Forecast provider backed by the Open-Meteo `forecast` endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    url: String,
    http: Client,
    clock: Arc<dyn Clock>,
}

impl OpenMeteoProvider {
    pub fn new(url: String, timeout: Duration, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build forecast HTTP client")?;

        Ok(Self { url, http, clock })
    }

    /// Current hour of day (0-23) in [`FORECAST_TIMEZONE`].
    fn current_hour(&self) -> usize {
        self.clock.now().with_timezone(&FORECAST_TIMEZONE).hour() as usize
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current_weather: OmCurrentWeather,
    #[serde(default)]
    hourly: Option<OmHourly>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: Option<f64>,
    windspeed: Option<f64>,
    /// A missing key reads as code 0; an explicit null stays `None`.
    #[serde(default = "clear_sky_code")]
    weathercode: Option<i64>,
}

fn clear_sky_code() -> Option<i64> {
    Some(0)
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    #[serde(default)]
    relativehumidity_2m: Option<Vec<Option<f64>>>,
}

/// Picks the humidity sample for `hour`; a short series means no sample.
fn humidity_at_hour(series: &[Option<f64>], hour: usize) -> Option<f64> {
    series.get(hour).copied().flatten()
}

fn parse_reading(body: &str, hour: usize) -> Result<ForecastReading, FetchError> {
    let parsed: OmResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Payload(format!("{e}: {}", truncate_body(body))))?;

    let humidity = parsed
        .hourly
        .and_then(|h| h.relativehumidity_2m)
        .and_then(|series| humidity_at_hour(&series, hour));

    Ok(ForecastReading {
        temperature: parsed.current_weather.temperature,
        humidity,
        wind_speed: parsed.current_weather.windspeed,
        weather_code: parsed.current_weather.weathercode,
    })
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn fetch(&self, at: Coordinates) -> Result<ForecastReading, FetchError> {
        let latitude = at.latitude.to_string();
        let longitude = at.longitude.to_string();

        let res = self
            .http
            .get(&self.url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("hourly", "relativehumidity_2m"),
                ("timezone", FORECAST_TIMEZONE.name()),
            ])
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::from_transport)?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        parse_reading(&body, self.current_hour())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{TimeZone, Utc};

    const PAYLOAD: &str = r#"{
        "latitude": 52.23,
        "longitude": 21.01,
        "current_weather": {"temperature": 18.4, "windspeed": 11.2, "weathercode": 3, "time": "2025-06-01T14:00"},
        "hourly": {"time": [], "relativehumidity_2m": [90, 88, 85, 80, 78, 75, 70, 66, 60, 58, 55, 52, 50, 48, 47, 49, 53, 58, 62, 68, 74, 80, 84, 87]}
    }"#;

    #[test]
    fn reading_takes_humidity_at_current_hour() {
        let reading = parse_reading(PAYLOAD, 14).unwrap();
        assert_eq!(reading.temperature, Some(18.4));
        assert_eq!(reading.wind_speed, Some(11.2));
        assert_eq!(reading.weather_code, Some(3));
        assert_eq!(reading.humidity, Some(47.0));
    }

    #[test]
    fn short_humidity_series_means_absent_humidity() {
        let body = r#"{"current_weather": {"temperature": 1.0, "windspeed": 2.0, "weathercode": 0},
                       "hourly": {"relativehumidity_2m": [70, 71, 72]}}"#;
        let reading = parse_reading(body, 3).unwrap();
        assert_eq!(reading.humidity, None);

        let reading = parse_reading(body, 2).unwrap();
        assert_eq!(reading.humidity, Some(72.0));
    }

    #[test]
    fn missing_hourly_block_is_not_an_error() {
        let body = r#"{"current_weather": {"temperature": -3.5, "windspeed": 0.0, "weathercode": 71}}"#;
        let reading = parse_reading(body, 8).unwrap();
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.weather_code, Some(71));
    }

    #[test]
    fn null_fields_become_absent() {
        let body = r#"{"current_weather": {"temperature": null, "windspeed": null},
                       "hourly": {"relativehumidity_2m": [null, null]}}"#;
        let reading = parse_reading(body, 1).unwrap();
        assert_eq!(reading.temperature, None);
        assert_eq!(reading.wind_speed, None);
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.weather_code, Some(0));
    }

    #[test]
    fn null_weather_code_is_not_an_error() {
        let body = r#"{"current_weather": {"temperature": 5.0, "windspeed": 1.0, "weathercode": null}}"#;
        let reading = parse_reading(body, 0).unwrap();
        assert_eq!(reading.weather_code, None);
        assert_eq!(reading.temperature, Some(5.0));
        assert_eq!(crate::conditions::describe(reading.weather_code), "Nieznane");
    }

    #[test]
    fn payload_without_current_weather_is_malformed() {
        let err = parse_reading(r#"{"hourly": {}}"#, 0).unwrap_err();
        assert!(matches!(err, FetchError::Payload(_)));

        let err = parse_reading("<html>maintenance</html>", 0).unwrap_err();
        assert!(matches!(err, FetchError::Payload(_)));
    }

    #[test]
    fn current_hour_uses_warsaw_time() {
        // 23:30 UTC in July is 01:30 CEST
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 7, 10, 23, 30, 0).unwrap()));
        let provider =
            OpenMeteoProvider::new("http://localhost".into(), Duration::from_secs(1), clock.clone())
                .unwrap();
        assert_eq!(provider.current_hour(), 1);

        // 11:00 UTC in January is 12:00 CET
        clock.set(Utc.with_ymd_and_hms(2025, 1, 10, 11, 0, 0).unwrap());
        assert_eq!(provider.current_hour(), 12);
    }
}
