use serde::{Deserialize, Serialize};

use crate::{conditions, error::LookupError};

/// Shortest accepted city name, counted in characters after trimming.
pub const MIN_CITY_CHARS: usize = 2;

/// Prefix shared by every cache key written by the lookup.
pub const CACHE_NAMESPACE: &str = "weather_";

/// Separator that replaces runs of whitespace inside a normalized key.
const KEY_DELIMITER: &str = "_";

/// A validated, per-call lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Decoded city text as typed by the user, surrounding whitespace removed.
    pub city: String,
}

impl LookupRequest {
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let city = raw.trim();
        if city.chars().count() < MIN_CITY_CHARS {
            return Err(LookupError::InvalidInput);
        }

        Ok(Self { city: city.to_string() })
    }

    pub fn key(&self) -> NormalizedCityKey {
        NormalizedCityKey::new(&self.city)
    }
}

/// Case- and whitespace-insensitive form of a city name.
///
/// Used both as the gazetteer lookup key and, with [`CACHE_NAMESPACE`]
/// prepended, as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedCityKey(String);

impl NormalizedCityKey {
    pub fn new(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let joined = lowered.split_whitespace().collect::<Vec<_>>().join(KEY_DELIMITER);
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn cache_key(&self) -> String {
        format!("{CACHE_NAMESPACE}{}", self.0)
    }
}

impl std::fmt::Display for NormalizedCityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Raw current conditions as reported by a forecast provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    /// WMO code; `None` when the provider sent an explicit null.
    pub weather_code: Option<i64>,
}

/// The unit returned to callers and stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// km/h.
    pub wind_speed: Option<f64>,
    pub description: String,
}

impl WeatherResult {
    pub fn from_reading(city: impl Into<String>, reading: ForecastReading) -> Self {
        Self {
            city: city.into(),
            temperature: reading.temperature,
            humidity: reading.humidity,
            wind_speed: reading.wind_speed,
            description: conditions::describe(reading.weather_code).to_string(),
        }
    }
}
