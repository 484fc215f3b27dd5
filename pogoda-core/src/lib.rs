//! Core library for the `pogoda` weather lookup.
//!
//! This crate defines:
//! - City name validation and normalization
//! - Two-tier location resolution (static gazetteer, then a remote geocoder)
//! - Current conditions from a remote forecast provider
//! - A TTL cache of finished lookups
//! - The [`WeatherLookup`] orchestrator tying it together with a classified error
//!
//! It is used by `pogoda-cli`, but can also be embedded in other binaries or services.

pub mod cache;
pub mod clock;
pub mod conditions;
pub mod config;
pub mod error;
pub mod gazetteer;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod service;

pub use cache::{CacheStore, InMemoryCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{FetchError, GeocodeError, LookupError};
pub use gazetteer::Gazetteer;
pub use model::{Coordinates, ForecastReading, LookupRequest, NormalizedCityKey, WeatherResult};
pub use provider::{ForecastProvider, Geocoder};
pub use resolver::LocationResolver;
pub use service::WeatherLookup;
