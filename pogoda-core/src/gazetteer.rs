use std::collections::HashMap;

use crate::model::{Coordinates, NormalizedCityKey};

/// Major Polish cities, with and without diacritics.
const POLISH_CITIES: &[(&str, f64, f64)] = &[
    ("warszawa", 52.2297, 21.0122),
    ("kraków", 50.0647, 19.9450),
    ("krakow", 50.0647, 19.9450),
    ("wrocław", 51.1079, 17.0385),
    ("wroclaw", 51.1079, 17.0385),
    ("poznań", 52.4064, 16.9252),
    ("poznan", 52.4064, 16.9252),
    ("gdańsk", 54.3520, 18.6466),
    ("gdansk", 54.3520, 18.6466),
    ("łódź", 51.7592, 19.4560),
    ("lodz", 51.7592, 19.4560),
    ("szczecin", 53.4285, 14.5528),
    ("lublin", 51.2465, 22.5684),
    ("katowice", 50.2649, 19.0238),
    ("bydgoszcz", 53.1235, 18.0084),
    ("białystok", 53.1325, 23.1688),
    ("bialystok", 53.1325, 23.1688),
];

/// Read-only table of known city coordinates, consulted before the geocoder.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: HashMap<NormalizedCityKey, Coordinates>,
}

impl Gazetteer {
    /// Builds a table from `(name, latitude, longitude)` rows. Names are
    /// normalized the same way lookup input is.
    pub fn from_entries<'a>(rows: impl IntoIterator<Item = (&'a str, f64, f64)>) -> Self {
        let entries = rows
            .into_iter()
            .map(|(name, lat, lon)| (NormalizedCityKey::new(name), Coordinates::new(lat, lon)))
            .collect();

        Self { entries }
    }

    pub fn polish_cities() -> Self {
        Self::from_entries(POLISH_CITIES.iter().copied())
    }

    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn get(&self, key: &NormalizedCityKey) -> Option<Coordinates> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::polish_cities()
    }
}
