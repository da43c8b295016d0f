//! In-memory geocoder for tests.

use super::types::{Coords, GeocodeError};
use super::Geocoder;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct StubGeocoder {
    known: HashMap<String, Coords>,
    broken: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl StubGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `query` to fixed coordinates.
    pub fn with(mut self, query: &str, lat: f64, lng: f64) -> Self {
        self.known.insert(
            query.to_string(),
            Coords { lat, lng, label: format!("{query} (stub)") },
        );
        self
    }

    /// Fail `query` with a transport error.
    pub fn broken(mut self, query: &str) -> Self {
        self.broken.insert(query.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, query: &str) -> Result<Coords, GeocodeError> {
        self.calls.lock().unwrap().push(query.to_string());
        if self.broken.contains(query) {
            return Err(GeocodeError::Lookup("connection reset".into()));
        }
        self.known.get(query).cloned().ok_or(GeocodeError::NotFound)
    }
}
