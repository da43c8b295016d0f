//! Geocoding subsystem: one query in, one coordinate (or failure) out.

pub mod nominatim;
pub mod types;

#[cfg(test)]
pub(crate) mod stub;

pub use nominatim::NominatimClient;
pub use types::{Coords, GeocodeError, GeocodeResult};

/// A blocking single-query geocoder.
///
/// Implementations perform no retries and no rate limiting.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, query: &str) -> Result<Coords, GeocodeError>;
}
