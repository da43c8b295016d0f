//! Core types for the geocoding subsystem.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A resolved coordinate with the provider's display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
    pub label: String,
}

/// Per-query geocoding failures. Neither is fatal to a batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
    #[error("Адрес не найден")]
    NotFound,
    #[error("Lookup failed: {0}")]
    Lookup(String),
}

/// Outcome for one input address. Exactly one of `coords`/`error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub address: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coords>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Query that produced `coords`, when it differs from `address`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_query: Option<String>,
}

impl GeocodeResult {
    pub fn found(address: impl Into<String>, coords: Coords) -> Self {
        Self {
            address: address.into(),
            success: true,
            coords: Some(coords),
            error: None,
            matched_query: None,
        }
    }

    pub fn failed(address: impl Into<String>, err: &GeocodeError) -> Self {
        Self {
            address: address.into(),
            success: false,
            coords: None,
            error: Some(err.to_string()),
            matched_query: None,
        }
    }

    pub fn with_matched_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        if query != self.address {
            self.matched_query = Some(query);
        }
        self
    }
}
