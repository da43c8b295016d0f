//! Nominatim search provider.
//!
//! One request per call, at most one match, scoped to the configured
//! country. Rate limiting and retries are left to the caller.

use super::types::{Coords, GeocodeError};
use super::Geocoder;
use crate::config::GeocoderConfig;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize, Debug, Clone)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
}

impl NominatimResult {
    fn into_coords(self) -> Result<Coords, GeocodeError> {
        let lat: f64 = self
            .lat
            .trim()
            .parse()
            .map_err(|_| GeocodeError::Lookup(format!("invalid latitude '{}'", self.lat)))?;
        let lng: f64 = self
            .lon
            .trim()
            .parse()
            .map_err(|_| GeocodeError::Lookup(format!("invalid longitude '{}'", self.lon)))?;
        Ok(Coords {
            lat,
            lng,
            label: self.display_name,
        })
    }
}

/// Blocking Nominatim client. Cheap to share: the agent pools connections.
pub struct NominatimClient {
    agent: ureq::Agent,
    config: GeocoderConfig,
}

impl NominatimClient {
    pub fn new(config: GeocoderConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .build();
        Self { agent, config }
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&self, query: &str) -> Result<Coords, GeocodeError> {
        debug!(query, endpoint = %self.config.endpoint, "nominatim search");

        let response = self
            .agent
            .get(&self.config.endpoint)
            .query("q", query)
            .query("format", "json")
            .query("limit", "1")
            .query("countrycodes", &self.config.country_codes)
            .set("Accept-Language", &self.config.language)
            .call()
            .map_err(|e| GeocodeError::Lookup(e.to_string()))?;

        let results: Vec<NominatimResult> = response
            .into_json()
            .map_err(|e| GeocodeError::Lookup(format!("invalid response: {}", e)))?;

        results
            .into_iter()
            .next()
            .ok_or(GeocodeError::NotFound)?
            .into_coords()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Stand-in search endpoint. Rejects requests missing the expected
    /// parameters or headers so the client's request shape is checked too.
    async fn search(Query(params): Query<HashMap<String, String>>, headers: HeaderMap) -> Response {
        let well_formed = params.get("format").map(String::as_str) == Some("json")
            && params.get("limit").map(String::as_str) == Some("1")
            && params.get("countrycodes").map(String::as_str) == Some("ru")
            && headers.get("accept-language").and_then(|v| v.to_str().ok()) == Some("ru")
            && headers
                .get("user-agent")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|ua| ua.starts_with("AdresGeo/"));
        if !well_formed {
            return (StatusCode::BAD_REQUEST, "bad request").into_response();
        }

        match params.get("q").map(String::as_str) {
            Some("г. Барнаул, ул. Мира, 15") => Json(json!([{
                "lat": "53.3479",
                "lon": "83.7798",
                "display_name": "15, улица Мира, Барнаул, Алтайский край, Россия",
                "importance": 0.4
            }]))
            .into_response(),
            Some("битые координаты") => {
                Json(json!([{ "lat": "north", "lon": "83.7", "display_name": "x" }])).into_response()
            }
            Some("не json") => "<html>oops</html>".into_response(),
            _ => Json(json!([])).into_response(),
        }
    }

    async fn spawn_stub() -> String {
        let app = Router::new().route("/search", get(search));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/search", addr)
    }

    async fn lookup(endpoint: String, query: &str) -> Result<Coords, GeocodeError> {
        let client = Arc::new(NominatimClient::new(GeocoderConfig {
            endpoint,
            timeout_secs: 5,
            ..GeocoderConfig::default()
        }));
        let query = query.to_string();
        tokio::task::spawn_blocking(move || client.geocode(&query))
            .await
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_first_match_parsed() {
        let endpoint = spawn_stub().await;
        let coords = lookup(endpoint, "г. Барнаул, ул. Мира, 15").await.unwrap();
        assert_relative_eq!(coords.lat, 53.3479);
        assert_relative_eq!(coords.lng, 83.7798);
        assert!(coords.label.contains("Барнаул"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty_list_is_not_found() {
        let endpoint = spawn_stub().await;
        let err = lookup(endpoint, "НеизвестныйАдрес").await.unwrap_err();
        assert_eq!(err, GeocodeError::NotFound);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_malformed_body_is_lookup_error() {
        let endpoint = spawn_stub().await;
        let err = lookup(endpoint, "не json").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Lookup(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_bad_coordinates_are_lookup_error() {
        let endpoint = spawn_stub().await;
        let err = lookup(endpoint, "битые координаты").await.unwrap_err();
        assert_eq!(err, GeocodeError::Lookup("invalid latitude 'north'".into()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unreachable_service_is_lookup_error() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = lookup(format!("http://{}/search", addr), "г. Барнаул").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Lookup(_)));
    }

    #[test]
    fn test_into_coords_trims() {
        let r = NominatimResult {
            lat: " 52.7 ".into(),
            lon: "81.6".into(),
            display_name: "Мамонтово".into(),
        };
        let c = r.into_coords().unwrap();
        assert_relative_eq!(c.lat, 52.7);
        assert_eq!(c.label, "Мамонтово");
    }
}
