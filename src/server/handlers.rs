use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Json, Response};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::address::{candidates_for, tables::TABLES_VERSION, AddressFragments};
use crate::batch::{BatchError, BatchEvent, BatchResolver};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/health ─────────────────────────────────────────────

pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ─── GET /api/parse ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ParseQuery {
    pub address: Option<String>,
}

#[derive(Serialize)]
pub struct ParseResponse {
    pub address: String,
    pub fragments: AddressFragments,
    pub candidates: Vec<String>,
    pub tables_version: u32,
}

pub async fn parse(Query(params): Query<ParseQuery>) -> Result<Json<ParseResponse>, Response> {
    let address = params.address.as_deref().unwrap_or("").trim();
    if address.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Missing 'address' parameter").into_response());
    }

    let (fragments, candidates) = candidates_for(address);
    debug!(address, candidates = candidates.len(), "GET /api/parse");

    Ok(Json(ParseResponse {
        address: address.to_string(),
        fragments,
        candidates,
        tables_version: TABLES_VERSION,
    }))
}

// ─── POST /api/geocode ───────────────────────────────────────────

/// Run a batch and stream its events as SSE.
///
/// The body is handed to the resolver untouched, so shape errors surface as
/// an `error` event rather than an HTTP status. Closing the connection
/// cancels the batch before its next request.
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let start = Instant::now();
    let payload = serde_json::from_str::<Value>(&body);
    let resolver = BatchResolver::new(Arc::clone(&state.geocoder), &state.batch);

    let stream = async_stream::stream! {
        match payload {
            Ok(payload) => {
                let (mut rx, _task) = resolver.spawn(payload);
                while let Some(event) = rx.recv().await {
                    if event.is_terminal() {
                        info!(
                            "POST /api/geocode -> {} ({:.1}ms)",
                            event.kind(),
                            start.elapsed().as_secs_f64() * 1000.0,
                        );
                    }
                    if let Some(sse) = to_sse(&event) {
                        yield Ok(sse);
                    }
                }
            }
            Err(e) => {
                let event = BatchEvent::Error {
                    message: BatchError::InvalidPayload(e.to_string()).to_string(),
                };
                info!("POST /api/geocode -> error (unparsable body)");
                if let Some(sse) = to_sse(&event) {
                    yield Ok(sse);
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)).text("heartbeat"))
}

fn to_sse(event: &BatchEvent) -> Option<Event> {
    match Event::default().event(event.kind()).json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            warn!("SSE: Failed to serialize event {}: {}", event.kind(), e);
            None
        }
    }
}
