//! Sequential, rate-limited batch resolution.
//!
//! Flow per batch:  validate payload → for each address: geocode → record →
//! progress → delay (except after the last) → results.
//! Per-address failures are recorded and never stop the loop. Anything that
//! prevents the loop from starting ends the batch with a single error event.

use super::types::{BatchError, BatchEvent, BatchState};
use crate::address::candidates_for;
use crate::config::{BatchConfig, QueryStrategy};
use crate::geocode::{Coords, GeocodeError, GeocodeResult, Geocoder};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Events buffered before the resolver waits on the consumer.
const EVENT_BUFFER: usize = 64;

/// Drives one batch at a time through a [`Geocoder`].
pub struct BatchResolver {
    geocoder: Arc<dyn Geocoder>,
    delay: Duration,
    strategy: QueryStrategy,
    state: BatchState,
}

impl BatchResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, config: &BatchConfig) -> Self {
        Self {
            geocoder,
            delay: config.delay(),
            strategy: config.strategy,
            state: BatchState::Idle,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    /// Run the batch on a Tokio task and return its event stream.
    ///
    /// The task finishes with the terminal state. Dropping the receiver
    /// cancels the batch before its next request.
    pub fn spawn(mut self, payload: Value) -> (mpsc::Receiver<BatchEvent>, JoinHandle<BatchState>) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let handle = tokio::spawn(async move { self.run(payload, &tx).await });
        (rx, handle)
    }

    /// Run the batch to completion, sending events on `tx`.
    ///
    /// Progress events always precede the single terminal `results` or
    /// `error` event.
    pub async fn run(&mut self, payload: Value, tx: &mpsc::Sender<BatchEvent>) -> BatchState {
        self.state = BatchState::Running;

        match self.process(&payload, tx).await {
            Ok(results) => {
                self.state = BatchState::Completed;
                let succeeded = results.iter().filter(|r| r.success).count();
                info!(total = results.len(), succeeded, "batch completed");
                if tx.send(BatchEvent::Results { results }).await.is_err() {
                    warn!("batch results dropped: receiver closed");
                }
            }
            Err(BatchError::Cancelled) => {
                self.state = BatchState::Failed;
                warn!("batch cancelled: receiver closed");
            }
            Err(e) => {
                self.state = BatchState::Failed;
                error!("batch failed: {}", e);
                let _ = tx.send(BatchEvent::Error { message: e.to_string() }).await;
            }
        }

        self.state
    }

    async fn process(
        &self,
        payload: &Value,
        tx: &mpsc::Sender<BatchEvent>,
    ) -> Result<Vec<GeocodeResult>, BatchError> {
        let addresses = parse_addresses(payload)?;
        let total = addresses.len();
        info!(total, strategy = %self.strategy, delay_ms = self.delay.as_millis() as u64, "batch started");

        let mut outcome = Vec::with_capacity(total);
        for (i, address) in addresses.iter().enumerate() {
            if tx.is_closed() {
                return Err(BatchError::Cancelled);
            }

            let result = self.resolve_one(address).await;
            if result.success {
                debug!(index = i, address = %address, "resolved");
            } else {
                warn!(index = i, address = %address, error = ?result.error, "not resolved");
            }
            outcome.push(result);

            tx.send(BatchEvent::Progress { processed: i + 1, total })
                .await
                .map_err(|_| BatchError::Cancelled)?;

            if i + 1 < total {
                tokio::time::sleep(self.delay).await;
            }
        }

        Ok(outcome)
    }

    async fn resolve_one(&self, address: &str) -> GeocodeResult {
        let first = self.lookup(address).await;
        match (first, self.strategy) {
            (Ok(coords), _) => GeocodeResult::found(address, coords),
            (Err(GeocodeError::NotFound), QueryStrategy::Candidates) => {
                self.resolve_with_candidates(address).await
            }
            (Err(e), _) => GeocodeResult::failed(address, &e),
        }
    }

    /// Walk generated candidates after the raw address missed.
    ///
    /// Every extra request waits out the same delay as between addresses.
    async fn resolve_with_candidates(&self, address: &str) -> GeocodeResult {
        let (_, candidates) = candidates_for(address);
        let mut last = GeocodeError::NotFound;

        for query in candidates.into_iter().filter(|c| c != address) {
            tokio::time::sleep(self.delay).await;
            match self.lookup(&query).await {
                Ok(coords) => {
                    debug!(address, query = %query, "resolved via candidate");
                    return GeocodeResult::found(address, coords).with_matched_query(query);
                }
                Err(GeocodeError::NotFound) => continue,
                Err(e) => {
                    last = e;
                    break;
                }
            }
        }

        GeocodeResult::failed(address, &last)
    }

    /// Run the blocking geocoder call off the async worker threads.
    async fn lookup(&self, query: &str) -> Result<Coords, GeocodeError> {
        let geocoder = Arc::clone(&self.geocoder);
        let query = query.to_string();
        tokio::task::spawn_blocking(move || geocoder.geocode(&query))
            .await
            .unwrap_or_else(|e| Err(GeocodeError::Lookup(format!("geocoder task failed: {}", e))))
    }
}

/// Extract the address list from a `{ "addresses": [...] }` payload.
pub fn parse_addresses(payload: &Value) -> Result<Vec<String>, BatchError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| BatchError::InvalidPayload("expected a JSON object".into()))?;
    let list = obj
        .get("addresses")
        .ok_or_else(|| BatchError::InvalidPayload("missing 'addresses'".into()))?
        .as_array()
        .ok_or_else(|| BatchError::InvalidPayload("'addresses' must be an array".into()))?;

    list.iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| BatchError::InvalidPayload(format!("addresses[{}] is not a string", i)))
        })
        .collect()
}
