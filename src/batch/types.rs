//! Events, states and errors of a batch run.

use crate::geocode::GeocodeResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Notifications sent to the caller, in order.
///
/// Zero or more `Progress` events are followed by exactly one terminal
/// `Results` or `Error` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BatchEvent {
    Progress { processed: usize, total: usize },
    Results { results: Vec<GeocodeResult> },
    Error { message: String },
}

impl BatchEvent {
    /// Event name used on the wire (SSE `event:` field).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Progress { .. } => "progress",
            Self::Results { .. } => "results",
            Self::Error { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Failures that end a whole batch. Partial results are discarded.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invalid batch payload: {0}")]
    InvalidPayload(String),
    #[error("Batch cancelled: event receiver closed")]
    Cancelled,
}
