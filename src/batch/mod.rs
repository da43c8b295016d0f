//! Batch resolution: many addresses, one request at a time.

pub mod resolver;
pub mod types;

pub use resolver::{parse_addresses, BatchResolver};
pub use types::{BatchError, BatchEvent, BatchState};
