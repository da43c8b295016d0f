//! Russian postal address decomposition and rate-limited batch geocoding.
//!
//! - [`address`] splits a free-form address into typed fragments and builds
//!   ranked query candidates from them.
//! - [`geocode`] resolves a single query against a Nominatim-style service.
//! - [`batch`] drives a list of addresses through a geocoder one at a time,
//!   with a fixed delay between requests and per-item failure isolation.
//! - [`server`] exposes the batch boundary over HTTP with SSE progress.

pub mod address;
pub mod batch;
pub mod config;
pub mod geocode;
pub mod server;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `level` applies to this crate and
/// dependencies stay at `warn`.
pub fn init_logging(level: LevelFilter) -> Result<(), tracing_subscriber::filter::ParseError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("warn,adres_geo={},adres={}", level, level))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
