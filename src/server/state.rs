use crate::config::BatchConfig;
use crate::geocode::Geocoder;
use std::sync::Arc;

pub struct AppState {
    pub geocoder: Arc<dyn Geocoder>,
    pub batch: BatchConfig,
}
