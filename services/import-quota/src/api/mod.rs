use std::sync::Arc;

pub mod handlers;
pub mod router;
pub mod types;

pub use router::create_router;
pub use types::*;

use crate::aggregator::Aggregator;
use crate::config::ImportQuotaConfig;

pub struct ApiState {
    pub aggregator: Arc<Aggregator>,
    pub config: Arc<ImportQuotaConfig>,
}

impl ApiState {
    pub fn new(aggregator: Arc<Aggregator>, config: ImportQuotaConfig) -> Self {
        Self {
            aggregator,
            config: Arc::new(config),
        }
    }
}
