use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub mod error;
pub mod registry;

pub use error::OriginsError;
pub use registry::OriginRegistry;

/// Option whose update invalidates everything cached about origins.
pub const LICENSE_KEY_OPTION: &str = "pue_install_key_event_aggregator";
pub const DEFAULT_CACHE_GROUP: &str = "ea_origins_cache";

/// An import source known to the aggregator service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub limits: HashMap<String, u64>,
    #[serde(default)]
    pub oauth_enabled: bool,
}

impl Origin {
    pub fn limit(&self, kind: &str) -> Option<u64> {
        self.limits.get(kind).copied().filter(|limit| *limit > 0)
    }
}

/// Lookup for per-operation limits and OAuth capability of origins.
pub trait OriginLimits: Send + Sync {
    /// Limit for an operation kind such as `import`. Zero counts as unset.
    fn get_limit(&self, kind: &str) -> Option<u64>;

    fn is_oauth_enabled(&self, origin_id: &str) -> bool;
}
