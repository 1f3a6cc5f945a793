use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use event_aggregator_import_quota::{
    Aggregator, Clock, ImportQuotaConfig, ManualClock, MemoryTransientStore, Origin,
    SqliteTransientStore, TransientStore,
};
use tempfile::TempDir;

pub use event_aggregator_import_quota;
pub use serde_json;

pub enum StoreKind {
    Memory,
    Sqlite,
}

pub struct QuotaBenchFixture {
    pub aggregator: Arc<Aggregator>,
    pub clock: Arc<ManualClock>,
    // Keeps the SQLite data dir alive for the fixture's lifetime.
    _temp_dir: Option<TempDir>,
}

impl QuotaBenchFixture {
    pub fn new(kind: StoreKind, daily_limit: u64) -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let config = ImportQuotaConfig {
            default_daily_limit: daily_limit,
            ..ImportQuotaConfig::default()
        };

        let (store, temp_dir): (Arc<dyn TransientStore>, Option<TempDir>) = match kind {
            StoreKind::Memory => (
                Arc::new(MemoryTransientStore::new(clock.clone() as Arc<dyn Clock>)),
                None,
            ),
            StoreKind::Sqlite => {
                let temp_dir = TempDir::new().expect("tempdir");
                let store = SqliteTransientStore::new(
                    temp_dir.path().to_path_buf(),
                    clock.clone() as Arc<dyn Clock>,
                )
                .expect("sqlite transient store");
                (Arc::new(store), Some(temp_dir))
            }
        };

        let aggregator = Arc::new(Aggregator::new(&config, store, clock.clone()));
        Self {
            aggregator,
            clock,
            _temp_dir: temp_dir,
        }
    }

    /// Caches `count` origins that all report `import_limit`.
    pub fn with_origins(self, count: usize, import_limit: u64) -> Self {
        let origins: Vec<Origin> = (0..count)
            .map(|idx| Origin {
                id: format!("origin-{idx}"),
                name: format!("Bench origin {idx}"),
                limits: HashMap::from([("import".to_string(), import_limit)]),
                oauth_enabled: idx == 0,
            })
            .collect();
        self.aggregator
            .origins()
            .replace(&origins)
            .expect("cache bench origins");
        self
    }
}
