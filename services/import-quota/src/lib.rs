pub mod aggregator;
pub mod api;
pub mod clock;
pub mod config;
pub mod notices;
pub mod origins;
pub mod storage;
pub mod tracker;

pub use aggregator::Aggregator;
pub use api::{create_router, ApiState, ErrorResponse};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ImportQuotaConfig;
pub use origins::{Origin, OriginLimits, OriginRegistry, OriginsError};
pub use storage::{MemoryTransientStore, SqliteTransientStore, StorageError, TransientStore};
pub use tracker::{DailyQuota, QuotaError, QuotaState, ReduceAmount};
