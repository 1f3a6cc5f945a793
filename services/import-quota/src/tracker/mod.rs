pub mod amount;
pub mod error;
pub mod manager;
pub mod state;

pub use amount::ReduceAmount;
pub use error::QuotaError;
pub use manager::DailyQuota;
pub use state::QuotaState;

pub const IMPORT_LIMIT_KIND: &str = "import";
pub const QUOTA_KEY_PREFIX: &str = "import-quota-available_";
