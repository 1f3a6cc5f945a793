use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use event_aggregator_import_quota::{
    Clock, DailyQuota, ImportQuotaConfig, ManualClock, MemoryTransientStore, Origin,
    OriginRegistry, QuotaError, SqliteTransientStore, StorageError, TransientStore,
};
use tempfile::tempdir;

struct Harness {
    clock: Arc<ManualClock>,
    store: Arc<dyn TransientStore>,
    origins: Arc<OriginRegistry>,
    quota: DailyQuota,
}

fn harness_with_store(
    clock: Arc<ManualClock>,
    store: Arc<dyn TransientStore>,
    config: &ImportQuotaConfig,
) -> Harness {
    let origins = Arc::new(OriginRegistry::new(Arc::clone(&store), config));
    let quota = DailyQuota::new(
        Arc::clone(&store),
        origins.clone(),
        clock.clone(),
        config,
    );
    Harness {
        clock,
        store,
        origins,
        quota,
    }
}

fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 11, 5, 8, 30, 0).unwrap(),
    ))
}

fn memory_harness() -> Harness {
    let clock = start_clock();
    let store: Arc<dyn TransientStore> =
        Arc::new(MemoryTransientStore::new(clock.clone() as Arc<dyn Clock>));
    harness_with_store(clock, store, &ImportQuotaConfig::default())
}

fn import_origin(id: &str, limit: u64) -> Origin {
    Origin {
        id: id.to_string(),
        name: id.to_string(),
        limits: HashMap::from([("import".to_string(), limit)]),
        oauth_enabled: false,
    }
}

#[test]
fn test_fresh_day_has_full_ceiling() {
    let harness = memory_harness();
    assert_eq!(harness.quota.ceiling(), 100);
    assert_eq!(harness.quota.remaining(), harness.quota.ceiling());
}

#[test]
fn test_reductions_accumulate() {
    let harness = memory_harness();
    for amount in [1, 5, 10, 20] {
        assert!(harness.quota.reduce(amount));
    }
    assert_eq!(harness.quota.remaining(), 64);
}

#[test]
fn test_sequence_floors_at_zero() {
    let harness = memory_harness();

    assert!(harness.quota.reduce(30));
    assert_eq!(harness.quota.remaining(), 70);
    assert!(harness.quota.reduce(40));
    assert_eq!(harness.quota.remaining(), 30);
    assert!(harness.quota.reduce(40));
    assert_eq!(harness.quota.remaining(), 0);

    assert!(harness.quota.reduce(1));
    assert_eq!(harness.quota.remaining(), 0);
}

#[test]
fn test_negative_reduction_is_ignored() {
    let harness = memory_harness();
    assert!(harness.quota.reduce(10));
    assert!(harness.quota.reduce(-5));
    assert_eq!(harness.quota.remaining(), 90);
    assert_eq!(harness.quota.try_reduce("-5"), Ok(true));
    assert_eq!(harness.quota.remaining(), 90);
}

#[test]
fn test_non_numeric_reduction_is_rejected() {
    let harness = memory_harness();
    assert!(harness.quota.reduce(10));

    let err = harness.quota.try_reduce("abc").unwrap_err();
    assert_eq!(err, QuotaError::InvalidAmount("abc".to_string()));
    assert_eq!(harness.quota.remaining(), 90);

    assert_eq!(harness.quota.try_reduce(" 15 "), Ok(true));
    assert_eq!(harness.quota.remaining(), 75);
}

#[test]
fn test_origin_limit_overrides_default() {
    let harness = memory_harness();
    harness
        .origins
        .replace(&[import_origin("ical", 50)])
        .expect("origins should be cached");

    assert_eq!(harness.quota.ceiling(), 50);
    assert_eq!(harness.quota.remaining(), 50);
}

#[test]
fn test_huge_origin_limit_counts_down_normally() {
    let harness = memory_harness();
    harness
        .origins
        .replace(&[import_origin("url", 10_000_000_000_000_000_000)])
        .unwrap();

    assert_eq!(harness.quota.ceiling(), 10_000_000_000_000_000_000);
    assert!(harness.quota.reduce(1));
    assert_eq!(harness.quota.remaining(), 9_999_999_999_999_999_999);

    let today_key = DailyQuota::key_for(harness.quota.today());
    assert_eq!(
        harness.store.get(&today_key).unwrap().as_deref(),
        Some("9999999999999999999")
    );
}

#[test]
fn test_lowered_ceiling_clamps_remaining() {
    let harness = memory_harness();
    assert!(harness.quota.reduce(10));
    assert_eq!(harness.quota.remaining(), 90);

    harness
        .origins
        .replace(&[import_origin("ical", 40)])
        .unwrap();
    assert_eq!(harness.quota.remaining(), 40);

    // The stored record keeps its value; only reads are clamped.
    harness.origins.purge().unwrap();
    assert_eq!(harness.quota.remaining(), 90);
}

#[test]
fn test_yesterday_does_not_leak_into_today() {
    let harness = memory_harness();
    assert!(harness.quota.reduce(100));
    assert_eq!(harness.quota.remaining(), 0);

    harness.clock.advance(chrono::Duration::hours(16));
    assert_eq!(harness.quota.remaining(), 100);
}

#[test]
fn test_record_expires_after_a_day() {
    let harness = memory_harness();
    let today_key = DailyQuota::key_for(harness.quota.today());
    assert!(harness.quota.reduce(25));
    assert_eq!(harness.store.get(&today_key).unwrap().as_deref(), Some("75"));

    harness.clock.advance(chrono::Duration::days(1));
    assert!(harness.store.get(&today_key).unwrap().is_none());
}

#[test]
fn test_day_boundary_follows_configured_offset() {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 11, 5, 22, 0, 0).unwrap(),
    ));
    let store: Arc<dyn TransientStore> =
        Arc::new(MemoryTransientStore::new(clock.clone() as Arc<dyn Clock>));
    let config = ImportQuotaConfig {
        utc_offset_minutes: 180,
        ..ImportQuotaConfig::default()
    };
    let harness = harness_with_store(clock, store, &config);

    assert_eq!(
        harness.quota.today(),
        chrono::NaiveDate::from_ymd_opt(2024, 11, 6).unwrap()
    );
}

struct ReadOnlyStore {
    inner: MemoryTransientStore,
}

impl TransientStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str, _ttl: Option<Duration>) -> Result<(), StorageError> {
        Err(StorageError::InvalidValue("store is read-only".into()))
    }

    fn delete(&self, _key: &str) -> Result<bool, StorageError> {
        Err(StorageError::InvalidValue("store is read-only".into()))
    }

    fn purge_expired(&self) -> Result<usize, StorageError> {
        Ok(0)
    }
}

#[test]
fn test_write_failure_reports_false() {
    let clock = start_clock();
    let store: Arc<dyn TransientStore> = Arc::new(ReadOnlyStore {
        inner: MemoryTransientStore::new(clock.clone() as Arc<dyn Clock>),
    });
    let harness = harness_with_store(clock, store, &ImportQuotaConfig::default());

    assert!(!harness.quota.reduce(5));
    assert_eq!(harness.quota.try_reduce("5"), Ok(false));
    assert!(!harness.quota.reset());
    assert_eq!(harness.quota.remaining(), 100);
}

#[test]
fn test_sqlite_backend_persists_across_instances() {
    let temp = tempdir().expect("failed to create temp dir");
    let clock = start_clock();
    let config = ImportQuotaConfig::default();

    {
        let store: Arc<dyn TransientStore> = Arc::new(
            SqliteTransientStore::new(temp.path().to_path_buf(), clock.clone()).unwrap(),
        );
        let harness = harness_with_store(clock.clone(), store, &config);
        assert!(harness.quota.reduce(30));
        assert!(harness.quota.reduce(40));
    }

    let store: Arc<dyn TransientStore> =
        Arc::new(SqliteTransientStore::new(temp.path().to_path_buf(), clock.clone()).unwrap());
    let harness = harness_with_store(clock, store, &config);
    assert_eq!(harness.quota.remaining(), 30);
    assert!(harness.quota.reduce(40));
    assert_eq!(harness.quota.remaining(), 0);

    harness.clock.advance(chrono::Duration::days(1));
    assert_eq!(harness.quota.remaining(), 100);
}
