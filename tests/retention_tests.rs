//! Retention sweep tests

use std::net::IpAddr;
use std::sync::{Arc, Once};

use chrono::{Duration, Utc};
use hitcounter::HitError;
use hitcounter::config::{HitsConfig, init_config};
use hitcounter::hits::{HitOverrides, HitScope, HitService, HittableRef, RetentionSweep, VisitContext};
use hitcounter::storage::SeaOrmStorage;
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config("config.toml");
    });
}

async fn create_service(config: HitsConfig) -> (HitService, TempDir) {
    init_test_config();

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("hits.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");
    let service = HitService::new(Arc::new(storage), config).unwrap();

    (service, temp_dir)
}

async fn insert_aged(service: &HitService, count: usize, age: Duration) {
    let target = HittableRef::new("article", 1);
    for i in 0..count {
        let addr: IpAddr = format!("10.1.0.{}", i + 1).parse().unwrap();
        let new_hit = HitOverrides::none().apply(&target, &VisitContext::new(addr));
        service
            .storage()
            .insert_hit(&new_hit, Utc::now() - age)
            .await
            .unwrap();
    }
}

async fn total(service: &HitService) -> u64 {
    service.storage().count_hits(&HitScope::all()).await.unwrap()
}

#[tokio::test]
async fn test_cleanup_deletes_only_expired_hits() {
    let (service, _dir) = create_service(HitsConfig::default()).await;
    insert_aged(&service, 5, Duration::days(40)).await;
    insert_aged(&service, 2, Duration::days(29)).await;
    insert_aged(&service, 3, Duration::days(1)).await;

    let deleted = service.retention().cleanup(30).await.unwrap();

    assert_eq!(deleted, 5);
    assert_eq!(total(&service).await, 5);
    let cutoff = Utc::now() - Duration::days(30);
    let remaining = service
        .tracker_for(HittableRef::new("article", 1))
        .hits(HitScope::all())
        .await
        .unwrap();
    assert!(remaining.iter().all(|h| h.created_at >= cutoff));
}

#[tokio::test]
async fn test_cleanup_nothing_to_delete() {
    let (service, _dir) = create_service(HitsConfig::default()).await;
    insert_aged(&service, 2, Duration::hours(1)).await;

    assert_eq!(service.retention().cleanup(1).await.unwrap(), 0);
    assert_eq!(total(&service).await, 2);
}

#[tokio::test]
async fn test_cleanup_rejects_non_positive_days() {
    let (service, _dir) = create_service(HitsConfig::default()).await;
    insert_aged(&service, 3, Duration::days(400)).await;

    for days in [0, -1, -30] {
        let err = service.retention().cleanup(days).await.unwrap_err();
        assert!(matches!(err, HitError::Validation(_)));
    }
    assert_eq!(total(&service).await, 3);
}

#[tokio::test]
async fn test_cleanup_runs_multiple_batches() {
    let config = HitsConfig {
        cleanup_batch_size: 2,
        ..Default::default()
    };
    let (service, _dir) = create_service(config).await;
    insert_aged(&service, 7, Duration::days(90)).await;
    insert_aged(&service, 1, Duration::days(2)).await;

    let sweep = service.retention();
    assert_eq!(sweep.batch_size(), 2);
    assert_eq!(sweep.cleanup(30).await.unwrap(), 7);
    assert_eq!(total(&service).await, 1);
}

#[tokio::test]
async fn test_zero_batch_size_falls_back_to_default() {
    let (service, _dir) = create_service(HitsConfig::default()).await;
    let sweep = RetentionSweep::new(service.storage().clone()).with_batch_size(0);
    assert_eq!(sweep.batch_size(), 10_000);
}

#[tokio::test]
async fn test_retention_task_disabled_by_default() {
    let (service, _dir) = create_service(HitsConfig::default()).await;
    assert!(service.spawn_retention_task(24).is_none());
}

#[tokio::test]
async fn test_background_task_runs_first_sweep_immediately() {
    let config = HitsConfig {
        retention_days: 30,
        ..Default::default()
    };
    let (service, _dir) = create_service(config).await;
    insert_aged(&service, 4, Duration::days(60)).await;

    let handle = service.spawn_retention_task(24).expect("task enabled");
    let mut remaining = total(&service).await;
    for _ in 0..50 {
        if remaining == 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        remaining = total(&service).await;
    }
    handle.abort();

    assert_eq!(remaining, 0);
}
