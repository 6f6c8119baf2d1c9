//! Aggregate query tests
//!
//! Per-entity counters and composable scopes.

use std::net::IpAddr;
use std::sync::{Arc, Once};

use chrono::{DateTime, Duration, FixedOffset, Utc};
use hitcounter::HitError;
use hitcounter::config::{HitsConfig, init_config};
use hitcounter::hits::{HitOverrides, HitScope, HitService, Hittable, HittableKind, HittableRef, VisitContext};
use hitcounter::storage::SeaOrmStorage;
use hitcounter::utils::TimeWindow;
use tempfile::TempDir;

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config("config.toml");
    });
}

async fn create_service() -> (HitService, TempDir) {
    create_service_with(HitsConfig::default()).await
}

async fn create_service_with(config: HitsConfig) -> (HitService, TempDir) {
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

struct Article {
    id: i64,
}

impl Hittable for Article {
    const KIND: HittableKind = HittableKind::new("article", "articles");

    fn hittable_id(&self) -> i64 {
        self.id
    }
}

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

/// 以指定时间写入一条记录（绕过管线，用于构造历史数据）
async fn insert_at(service: &HitService, target: &HittableRef, visit: &VisitContext, age: Duration) {
    let new_hit = HitOverrides::none().apply(target, visit);
    service
        .storage()
        .insert_hit(&new_hit, Utc::now() - age)
        .await
        .expect("insert hit");
}

async fn insert_exactly(service: &HitService, target: &HittableRef, created_at: DateTime<Utc>) {
    let new_hit = HitOverrides::none().apply(target, &VisitContext::new(ip("10.0.0.1")));
    service
        .storage()
        .insert_hit(&new_hit, created_at)
        .await
        .expect("insert hit");
}

/// 窗口两端各写一条，再各往外 1ns 写一条
async fn insert_around(service: &HitService, target: &HittableRef, window: TimeWindow) {
    insert_exactly(service, target, window.start).await;
    insert_exactly(service, target, window.end).await;
    insert_exactly(service, target, window.start - Duration::nanoseconds(1)).await;
    insert_exactly(service, target, window.end + Duration::nanoseconds(1)).await;
}

async fn insert_now(service: &HitService, target: &HittableRef, addr: &str) {
    service
        .recorder()
        .record_hit_unconditional(target, &VisitContext::new(ip(addr)), &HitOverrides::none())
        .await
        .expect("insert hit");
}

#[tokio::test]
async fn test_entity_without_hits_reads_zero() {
    let (service, _dir) = create_service().await;
    let tracker = service.tracker(&Article { id: 404 });

    assert_eq!(tracker.total_hits_count().await.unwrap(), 0);
    assert_eq!(tracker.today_hits_count().await.unwrap(), 0);
    assert_eq!(tracker.this_week_hits_count().await.unwrap(), 0);
    assert_eq!(tracker.this_month_hits_count().await.unwrap(), 0);
    assert_eq!(tracker.last_days_count(7).await.unwrap(), 0);
    assert_eq!(tracker.unique_visitors_count().await.unwrap(), 0);
    assert!(!tracker.has_been_hit_by(ip("1.1.1.1")).await.unwrap());
    assert!(tracker.hits(HitScope::all()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_total_and_unique_visitors() {
    let (service, _dir) = create_service().await;
    let entity = Article { id: 1 };
    let target = entity.hittable_ref();

    insert_now(&service, &target, "10.0.0.1").await;
    insert_now(&service, &target, "10.0.0.1").await;
    insert_now(&service, &target, "10.0.0.2").await;
    // 其它实体的记录不计入
    insert_now(&service, &HittableRef::new("article", 2), "10.0.0.3").await;
    insert_now(&service, &HittableRef::new("video", 1), "10.0.0.4").await;

    let tracker = service.tracker(&entity);
    assert_eq!(tracker.total_hits_count().await.unwrap(), 3);
    assert_eq!(tracker.unique_visitors_count().await.unwrap(), 2);
    assert!(tracker.has_been_hit_by(ip("10.0.0.2")).await.unwrap());
    assert!(!tracker.has_been_hit_by(ip("10.0.0.3")).await.unwrap());
    assert!(!tracker.has_been_hit_by(ip("10.0.0.4")).await.unwrap());
}

#[tokio::test]
async fn test_calendar_windows() {
    let (service, _dir) = create_service().await;
    let target = HittableRef::new("article", 1);
    let visit = VisitContext::new(ip("10.0.0.1"));

    insert_now(&service, &target, "10.0.0.9").await;
    insert_at(&service, &target, &visit, Duration::days(8)).await;
    insert_at(&service, &target, &visit, Duration::days(40)).await;
    insert_at(&service, &target, &visit, Duration::days(400)).await;

    let tracker = service.tracker_for(target);
    assert_eq!(tracker.total_hits_count().await.unwrap(), 4);
    assert_eq!(tracker.today_hits_count().await.unwrap(), 1);
    // 8 天前一定不在本周；40 天前一定不在本月
    assert_eq!(tracker.this_week_hits_count().await.unwrap(), 1);
    let month = tracker.this_month_hits_count().await.unwrap();
    assert!((1..=2).contains(&month));
}

#[tokio::test]
async fn test_last_days_count() {
    let (service, _dir) = create_service().await;
    let target = HittableRef::new("article", 1);
    let visit = VisitContext::new(ip("10.0.0.1"));

    insert_now(&service, &target, "10.0.0.2").await;
    insert_at(&service, &target, &visit, Duration::days(1)).await;
    insert_at(&service, &target, &visit, Duration::days(3)).await;
    insert_at(&service, &target, &visit, Duration::days(10)).await;

    let tracker = service.tracker_for(target);
    assert_eq!(tracker.last_days_count(7).await.unwrap(), 3);
    assert_eq!(tracker.last_days_count(30).await.unwrap(), 4);
    assert_eq!(tracker.last_days_count(2).await.unwrap(), 2);
}

#[tokio::test]
async fn test_hits_newest_first() {
    let (service, _dir) = create_service().await;
    let target = HittableRef::new("article", 1);

    insert_at(&service, &target, &VisitContext::new(ip("10.0.0.1")), Duration::hours(3)).await;
    insert_at(&service, &target, &VisitContext::new(ip("10.0.0.2")), Duration::hours(1)).await;
    insert_at(&service, &target, &VisitContext::new(ip("10.0.0.3")), Duration::hours(2)).await;

    let tracker = service.tracker_for(target);
    let hits = tracker.hits(HitScope::all()).await.unwrap();
    let ips: Vec<&str> = hits.iter().map(|h| h.ip.as_str()).collect();
    assert_eq!(ips, vec!["10.0.0.2", "10.0.0.3", "10.0.0.1"]);

    let latest = tracker.latest_hits(HitScope::all(), 1).await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].ip, "10.0.0.2");
}

#[tokio::test]
async fn test_scopes_compose() {
    let (service, _dir) = create_service().await;
    let target = HittableRef::new("article", 1);
    let alice = VisitContext::new(ip("10.0.0.1")).with_user(Some(1));
    let bob = VisitContext::new(ip("10.0.0.2")).with_user(Some(2));

    insert_at(&service, &target, &alice, Duration::days(1)).await;
    insert_at(&service, &target, &alice, Duration::days(5)).await;
    insert_at(&service, &target, &bob, Duration::days(1)).await;
    insert_at(&service, &target, &bob, Duration::days(20)).await;

    let tracker = service.tracker_for(target);
    assert_eq!(tracker.count(HitScope::all().from_user(1)).await.unwrap(), 2);
    assert_eq!(tracker.count(HitScope::all().from_ip(ip("10.0.0.2"))).await.unwrap(), 2);
    assert_eq!(tracker.count(HitScope::all().last_days(7)).await.unwrap(), 3);
    assert_eq!(
        tracker
            .count(HitScope::all().from_user(2).last_days(7))
            .await
            .unwrap(),
        1
    );

    let now = Utc::now();
    let ranged = HitScope::all()
        .between_dates(now - Duration::days(6), now - Duration::days(2))
        .unwrap();
    let hits = tracker.hits(ranged).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].user_id, Some(1));

    // 作用于其它实体的 scope 会被替换成当前实体
    let other = HitScope::target(&HittableRef::new("article", 99));
    assert_eq!(tracker.count(other).await.unwrap(), 4);
}

#[tokio::test]
async fn test_between_dates_inclusive_bounds() {
    let (service, _dir) = create_service().await;
    let target = HittableRef::new("article", 1);
    let visit = VisitContext::new(ip("10.0.0.1"));
    let at = Utc::now() - Duration::days(2);

    let new_hit = HitOverrides::none().apply(&target, &visit);
    service.storage().insert_hit(&new_hit, at).await.unwrap();

    let tracker = service.tracker_for(target);
    let exact = HitScope::all().between_dates(at, at).unwrap();
    assert_eq!(tracker.count(exact).await.unwrap(), 1);
}

#[tokio::test]
async fn test_inverted_range_fails_before_query() {
    let now = Utc::now();
    let err = HitScope::all()
        .between_dates(now, now - Duration::days(1))
        .unwrap_err();
    assert!(matches!(err, HitError::Validation(_)));
}

#[tokio::test]
async fn test_between_date_strs() {
    let (service, _dir) = create_service().await;
    let target = HittableRef::new("article", 1);
    insert_now(&service, &target, "10.0.0.1").await;

    let offset = service.utc_offset();
    let today = Utc::now().with_timezone(&offset).format("%Y-%m-%d").to_string();
    let scope = HitScope::all()
        .between_date_strs("2000-01-01", &format!("{} 23:59:59", today), offset)
        .unwrap();
    assert_eq!(service.tracker_for(target).count(scope).await.unwrap(), 1);

    let err = HitScope::all()
        .between_date_strs("01/02/2024", "2024-02-01", offset)
        .unwrap_err();
    assert!(matches!(err, HitError::DateParse(_)));
}

#[tokio::test]
async fn test_calendar_window_edges_in_offset() {
    let (service, _dir) = create_service().await;
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();
    let now = Utc::now();

    let day = HittableRef::new("article", 1);
    let week = HittableRef::new("article", 2);
    let month = HittableRef::new("article", 3);
    insert_around(&service, &day, TimeWindow::today(now, offset)).await;
    insert_around(&service, &week, TimeWindow::this_week(now, offset)).await;
    insert_around(&service, &month, TimeWindow::this_month(now, offset)).await;

    let storage = service.storage();
    let today = HitScope::target(&day).today(offset);
    let this_week = HitScope::target(&week).this_week(offset);
    let this_month = HitScope::target(&month).this_month(offset);

    assert_eq!(storage.count_hits(&today).await.unwrap(), 2);
    assert_eq!(storage.count_hits(&this_week).await.unwrap(), 2);
    assert_eq!(storage.count_hits(&this_month).await.unwrap(), 2);
}

#[tokio::test]
async fn test_tracker_uses_configured_timezone() {
    let config = HitsConfig {
        timezone: "+08:00".to_string(),
        ..HitsConfig::default()
    };
    let (service, _dir) = create_service_with(config).await;
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();
    assert_eq!(service.utc_offset(), offset);

    let target = HittableRef::new("article", 7);
    let today = TimeWindow::today(Utc::now(), offset);
    insert_around(&service, &target, today).await;

    let tracker = service.tracker_for(target);
    assert_eq!(tracker.total_hits_count().await.unwrap(), 4);
    assert_eq!(tracker.today_hits_count().await.unwrap(), 2);
}
