//! 单个实体的聚合统计

use std::net::IpAddr;

use chrono::{FixedOffset, Utc};

use super::{HitScope, HittableRef};
use crate::errors::Result;
use crate::storage::{HitRecord, SeaOrmStorage};
use crate::utils::TimeWindow;

pub struct HitTracker<'a> {
    storage: &'a SeaOrmStorage,
    target: HittableRef,
    offset: FixedOffset,
}

impl<'a> HitTracker<'a> {
    pub fn new(storage: &'a SeaOrmStorage, target: HittableRef, offset: FixedOffset) -> Self {
        Self {
            storage,
            target,
            offset,
        }
    }

    pub fn target(&self) -> &HittableRef {
        &self.target
    }

    fn scope(&self) -> HitScope {
        HitScope::target(&self.target)
    }

    pub async fn total_hits_count(&self) -> Result<u64> {
        self.storage.count_hits(&self.scope()).await
    }

    /// 应用时区下的当天
    pub async fn today_hits_count(&self) -> Result<u64> {
        let window = TimeWindow::today(Utc::now(), self.offset);
        self.storage.count_hits(&self.scope().within(window)).await
    }

    /// 本周（周一开始）
    pub async fn this_week_hits_count(&self) -> Result<u64> {
        let window = TimeWindow::this_week(Utc::now(), self.offset);
        self.storage.count_hits(&self.scope().within(window)).await
    }

    pub async fn this_month_hits_count(&self) -> Result<u64> {
        let window = TimeWindow::this_month(Utc::now(), self.offset);
        self.storage.count_hits(&self.scope().within(window)).await
    }

    /// `created_at >= now - days`
    pub async fn last_days_count(&self, days: u32) -> Result<u64> {
        self.storage
            .count_hits(&self.scope().last_days(days))
            .await
    }

    pub async fn unique_visitors_count(&self) -> Result<u64> {
        self.storage.count_distinct_ips(&self.scope()).await
    }

    pub async fn has_been_hit_by(&self, ip: IpAddr) -> Result<bool> {
        self.storage.hit_exists(&self.scope().from_ip(ip)).await
    }

    /// 该实体在 `scope` 内的记录，最新的在前
    ///
    /// `scope` 自带的目标会被替换为当前实体。
    pub async fn hits(&self, scope: HitScope) -> Result<Vec<HitRecord>> {
        self.storage
            .find_hits(&scope.for_target(&self.target), None)
            .await
    }

    /// 同 `hits`，只取前 `limit` 条
    pub async fn latest_hits(&self, scope: HitScope, limit: u64) -> Result<Vec<HitRecord>> {
        self.storage
            .find_hits(&scope.for_target(&self.target), Some(limit))
            .await
    }

    pub async fn count(&self, scope: HitScope) -> Result<u64> {
        self.storage
            .count_hits(&scope.for_target(&self.target))
            .await
    }
}
