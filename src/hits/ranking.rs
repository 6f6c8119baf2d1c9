//! 按命中次数对实体排行
//!
//! popular 统计全部记录，trending 只统计最近 N 天的记录。
//! 两者都包含没有任何记录的实体（计数为 0）。

use chrono::Utc;

use super::{Hittable, HittableKind};
use crate::errors::Result;
use crate::storage::{RankedEntity, SeaOrmStorage};
use crate::utils::time_window::days_ago;

pub struct HitRanking<'a> {
    storage: &'a SeaOrmStorage,
}

impl<'a> HitRanking<'a> {
    pub fn new(storage: &'a SeaOrmStorage) -> Self {
        Self { storage }
    }

    pub async fn popular<H: Hittable>(&self, limit: u64) -> Result<Vec<RankedEntity>> {
        self.popular_kind(&H::KIND, limit).await
    }

    pub async fn trending<H: Hittable>(&self, days: u32, limit: u64) -> Result<Vec<RankedEntity>> {
        self.trending_kind(&H::KIND, days, limit).await
    }

    pub async fn popular_kind(&self, kind: &HittableKind, limit: u64) -> Result<Vec<RankedEntity>> {
        self.storage.rank_entities(kind, None, limit).await
    }

    pub async fn trending_kind(
        &self,
        kind: &HittableKind,
        days: u32,
        limit: u64,
    ) -> Result<Vec<RankedEntity>> {
        let since = days_ago(Utc::now(), days);
        self.storage.rank_entities(kind, Some(since), limit).await
    }
}
