//! 访问记录管线
//!
//! 顺序短路：仅登录用户 → 爬虫过滤 → 冷却期去重 → 写入。
//! 所有判断都基于合并覆盖字段后的实际值。
//!
//! 冷却期检查与写入不是原子的，同一 IP 的并发请求可能都被记录。

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::{BotFilter, HitOverrides, HitScope, HittableRef, VisitContext};
use crate::config::HitsConfig;
use crate::errors::Result;
use crate::storage::{HitRecord, NewHit, SeaOrmStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 开启了 authenticated_only 但没有 user_id
    Anonymous,
    Bot,
    Cooldown,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::Anonymous => "anonymous visitor",
            SkipReason::Bot => "bot user agent",
            SkipReason::Cooldown => "cooldown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitDecision {
    Record,
    Skip(SkipReason),
}

pub struct HitRecorder<'a> {
    storage: &'a SeaOrmStorage,
    config: &'a HitsConfig,
    bot_filter: &'a BotFilter,
}

impl<'a> HitRecorder<'a> {
    pub fn new(storage: &'a SeaOrmStorage, config: &'a HitsConfig, bot_filter: &'a BotFilter) -> Self {
        Self {
            storage,
            config,
            bot_filter,
        }
    }

    /// 只做判断，不写入
    pub async fn evaluate(
        &self,
        target: &HittableRef,
        visit: &VisitContext,
        overrides: &HitOverrides,
    ) -> Result<HitDecision> {
        let new_hit = overrides.apply(target, visit);
        self.decide(&new_hit, Utc::now()).await
    }

    /// 经过过滤后写入一条记录，被过滤时返回 `Ok(None)`
    pub async fn record_hit(
        &self,
        target: &HittableRef,
        visit: &VisitContext,
        overrides: &HitOverrides,
    ) -> Result<Option<HitRecord>> {
        let new_hit = overrides.apply(target, visit);

        match self.decide(&new_hit, Utc::now()).await? {
            HitDecision::Skip(_) => Ok(None),
            HitDecision::Record => self.storage.insert_hit(&new_hit, Utc::now()).await.map(Some),
        }
    }

    /// 跳过所有过滤直接写入
    pub async fn record_hit_unconditional(
        &self,
        target: &HittableRef,
        visit: &VisitContext,
        overrides: &HitOverrides,
    ) -> Result<HitRecord> {
        let new_hit = overrides.apply(target, visit);
        self.storage.insert_hit(&new_hit, Utc::now()).await
    }

    async fn decide(&self, new_hit: &NewHit, now: DateTime<Utc>) -> Result<HitDecision> {
        let decision = self.check(new_hit, now).await?;
        if let HitDecision::Skip(reason) = decision {
            debug!(
                "Hit on {} from {} skipped: {}",
                new_hit.target, new_hit.ip, reason
            );
        }
        Ok(decision)
    }

    async fn check(&self, new_hit: &NewHit, now: DateTime<Utc>) -> Result<HitDecision> {
        if self.config.authenticated_only && new_hit.user_id.is_none() {
            return Ok(HitDecision::Skip(SkipReason::Anonymous));
        }

        if self.config.ignore_bots && self.bot_filter.is_bot(&new_hit.user_agent) {
            return Ok(HitDecision::Skip(SkipReason::Bot));
        }

        if self.config.cooldown_minutes > 0 {
            let since = now - Duration::minutes(i64::from(self.config.cooldown_minutes));
            let scope = HitScope::target(&new_hit.target)
                .from_ip(new_hit.ip)
                .since(since);
            if self.storage.hit_exists(&scope).await? {
                return Ok(HitDecision::Skip(SkipReason::Cooldown));
            }
        }

        Ok(HitDecision::Record)
    }
}
