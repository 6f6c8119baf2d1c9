//! 访问记录核心
//!
//! - `hittable`: 多态目标（实体类型 + 主键）
//! - `context`: 访问上下文与覆盖字段
//! - `recorder`: 过滤与写入管线
//! - `tracker` / `ranking` / `scope`: 聚合查询
//! - `retention`: 过期清理

pub mod bot;
pub mod context;
pub mod hittable;
pub mod ranking;
pub mod recorder;
pub mod retention;
pub mod scope;
pub mod tracker;

pub use bot::BotFilter;
pub use context::{HitOverrides, VisitContext};
pub use hittable::{Hittable, HittableKind, HittableRef};
pub use ranking::HitRanking;
pub use recorder::{HitDecision, HitRecorder, SkipReason};
pub use retention::RetentionSweep;
pub use scope::HitScope;
pub use tracker::HitTracker;

use std::sync::Arc;

use chrono::FixedOffset;
use tracing::info;

use crate::config::{HitsConfig, validators::validate_hits_config};
use crate::errors::{HitError, Result};
use crate::storage::SeaOrmStorage;

/// 访问记录服务入口
///
/// 持有存储与一份不可变的配置，按需借出 recorder / tracker / ranking。
#[derive(Clone)]
pub struct HitService {
    storage: Arc<SeaOrmStorage>,
    config: Arc<HitsConfig>,
    bot_filter: Arc<BotFilter>,
    offset: FixedOffset,
}

impl HitService {
    /// 配置不合法时返回 `HitError::Config`
    pub fn new(storage: Arc<SeaOrmStorage>, config: HitsConfig) -> Result<Self> {
        validate_hits_config(&config).map_err(|errors| HitError::config(errors.join("; ")))?;
        let offset = config.utc_offset().map_err(HitError::config)?;
        let bot_filter = BotFilter::from_config(&config);

        Ok(Self {
            storage,
            config: Arc::new(config),
            bot_filter: Arc::new(bot_filter),
            offset,
        })
    }

    /// 使用全局配置中的 `[hits]`
    pub fn from_global_config(storage: Arc<SeaOrmStorage>) -> Result<Self> {
        let config = crate::config::get_config();
        Self::new(storage, config.hits.clone())
    }

    pub fn config(&self) -> &HitsConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<SeaOrmStorage> {
        &self.storage
    }

    pub fn utc_offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn recorder(&self) -> HitRecorder<'_> {
        HitRecorder::new(&self.storage, &self.config, &self.bot_filter)
    }

    pub fn tracker<H: Hittable>(&self, entity: &H) -> HitTracker<'_> {
        self.tracker_for(entity.hittable_ref())
    }

    pub fn tracker_for(&self, target: HittableRef) -> HitTracker<'_> {
        HitTracker::new(&self.storage, target, self.offset)
    }

    pub fn ranking(&self) -> HitRanking<'_> {
        HitRanking::new(&self.storage)
    }

    pub fn retention(&self) -> RetentionSweep {
        RetentionSweep::new(self.storage.clone()).with_batch_size(self.config.cleanup_batch_size)
    }

    /// `hits.retention_days > 0` 时启动后台清理
    pub fn spawn_retention_task(&self, interval_hours: u64) -> Option<tokio::task::JoinHandle<()>> {
        if self.config.retention_days == 0 {
            info!("Hit retention disabled (hits.retention_days = 0)");
            return None;
        }
        Some(Arc::new(self.retention()).spawn_background_task(self.config.retention_days, interval_hours))
    }
}
