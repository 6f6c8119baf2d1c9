//! 过期访问记录清理
//!
//! 按 id 升序分批删除 `created_at < now - retention_days` 的记录，
//! 避免单个长事务锁表。

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::errors::{HitError, Result};
use crate::storage::SeaOrmStorage;

pub const DEFAULT_BATCH_SIZE: u64 = 10_000;

/// 两批之间的暂停，给其他写入让路
const BATCH_PAUSE: StdDuration = StdDuration::from_millis(50);

pub struct RetentionSweep {
    storage: Arc<SeaOrmStorage>,
    batch_size: u64,
}

impl RetentionSweep {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            storage,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// 0 视为默认值
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = if batch_size == 0 {
            DEFAULT_BATCH_SIZE
        } else {
            batch_size
        };
        self
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// 删除早于 `retention_days` 天的记录，返回删除总数
    pub async fn cleanup(&self, retention_days: i64) -> Result<u64> {
        if retention_days <= 0 {
            return Err(HitError::validation(format!(
                "retention days must be a positive integer, got {}",
                retention_days
            )));
        }

        let cutoff = Duration::try_days(retention_days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| {
                HitError::validation(format!("retention days out of range: {}", retention_days))
            })?;

        let deleted = self.cleanup_before(cutoff).await?;
        info!(
            "Hit retention sweep finished: deleted {} hits older than {} days",
            deleted, retention_days
        );
        Ok(deleted)
    }

    /// 删除 `created_at < cutoff` 的记录
    pub async fn cleanup_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut total_deleted = 0u64;
        let mut batches = 0u64;

        loop {
            let deleted = self
                .storage
                .delete_hits_batch_before(cutoff, self.batch_size)
                .await?;
            if deleted == 0 {
                break;
            }

            total_deleted += deleted;
            batches += 1;
            debug!(
                "Hit retention batch {}: deleted {} rows (total {})",
                batches, deleted, total_deleted
            );

            if deleted < self.batch_size {
                break;
            }

            tokio::time::sleep(BATCH_PAUSE).await;
        }

        Ok(total_deleted)
    }

    /// 启动后台清理任务，每 `interval_hours` 小时运行一次
    pub fn spawn_background_task(
        self: Arc<Self>,
        retention_days: u32,
        interval_hours: u64,
    ) -> JoinHandle<()> {
        let interval = StdDuration::from_secs(interval_hours.max(1) * 60 * 60);

        let handle = tokio::spawn(async move {
            loop {
                if let Err(e) = self.cleanup(i64::from(retention_days)).await {
                    error!("Hit retention sweep failed: {}", e);
                }

                tokio::time::sleep(interval).await;
            }
        });

        info!(
            "Hit retention task started (keep {} days, interval: {} hours)",
            retention_days, interval_hours
        );
        handle
    }
}
