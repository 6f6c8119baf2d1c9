//! Mutation operations for SeaOrmStorage
//!
//! Hits are append-only: the only writes are single inserts and
//! age-based bulk deletes.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::debug;

use super::converters::{model_to_hit_record, new_hit_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{HitError, Result};
use crate::storage::{HitRecord, NewHit};

use migration::entities::hit;

impl SeaOrmStorage {
    /// 插入一条访问记录，`created_at` 由调用方给出
    pub async fn insert_hit(&self, new_hit: &NewHit, created_at: DateTime<Utc>) -> Result<HitRecord> {
        let db = &self.db;
        let active_model = new_hit_to_active_model(new_hit, created_at);

        let model = retry::with_retry(
            &format!("insert_hit({})", new_hit.target),
            self.retry_config,
            || async { active_model.clone().insert(db).await },
        )
        .await
        .map_err(|e| HitError::database_operation(format!("写入访问记录失败: {}", e)))?;

        debug!("Hit #{} recorded for {}", model.id, new_hit.target);
        Ok(model_to_hit_record(model))
    }

    /// 删除一批 `created_at < cutoff` 的记录（按 id 升序），返回删除数量
    pub async fn delete_hits_batch_before(
        &self,
        cutoff: DateTime<Utc>,
        batch_size: u64,
    ) -> Result<u64> {
        let db = &self.db;

        let ids: Vec<i64> = retry::with_retry("select_expired_hits", self.retry_config, || async {
            hit::Entity::find()
                .select_only()
                .column(hit::Column::Id)
                .filter(hit::Column::CreatedAt.lt(cutoff))
                .order_by_asc(hit::Column::Id)
                .limit(batch_size)
                .into_tuple::<i64>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| HitError::database_operation(format!("查询过期访问记录失败: {}", e)))?;

        if ids.is_empty() {
            return Ok(0);
        }

        let result = retry::with_retry("delete_expired_hits", self.retry_config, || async {
            hit::Entity::delete_many()
                .filter(hit::Column::Id.is_in(ids.clone()))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| HitError::database_operation(format!("删除过期访问记录失败: {}", e)))?;

        Ok(result.rows_affected)
    }
}
