//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Alias, Expr, Func, JoinType, Order, Query};
use sea_orm::{
    DbBackend, EntityTrait, ExprTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Statement,
};
use tracing::debug;

use super::converters::model_to_hit_record;
use super::{SeaOrmStorage, retry};
use crate::errors::{HitError, Result};
use crate::hits::{HitScope, HittableKind};
use crate::storage::{HitRecord, RankedEntity};

use migration::entities::hit;

impl SeaOrmStorage {
    /// 统计匹配范围的记录数
    pub async fn count_hits(&self, scope: &HitScope) -> Result<u64> {
        let db = &self.db;
        let condition = scope.to_condition();

        retry::with_retry("count_hits", self.retry_config, || async {
            hit::Entity::find()
                .filter(condition.clone())
                .count(db)
                .await
        })
        .await
        .map_err(|e| HitError::database_operation(format!("统计访问记录失败: {}", e)))
    }

    /// 统计匹配范围内的不同 IP 数
    pub async fn count_distinct_ips(&self, scope: &HitScope) -> Result<u64> {
        let db = &self.db;
        let condition = scope.to_condition();

        let count: Option<i64> =
            retry::with_retry("count_distinct_ips", self.retry_config, || async {
                hit::Entity::find()
                    .select_only()
                    .column_as(Expr::cust("COUNT(DISTINCT ip)"), "count")
                    .filter(condition.clone())
                    .into_tuple::<i64>()
                    .one(db)
                    .await
            })
            .await
            .map_err(|e| HitError::database_operation(format!("统计独立访客失败: {}", e)))?;

        Ok(Ord::max(count.unwrap_or(0), 0) as u64)
    }

    /// 是否存在匹配范围的记录（只取一行）
    pub async fn hit_exists(&self, scope: &HitScope) -> Result<bool> {
        let db = &self.db;
        let condition = scope.to_condition();

        let found: Option<i64> = retry::with_retry("hit_exists", self.retry_config, || async {
            hit::Entity::find()
                .select_only()
                .column(hit::Column::Id)
                .filter(condition.clone())
                .limit(1)
                .into_tuple::<i64>()
                .one(db)
                .await
        })
        .await
        .map_err(|e| HitError::database_operation(format!("查询访问记录失败: {}", e)))?;

        Ok(found.is_some())
    }

    /// 列出匹配范围的记录，最新的在前
    pub async fn find_hits(&self, scope: &HitScope, limit: Option<u64>) -> Result<Vec<HitRecord>> {
        let db = &self.db;
        let condition = scope.to_condition();

        let models = retry::with_retry("find_hits", self.retry_config, || async {
            hit::Entity::find()
                .filter(condition.clone())
                .order_by_desc(hit::Column::CreatedAt)
                .order_by_desc(hit::Column::Id)
                .limit(limit)
                .all(db)
                .await
        })
        .await
        .map_err(|e| HitError::database_operation(format!("查询访问记录失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_hit_record).collect())
    }

    /// 按命中次数对某类实体排行
    ///
    /// 以实体表 LEFT JOIN hits，没有命中的实体计数为 0 且仍然出现在结果中。
    /// `since` 只限制参与计数的记录，不过滤实体本身。
    /// 次数相同按主键升序。
    pub async fn rank_entities(
        &self,
        kind: &HittableKind,
        since: Option<DateTime<Utc>>,
        limit: u64,
    ) -> Result<Vec<RankedEntity>> {
        let statement = rank_statement(self.db_backend(), kind, since, limit);
        debug!("rank_entities({}): {}", kind.name, statement);

        let db = &self.db;
        retry::with_retry("rank_entities", self.retry_config, || async {
            RankedEntity::find_by_statement(statement.clone())
                .all(db)
                .await
        })
        .await
        .map_err(|e| HitError::database_operation(format!("排行查询失败: {}", e)))
    }

    fn db_backend(&self) -> DbBackend {
        match self.backend_name.as_str() {
            "sqlite" => DbBackend::Sqlite,
            "mysql" => DbBackend::MySql,
            _ => DbBackend::Postgres,
        }
    }
}

/// 构建排行 SQL
///
/// Postgres 的 SERIAL 主键是 INT4，不能解码为 i64，所以 id 列显式转为 BIGINT。
/// MySQL 的 CAST 不接受 BIGINT，且其整数类型都能直接解码。
fn rank_statement(
    backend: DbBackend,
    kind: &HittableKind,
    since: Option<DateTime<Utc>>,
    limit: u64,
) -> Statement {
    let table = Alias::new(kind.table);
    let pk = Alias::new(kind.primary_key);

    let mut join_on = Expr::col((hit::Entity, hit::Column::HittableId))
        .equals((table.clone(), pk.clone()))
        .and(Expr::col((hit::Entity, hit::Column::HittableType)).eq(kind.name));
    if let Some(since) = since {
        join_on = join_on.and(Expr::col((hit::Entity, hit::Column::CreatedAt)).gte(since));
    }

    let id_expr = match backend {
        DbBackend::Postgres => {
            Expr::col((table.clone(), pk.clone())).cast_as(Alias::new("BIGINT"))
        }
        _ => Expr::col((table.clone(), pk.clone())),
    };

    let query = Query::select()
        .expr_as(id_expr, Alias::new("id"))
        .expr_as(
            Func::count(Expr::col((hit::Entity, hit::Column::Id))),
            Alias::new("hits_count"),
        )
        .from(table.clone())
        .join(JoinType::LeftJoin, hit::Entity, join_on)
        .group_by_col((table.clone(), pk.clone()))
        .order_by_expr(Expr::cust("hits_count"), Order::Desc)
        .order_by((table, pk), Order::Asc)
        .limit(limit)
        .to_owned();

    backend.build(&query)
}
