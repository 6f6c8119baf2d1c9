use std::net::IpAddr;

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::hits::HittableRef;

/// 一条已持久化的访问记录（创建后不可修改）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitRecord {
    pub id: i64,
    pub hittable_type: String,
    pub hittable_id: i64,
    pub ip: String,
    pub user_agent: String,
    pub user_id: Option<i64>,
    pub referer: Option<String>,
    pub method: String,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HitRecord {
    pub fn target(&self) -> HittableRef {
        HittableRef::new(self.hittable_type.clone(), self.hittable_id)
    }

    pub fn ip_addr(&self) -> Option<IpAddr> {
        self.ip.parse().ok()
    }
}

/// 待插入的访问记录（已合并覆盖字段）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHit {
    pub target: HittableRef,
    pub ip: IpAddr,
    pub user_agent: String,
    pub user_id: Option<i64>,
    pub referer: Option<String>,
    pub method: String,
    pub url: Option<String>,
}

/// 排行查询结果行：实体主键 + 命中次数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct RankedEntity {
    pub id: i64,
    pub hits_count: i64,
}
