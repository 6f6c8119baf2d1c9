use chrono::{DateTime, Utc};

use crate::storage::{HitRecord, NewHit};
use crate::utils::truncate_chars;
use migration::entities::hit;

/// referer 列长度上限
pub const REFERER_MAX_CHARS: usize = 500;
/// method 列长度上限
pub const METHOD_MAX_CHARS: usize = 10;

/// 将 Sea-ORM Model 转换为 HitRecord
pub fn model_to_hit_record(model: hit::Model) -> HitRecord {
    HitRecord {
        id: model.id,
        hittable_type: model.hittable_type,
        hittable_id: model.hittable_id,
        ip: model.ip,
        user_agent: model.user_agent,
        user_id: model.user_id,
        referer: model.referer,
        method: model.method,
        url: model.url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 将 NewHit 转换为 ActiveModel，超长字段按列宽截断
pub fn new_hit_to_active_model(new_hit: &NewHit, created_at: DateTime<Utc>) -> hit::ActiveModel {
    use sea_orm::ActiveValue::*;

    hit::ActiveModel {
        id: NotSet,
        hittable_type: Set(new_hit.target.kind().to_string()),
        hittable_id: Set(new_hit.target.id()),
        ip: Set(new_hit.ip.to_string()),
        user_agent: Set(new_hit.user_agent.clone()),
        user_id: Set(new_hit.user_id),
        referer: Set(new_hit
            .referer
            .as_deref()
            .map(|r| truncate_chars(r, REFERER_MAX_CHARS))),
        method: Set(truncate_chars(&new_hit.method, METHOD_MAX_CHARS).to_uppercase()),
        url: Set(new_hit.url.clone()),
        created_at: Set(created_at),
        updated_at: Set(created_at),
    }
}
