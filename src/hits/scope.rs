//! 可组合的查询范围
//!
//! 每个条件都收窄结果集；多个时间条件取交集。

use std::net::IpAddr;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ColumnTrait, Condition};

use crate::errors::{HitError, Result};
use crate::hits::HittableRef;
use crate::utils::{TimeParser, TimeWindow, time_window::days_ago};

use migration::entities::hit;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitScope {
    target: Option<HittableRef>,
    kind: Option<String>,
    ip: Option<String>,
    user_id: Option<i64>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
}

impl HitScope {
    /// 不加任何条件
    pub fn all() -> Self {
        Self::default()
    }

    pub fn target(target: &HittableRef) -> Self {
        Self::all().for_target(target)
    }

    pub fn for_target(mut self, target: &HittableRef) -> Self {
        self.target = Some(target.clone());
        self
    }

    /// 某一类实体的全部记录
    pub fn of_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn from_ip(mut self, ip: IpAddr) -> Self {
        self.ip = Some(ip.to_string());
        self
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn from_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// `created_at >= since`
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.from = Some(self.from.map_or(since, |from| from.max(since)));
        self
    }

    /// `created_at <= until`
    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.to = Some(self.to.map_or(until, |to| to.min(until)));
        self
    }

    /// 闭区间 `[start, end]`，`start > end` 直接报错
    pub fn between_dates(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(HitError::validation(format!(
                "Invalid date range: start {} is after end {}",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }
        Ok(self.since(start).until(end))
    }

    /// 解析字符串后调用 `between_dates`
    ///
    /// 支持 RFC 3339、`YYYY-MM-DD HH:MM:SS` 与 `YYYY-MM-DD`，
    /// 不带时区的输入按 `offset` 解释。
    pub fn between_date_strs(self, start: &str, end: &str, offset: FixedOffset) -> Result<Self> {
        let start = TimeParser::parse_datetime(start, offset)?;
        let end = TimeParser::parse_datetime(end, offset)?;
        self.between_dates(start, end)
    }

    pub fn within(self, window: TimeWindow) -> Self {
        self.since(window.start).until(window.end)
    }

    pub fn last_days(self, days: u32) -> Self {
        self.since(days_ago(Utc::now(), days))
    }

    pub fn today(self, offset: FixedOffset) -> Self {
        self.within(TimeWindow::today(Utc::now(), offset))
    }

    pub fn this_week(self, offset: FixedOffset) -> Self {
        self.within(TimeWindow::this_week(Utc::now(), offset))
    }

    pub fn this_month(self, offset: FixedOffset) -> Self {
        self.within(TimeWindow::this_month(Utc::now(), offset))
    }

    pub fn get_target(&self) -> Option<&HittableRef> {
        self.target.as_ref()
    }

    pub fn bounds(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        (self.from, self.to)
    }

    pub fn to_condition(&self) -> Condition {
        let mut condition = Condition::all();

        if let Some(target) = &self.target {
            condition = condition
                .add(hit::Column::HittableType.eq(target.kind()))
                .add(hit::Column::HittableId.eq(target.id()));
        }
        if let Some(kind) = &self.kind {
            condition = condition.add(hit::Column::HittableType.eq(kind.as_str()));
        }
        if let Some(ip) = &self.ip {
            condition = condition.add(hit::Column::Ip.eq(ip.as_str()));
        }
        if let Some(user_id) = self.user_id {
            condition = condition.add(hit::Column::UserId.eq(user_id));
        }
        if let Some(from) = self.from {
            condition = condition.add(hit::Column::CreatedAt.gte(from));
        }
        if let Some(to) = self.to {
            condition = condition.add(hit::Column::CreatedAt.lte(to));
        }

        condition
    }
}
