use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::time_window::local_midnight_to_utc;
use crate::errors::{HitError, Result};

/// Parses user-supplied date bounds for range queries.
pub struct TimeParser;

impl TimeParser {
    /// 解析时间字符串，支持多种格式：
    /// - RFC3339 格式：2025-08-08T12:00:00Z
    /// - 本地时间：2025-08-08 12:00:00（按 `offset` 解释）
    /// - 日期：2025-08-08（当天 00:00，按 `offset` 解释）
    pub fn parse_datetime(input: &str, offset: FixedOffset) -> Result<DateTime<Utc>> {
        let input = input.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(dt.with_timezone(&Utc));
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
            return offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| HitError::date_parse(format!("Ambiguous local time: '{}'", input)));
        }

        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|e| {
            HitError::date_parse(format!(
                "Invalid date '{}': {}. Expected RFC3339, 'YYYY-MM-DD HH:MM:SS' or 'YYYY-MM-DD'",
                input, e
            ))
        })?;
        Ok(local_midnight_to_utc(date, offset))
    }
}
