//! 时间工具函数 — 业务时区转换
//!
//! 所有日期→时间戳转换统一在 API handler 层完成，
//! repository 层只接收 `i64` Unix millis。

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::utils::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{field} has invalid date format: {date}")))
}

/// 解析 RFC 3339 时间戳字符串 → Unix millis
pub fn parse_rfc3339_millis(value: &str, field: &str) -> AppResult<i64> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp_millis())
        .map_err(|_| {
            AppError::validation(format!(
                "{field} must be an RFC 3339 timestamp, got '{value}'"
            ))
        })
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Jakarta;

    #[test]
    fn parses_plain_dates() {
        let d = parse_date("2025-04-17", "from").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 4, 17).unwrap());
        assert!(parse_date("17-04-2025", "from").is_err());
    }

    #[test]
    fn day_bounds_are_exclusive_end() {
        let d = NaiveDate::from_ymd_opt(2025, 4, 17).unwrap();
        let start = day_start_millis(d, Jakarta);
        let end = day_end_millis(d, Jakarta);
        assert_eq!(end - start, 24 * 3600 * 1000);
    }

    #[test]
    fn parses_rfc3339() {
        let ms = parse_rfc3339_millis("2025-04-17T08:30:00+07:00", "processedAt").unwrap();
        assert!(ms > 0);
        let err = parse_rfc3339_millis("yesterday", "processedAt").unwrap_err();
        assert!(err.to_string().contains("processedAt"));
    }
}
