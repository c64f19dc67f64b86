//! 时间类型模块
//!
//! 后端以 ISO 字符串传输时间（有的带时区，有的是 naive UTC）。
//! `Timestamp` 保留原始线上值，按需解析，解析失败不致崩溃。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// 线上时间戳
///
/// 内部存储为原始字符串，序列化透明。排序与显示都走 [`Timestamp::parse_utc`]，
/// 无法解析的值排在最旧一端并按原文显示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// 解析为 UTC 时间
    ///
    /// 依次尝试 RFC 3339、无时区的 ISO 格式（按 UTC 处理）。
    pub fn parse_utc(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.0) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&self.0, fmt) {
                return Some(naive.and_utc());
            }
        }
        None
    }

    /// 排序键：无法解析的时间戳视为最旧
    pub fn sort_key(&self) -> i64 {
        self.parse_utc().map(|dt| dt.timestamp_millis()).unwrap_or(i64::MIN)
    }

    /// 人类可读的短格式；解析失败时原样返回
    pub fn display(&self) -> String {
        match self.parse_utc() {
            Some(dt) => dt.format("%d %b %Y %H:%M").to_string(),
            None if self.is_empty() => "-".to_string(),
            None => self.0.clone(),
        }
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let ts = Timestamp::new("2025-03-14T09:26:53Z");
        let dt = ts.parse_utc().unwrap();
        assert_eq!(dt.timestamp(), 1741944413);
    }

    #[test]
    fn parses_naive_as_utc() {
        // FastAPI serializes datetime.utcnow() without a timezone suffix.
        let ts = Timestamp::new("2025-03-14T09:26:53.123456");
        assert!(ts.parse_utc().is_some());
    }

    #[test]
    fn garbage_sorts_oldest_and_displays_raw() {
        let ts = Timestamp::new("not a date");
        assert_eq!(ts.parse_utc(), None);
        assert_eq!(ts.sort_key(), i64::MIN);
        assert_eq!(ts.display(), "not a date");
    }

    #[test]
    fn empty_displays_dash() {
        assert_eq!(Timestamp::default().display(), "-");
    }

    #[test]
    fn sort_key_orders_chronologically() {
        let earlier = Timestamp::new("2025-03-14T09:00:00Z");
        let later = Timestamp::new("2025-03-14T10:00:00Z");
        assert!(earlier.sort_key() < later.sort_key());
    }
}
