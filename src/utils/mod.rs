//! 시간 관련 유틸리티
//!
//! 날짜 변환, 조회 구간 계산 함수 제공

pub mod logging;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::error::ScreenerError;

/// 오늘 날짜 (UTC)
pub fn today() -> NaiveDate {
  Utc::now().date_naive()
}

/// YYYY-MM-DD 문자열을 날짜로 변환
pub fn parse_date(value: &str) -> Result<NaiveDate, ScreenerError> {
  NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
    .map_err(|e| ScreenerError::ParseError(format!("invalid date '{}': {}", value, e)))
}

/// 유닉스 타임스탬프(초)를 UTC 날짜로 변환
pub fn timestamp_to_date(timestamp_secs: i64) -> Option<NaiveDate> {
  DateTime::<Utc>::from_timestamp(timestamp_secs, 0).map(|dt| dt.date_naive())
}

/// 날짜의 UTC 자정 타임스탬프(초)
pub fn date_to_timestamp(date: NaiveDate) -> i64 {
  Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)).timestamp()
}

/// 기준일로부터 `lookback_days`일 전까지의 조회 구간 (양 끝 포함)
pub fn lookback_window(end: NaiveDate, lookback_days: i64) -> (NaiveDate, NaiveDate) {
  (end - Duration::days(lookback_days), end)
}
