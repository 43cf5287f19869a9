use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ScreenerError;
use crate::models::price::PriceSeries;

/// 일봉 과거 데이터 제공자 인터페이스
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoricalDataProvider: Send + Sync {
    /// `start`부터 `end`까지(양 끝 포함) 일봉 종가 조회
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ScreenerError>;
}
