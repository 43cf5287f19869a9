use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ScreenerError;
use crate::market_data::provider::HistoricalDataProvider;
use crate::models::price::PriceSeries;

/// 메모리에 올려둔 시계열을 돌려주는 제공자
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, PriceSeries>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        InMemoryProvider::default()
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol().to_string(), series);
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }
}

#[async_trait]
impl HistoricalDataProvider for InMemoryProvider {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ScreenerError> {
        let series = self
            .series
            .get(symbol)
            .ok_or_else(|| ScreenerError::DataNotFound(symbol.to_string()))?;

        let bars = series
            .bars()
            .iter()
            .filter(|bar| bar.date >= start && bar.date <= end)
            .copied()
            .collect();

        Ok(PriceSeries::new(symbol, bars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_filters_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let provider = InMemoryProvider::new()
            .with_series(PriceSeries::from_closes("AAPL", start, &[1.0, 2.0, 3.0, 4.0]));

        let series = provider
            .fetch_daily("AAPL", start + chrono::Duration::days(1), start + chrono::Duration::days(2))
            .await
            .unwrap();
        assert_eq!(series.closes(), vec![2.0, 3.0]);

        let missing = provider.fetch_daily("MSFT", start, start).await;
        assert!(matches!(missing, Err(ScreenerError::DataNotFound(_))));
    }
}
