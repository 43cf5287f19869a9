use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 일봉 종가 한 개
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PriceBar { date, close }
    }
}

/// 심볼별 일봉 시계열 (날짜 오름차순, 생성 후 불변)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// 날짜 순으로 정렬하고, 유효하지 않은 종가는 버리며, 같은 날짜는 마지막 값을 유지
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.retain(|bar| bar.close.is_finite() && bar.close > 0.0);
        // 안정 정렬이라 같은 날짜는 입력 순서가 유지된다
        bars.sort_by_key(|bar| bar.date);

        let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }

        PriceSeries {
            symbol: symbol.into(),
            bars: deduped,
        }
    }

    /// 시작일부터 하루 간격으로 종가를 배치 (테스트/합성 데이터용)
    pub fn from_closes(symbol: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Self {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PriceBar::new(start + Duration::days(i as i64), *close))
            .collect();
        PriceSeries::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&PriceBar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// 평가일 이후의 봉을 잘라낸 시계열
    pub fn up_to(&self, date: NaiveDate) -> PriceSeries {
        let end = self.bars.partition_point(|bar| bar.date <= date);
        PriceSeries {
            symbol: self.symbol.clone(),
            bars: self.bars[..end].to_vec(),
        }
    }
}
