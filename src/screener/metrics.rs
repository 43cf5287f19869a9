use chrono::NaiveDate;

use crate::error::ScreenerError;
use crate::indicators::{feed_closes, period_performance, sma_at, Indicator, RollingExtreme, SimpleMovingAverage};
use crate::models::price::PriceSeries;
use crate::screener::conditions::ScreenerCriteria;

/// 평가 시점의 종목별 지표값
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolMetrics {
  pub symbol: String,
  /// 마지막 봉 날짜
  pub as_of: NaiveDate,
  pub close: f64,
  pub sma_50: f64,
  pub sma_150: f64,
  pub sma_200: f64,
  /// trend_lookback 봉 이전의 200일 이동평균
  pub sma_200_prior: f64,
  pub low_52_week: f64,
  pub high_52_week: f64,
  /// 52주 구간 일간 수익률 합(%)
  pub performance: f64,
}

impl SymbolMetrics {
  pub fn compute(series: &PriceSeries, criteria: &ScreenerCriteria) -> Result<Self, ScreenerError> {
    let closes = series.closes();
    let required = criteria.required_history();
    if closes.len() < required {
      return Err(ScreenerError::InsufficientHistory { required, available: closes.len() });
    }

    let last = series
      .last()
      .ok_or_else(|| ScreenerError::DataNotFound(series.symbol().to_string()))?;

    let mut sma_short = SimpleMovingAverage::new(criteria.short_period);
    let mut sma_mid = SimpleMovingAverage::new(criteria.mid_period);
    let mut sma_long = SimpleMovingAverage::new(criteria.long_period);
    let mut year_low = RollingExtreme::min(criteria.year_window);
    let mut year_high = RollingExtreme::max(criteria.year_window);

    {
      let mut indicators: [&mut dyn Indicator; 5] =
        [&mut sma_short, &mut sma_mid, &mut sma_long, &mut year_low, &mut year_high];
      feed_closes(&mut indicators, &closes)?;
    }

    let sma_200_prior = sma_at(&closes, criteria.long_period, criteria.trend_lookback).ok_or(
      ScreenerError::InsufficientHistory { required, available: closes.len() },
    )?;

    let year_start = closes.len().saturating_sub(criteria.year_window);
    let performance = period_performance(&closes[year_start..]).unwrap_or(0.0);

    Ok(SymbolMetrics {
      symbol: series.symbol().to_string(),
      as_of: last.date,
      close: last.close,
      sma_50: sma_short.calculate()?,
      sma_150: sma_mid.calculate()?,
      sma_200: sma_long.calculate()?,
      sma_200_prior,
      low_52_week: year_low.calculate()?,
      high_52_week: year_high.calculate()?,
      performance,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::screening::Condition;
  use crate::screener::conditions::evaluate;
  use rstest::rstest;

  fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
  }

  #[test]
  fn test_constant_series() {
    let series = PriceSeries::from_closes("FLAT", start(), &vec![100.0; 260]);
    let metrics = SymbolMetrics::compute(&series, &ScreenerCriteria::default()).unwrap();

    assert_eq!(metrics.close, 100.0);
    assert!((metrics.sma_200 - 100.0).abs() < 1e-9);
    assert!((metrics.sma_200_prior - 100.0).abs() < 1e-9);
    assert_eq!(metrics.low_52_week, 100.0);
    assert_eq!(metrics.high_52_week, 100.0);
    assert_eq!(metrics.performance, 0.0);
  }

  #[test]
  fn test_linear_series_averages() {
    // 1, 2, ..., 300
    let closes: Vec<f64> = (1..=300).map(|i| i as f64).collect();
    let series = PriceSeries::from_closes("LIN", start(), &closes);
    let metrics = SymbolMetrics::compute(&series, &ScreenerCriteria::default()).unwrap();

    assert!((metrics.sma_50 - 275.5).abs() < 1e-9);
    assert!((metrics.sma_150 - 225.5).abs() < 1e-9);
    assert!((metrics.sma_200 - 200.5).abs() < 1e-9);
    assert!((metrics.sma_200_prior - 180.5).abs() < 1e-9);
    // 52주 = 최근 252봉: 49..=300
    assert_eq!(metrics.low_52_week, 49.0);
    assert_eq!(metrics.high_52_week, 300.0);
    assert_eq!(metrics.as_of, start() + chrono::Duration::days(299));
  }

  #[test]
  fn test_short_history_is_rejected() {
    let series = PriceSeries::from_closes("NEW", start(), &vec![10.0; 219]);
    let result = SymbolMetrics::compute(&series, &ScreenerCriteria::default());
    assert!(matches!(
      result,
      Err(ScreenerError::InsufficientHistory { required: 220, available: 219 })
    ));
  }

  #[test]
  fn test_year_range_uses_available_history() {
    let mut closes = vec![50.0];
    closes.extend(std::iter::repeat(80.0).take(229));
    let series = PriceSeries::from_closes("IPO", start(), &closes);
    let metrics = SymbolMetrics::compute(&series, &ScreenerCriteria::default()).unwrap();
    assert_eq!(metrics.low_52_week, 50.0);
  }

  #[rstest]
  #[case(33.3)]
  #[case(0.7)]
  #[case(12.34)]
  #[case(99.99)]
  #[case(150.15)]
  #[case(7.77)]
  #[case(1.1)]
  #[case(45.6)]
  #[case(250.3)]
  fn test_flat_series_sits_on_its_averages(#[case] price: f64) {
    let series = PriceSeries::from_closes("FLAT", start(), &vec![price; 260]);
    let metrics = SymbolMetrics::compute(&series, &ScreenerCriteria::default()).unwrap();

    assert_eq!(metrics.sma_50, price);
    assert_eq!(metrics.sma_150, price);
    assert_eq!(metrics.sma_200, price);
    assert_eq!(metrics.sma_200_prior, price);

    let set = evaluate(&metrics, 99.0, &ScreenerCriteria::default());
    assert!(!set.get(Condition::PriceAboveLongAverages));
    assert!(!set.get(Condition::Sma150AboveSma200));
    assert!(!set.get(Condition::Sma50AboveLongAverages));
    assert!(!set.get(Condition::PriceAboveSma50));
    assert!(set.get(Condition::Sma200TrendingUp));
  }
}
