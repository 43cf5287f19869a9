/**
* filename : conditions
* author : HAMA
* date: 2025. 5. 11.
* description: 트렌드 템플릿 8개 조건 평가
**/

use serde::{Deserialize, Serialize};

use crate::error::ScreenerError;
use crate::indicators::TRADING_DAYS_PER_YEAR;
use crate::models::screening::{Condition, ConditionSet};
use crate::screener::metrics::SymbolMetrics;

/// 스크리닝 기준값
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerCriteria {
  pub short_period: usize,
  pub mid_period: usize,
  pub long_period: usize,
  /// 장기 이동평균 추세를 비교할 과거 봉 수 (약 1개월)
  pub trend_lookback: usize,
  /// 52주 구간 거래일 수
  pub year_window: usize,
  /// 종가 >= 52주 최저 * low_multiplier
  pub low_multiplier: f64,
  /// 종가 >= 52주 최고 * high_multiplier
  pub high_multiplier: f64,
  /// RS > min_rs_rating (초과)
  pub min_rs_rating: f64,
}

impl Default for ScreenerCriteria {
  fn default() -> Self {
    ScreenerCriteria {
      short_period: 50,
      mid_period: 150,
      long_period: 200,
      trend_lookback: 20,
      year_window: TRADING_DAYS_PER_YEAR,
      low_multiplier: 1.30,
      high_multiplier: 0.75,
      min_rs_rating: 70.0,
    }
  }
}

impl ScreenerCriteria {
  /// 평가에 필요한 최소 종가 개수
  pub fn required_history(&self) -> usize {
    self.long_period + self.trend_lookback
  }

  pub fn validate(&self) -> Result<(), ScreenerError> {
    if self.short_period == 0 || self.short_period >= self.mid_period || self.mid_period >= self.long_period {
      return Err(ScreenerError::ConfigError(format!(
        "moving average periods must satisfy 0 < short < mid < long (got {}/{}/{})",
        self.short_period, self.mid_period, self.long_period
      )));
    }
    if self.year_window == 0 {
      return Err(ScreenerError::ConfigError("year_window must be positive".into()));
    }
    if !(self.low_multiplier > 0.0) || !(self.high_multiplier > 0.0) {
      return Err(ScreenerError::ConfigError("range multipliers must be positive".into()));
    }
    if !self.min_rs_rating.is_finite() {
      return Err(ScreenerError::ConfigError("min_rs_rating must be finite".into()));
    }
    Ok(())
  }
}

/// 지표값과 RS 점수로 8개 조건을 각각 평가
pub fn evaluate(metrics: &SymbolMetrics, rs_rating: f64, criteria: &ScreenerCriteria) -> ConditionSet {
  let price = metrics.close;
  let mut set = ConditionSet::default();

  set.set(
    Condition::PriceAboveLongAverages,
    price > metrics.sma_150 && price > metrics.sma_200,
  );
  set.set(Condition::Sma150AboveSma200, metrics.sma_150 > metrics.sma_200);
  set.set(Condition::Sma200TrendingUp, metrics.sma_200 >= metrics.sma_200_prior);
  set.set(
    Condition::Sma50AboveLongAverages,
    metrics.sma_50 > metrics.sma_150 && metrics.sma_50 > metrics.sma_200,
  );
  set.set(Condition::PriceAboveSma50, price > metrics.sma_50);
  set.set(Condition::AboveYearLow, price >= criteria.low_multiplier * metrics.low_52_week);
  set.set(Condition::NearYearHigh, price >= criteria.high_multiplier * metrics.high_52_week);
  set.set(Condition::RelativeStrength, rs_rating > criteria.min_rs_rating);

  set
}
