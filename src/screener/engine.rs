/**
* filename : engine
* author : HAMA
* date: 2025. 5. 11.
* description: 종목별 데이터 조회 -> 지표 계산 -> RS 산출 -> 조건 평가
**/

use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};

use crate::error::ScreenerError;
use crate::indicators::period_performance;
use crate::market_data::provider::HistoricalDataProvider;
use crate::market_data::universe::Universe;
use crate::models::screening::{FailureReason, RejectedStock, ScreenedStock, ScreeningReport, SymbolFailure};
use crate::screener::conditions::{evaluate, ScreenerCriteria};
use crate::screener::metrics::SymbolMetrics;
use crate::screener::relative_strength::{assign_ratings, RsMethod};
use crate::utils::{lookback_window, logging, today};

#[derive(Debug, Clone)]
pub struct ScreenerSettings {
  pub index_ticker: String,
  /// 조회 구간 (달력 일수)
  pub lookback_days: i64,
  pub max_concurrency: usize,
  /// 평가 기준일 (None이면 오늘)
  pub as_of: Option<NaiveDate>,
  /// 마지막 봉과 기준일 사이 허용 달력 일수
  pub max_staleness_days: i64,
}

impl Default for ScreenerSettings {
  fn default() -> Self {
    ScreenerSettings {
      index_ticker: "^GSPC".to_string(),
      lookback_days: 365,
      max_concurrency: 4,
      as_of: None,
      max_staleness_days: 10,
    }
  }
}

pub struct StockScreener {
  provider: Arc<dyn HistoricalDataProvider>,
  criteria: ScreenerCriteria,
  rs_method: RsMethod,
  settings: ScreenerSettings,
}

impl StockScreener {
  pub fn new(
    provider: Arc<dyn HistoricalDataProvider>,
    criteria: ScreenerCriteria,
    rs_method: RsMethod,
    settings: ScreenerSettings,
  ) -> Result<Self, ScreenerError> {
    criteria.validate()?;
    if settings.lookback_days <= 0 {
      return Err(ScreenerError::InvalidParameter("lookback_days must be positive".into()));
    }
    if settings.max_staleness_days < 0 {
      return Err(ScreenerError::InvalidParameter("max_staleness_days must not be negative".into()));
    }

    Ok(StockScreener { provider, criteria, rs_method, settings })
  }

  /// 유니버스 전체 스크리닝
  ///
  /// 종목별 실패는 보고서의 failures에 기록되고 실행을 중단하지 않는다.
  /// 벤치마크 조회 실패(IndexRatio)만 전체 오류로 반환된다.
  pub async fn run(&self, universe: &Universe) -> Result<ScreeningReport, ScreenerError> {
    let as_of = self.settings.as_of.unwrap_or_else(today);
    let (start, end) = lookback_window(as_of, self.settings.lookback_days);
    let total = universe.len();

    logging::log_screening_start(total, &as_of.to_string());
    log::info!("RS 방식: {} - 조회 구간: {} ~ {}", self.rs_method.name(), start, end);

    let index_performance = if self.rs_method.needs_index() {
      Some(self.index_performance(start, end).await?)
    } else {
      None
    };

    let outcomes: Vec<(usize, String, Result<SymbolMetrics, FailureReason>)> =
      stream::iter(universe.iter().enumerate())
        .map(|(counter, symbol)| {
          let symbol = symbol.to_string();
          async move {
            logging::log_symbol_pull(&symbol, counter, total);
            let outcome = self.measure(&symbol, start, end).await;
            (counter, symbol, outcome)
          }
        })
        .buffered(self.settings.max_concurrency.max(1))
        .collect()
        .await;

    let mut measured: Vec<(usize, SymbolMetrics)> = Vec::new();
    let mut failures: Vec<SymbolFailure> = Vec::new();
    for (counter, symbol, outcome) in outcomes {
      match outcome {
        Ok(metrics) => measured.push((counter, metrics)),
        Err(reason) => {
          let failure = SymbolFailure { counter, symbol, reason };
          logging::log_symbol_failure(&failure);
          failures.push(failure);
        }
      }
    }

    let metrics: Vec<SymbolMetrics> = measured.iter().map(|(_, m)| m.clone()).collect();
    let ratings = assign_ratings(&self.rs_method, &metrics, index_performance)?;

    let mut passed = Vec::new();
    let mut rejected = Vec::new();
    for ((counter, metrics), rating) in measured.into_iter().zip(ratings) {
      let Some(rs_rating) = rating else {
        let failure = SymbolFailure {
          counter,
          symbol: metrics.symbol,
          reason: FailureReason::MissingRsRating,
        };
        logging::log_symbol_failure(&failure);
        failures.push(failure);
        continue;
      };

      let conditions = evaluate(&metrics, rs_rating, &self.criteria);
      if conditions.all() {
        logging::log_symbol_match(&metrics.symbol);
        passed.push(ScreenedStock {
          date: as_of,
          counter,
          ticker: metrics.symbol,
          rs_rating,
          current_close: metrics.close,
          sma_50: metrics.sma_50,
          sma_150: metrics.sma_150,
          sma_200: metrics.sma_200,
          low_52_week: metrics.low_52_week,
          high_52_week: metrics.high_52_week,
        });
      } else {
        log::debug!("{} 탈락: {:?}", metrics.symbol, conditions.failed());
        rejected.push(RejectedStock { counter, ticker: metrics.symbol, conditions });
      }
    }

    failures.sort_by_key(|failure| failure.counter);
    logging::log_screening_end(passed.len(), rejected.len(), failures.len());

    Ok(ScreeningReport {
      evaluated_at: as_of,
      index_ticker: self.rs_method.needs_index().then(|| self.settings.index_ticker.clone()),
      universe_size: total,
      passed,
      rejected,
      failures,
    })
  }

  /// 한 종목의 시계열을 받아 지표 계산
  async fn measure(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<SymbolMetrics, FailureReason> {
    let series = self
      .provider
      .fetch_daily(symbol, start, end)
      .await
      .map_err(|e| FailureReason::Fetch(e.to_string()))?
      .up_to(end);

    let last_bar = match series.last() {
      Some(bar) => bar.date,
      None => return Err(FailureReason::Fetch("no price data".to_string())),
    };
    if (end - last_bar).num_days() > self.settings.max_staleness_days {
      return Err(FailureReason::StaleData { last_bar, as_of: end });
    }

    SymbolMetrics::compute(&series, &self.criteria).map_err(|e| match e {
      ScreenerError::InsufficientHistory { required, available } => {
        FailureReason::InsufficientHistory { required, available }
      }
      other => FailureReason::Fetch(other.to_string()),
    })
  }

  /// 벤치마크 지수의 52주 성과
  async fn index_performance(&self, start: NaiveDate, end: NaiveDate) -> Result<f64, ScreenerError> {
    let ticker = &self.settings.index_ticker;
    log::info!("pulling {}", ticker);

    let closes = self.provider.fetch_daily(ticker, start, end).await?.up_to(end).closes();
    let year_start = closes.len().saturating_sub(self.criteria.year_window);
    period_performance(&closes[year_start..]).ok_or_else(|| {
      ScreenerError::InsufficientHistory { required: 2, available: closes.len() }
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::market_data::provider::MockHistoricalDataProvider;
  use crate::models::price::PriceSeries;

  fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
  }

  fn rising(symbol: &str) -> PriceSeries {
    let closes: Vec<f64> = (0..300).map(|i| 50.0 + i as f64 * 0.5).collect();
    PriceSeries::from_closes(symbol, as_of() - chrono::Duration::days(299), &closes)
  }

  fn settings() -> ScreenerSettings {
    ScreenerSettings { as_of: Some(as_of()), lookback_days: 400, ..ScreenerSettings::default() }
  }

  #[tokio::test]
  async fn test_fetch_error_does_not_abort_run() {
    let mut provider = MockHistoricalDataProvider::new();
    provider
      .expect_fetch_daily()
      .withf(|symbol, _, _| symbol.to_string() == "BAD")
      .returning(|symbol, _, _| Err(ScreenerError::Provider(format!("{}: HTTP 500", symbol))));
    provider
      .expect_fetch_daily()
      .withf(|symbol, _, _| symbol.to_string() == "GOOD")
      .returning(|symbol, _, _| Ok(rising(symbol)));

    let mut ratings = std::collections::HashMap::new();
    ratings.insert("GOOD".to_string(), 95.0);

    let screener = StockScreener::new(
      Arc::new(provider),
      ScreenerCriteria::default(),
      RsMethod::External(ratings),
      settings(),
    )
    .unwrap();

    let report = screener.run(&Universe::from_symbols(["BAD", "GOOD"])).await.unwrap();

    assert_eq!(report.passed_symbols(), vec!["GOOD"]);
    assert_eq!(report.passed[0].counter, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].symbol, "BAD");
    assert!(matches!(report.failures[0].reason, FailureReason::Fetch(_)));
  }

  #[tokio::test]
  async fn test_index_fetch_failure_aborts_run() {
    let mut provider = MockHistoricalDataProvider::new();
    provider
      .expect_fetch_daily()
      .returning(|_, _, _| Err(ScreenerError::Provider("down".into())));

    let screener = StockScreener::new(
      Arc::new(provider),
      ScreenerCriteria::default(),
      RsMethod::IndexRatio,
      settings(),
    )
    .unwrap();

    assert!(screener.run(&Universe::from_symbols(["AAPL"])).await.is_err());
  }

  fn external_screener(provider: MockHistoricalDataProvider) -> StockScreener {
    let mut ratings = std::collections::HashMap::new();
    ratings.insert("OLD".to_string(), 95.0);
    StockScreener::new(Arc::new(provider), ScreenerCriteria::default(), RsMethod::External(ratings), settings())
      .unwrap()
  }

  #[tokio::test]
  async fn test_stale_history_is_a_failure() {
    let mut provider = MockHistoricalDataProvider::new();
    provider.expect_fetch_daily().returning(|symbol, _, _| {
      let closes: Vec<f64> = (0..300).map(|i| 50.0 + i as f64 * 0.5).collect();
      // 기준일 30일 전에 멈춘 시계열
      Ok(PriceSeries::from_closes(symbol, as_of() - chrono::Duration::days(329), &closes))
    });

    let report = external_screener(provider).run(&Universe::from_symbols(["OLD"])).await.unwrap();

    assert!(report.passed.is_empty());
    assert!(report.rejected.is_empty());
    assert_eq!(
      report.failures[0].reason,
      FailureReason::StaleData { last_bar: as_of() - chrono::Duration::days(30), as_of: as_of() }
    );
  }

  #[tokio::test]
  async fn test_recent_gap_within_tolerance_is_screened() {
    let mut provider = MockHistoricalDataProvider::new();
    provider.expect_fetch_daily().returning(|symbol, _, _| {
      let closes: Vec<f64> = (0..300).map(|i| 50.0 + i as f64 * 0.5).collect();
      // 주말 + 공휴일 정도의 공백
      Ok(PriceSeries::from_closes(symbol, as_of() - chrono::Duration::days(303), &closes))
    });

    let report = external_screener(provider).run(&Universe::from_symbols(["OLD"])).await.unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.passed_symbols(), vec!["OLD"]);
    assert_eq!(report.passed[0].date, as_of());
  }

  #[test]
  fn test_new_rejects_bad_settings() {
    let provider = MockHistoricalDataProvider::new();
    let result = StockScreener::new(
      Arc::new(provider),
      ScreenerCriteria::default(),
      RsMethod::Percentile,
      ScreenerSettings { lookback_days: 0, ..ScreenerSettings::default() },
    );
    assert!(result.is_err());
  }
}
