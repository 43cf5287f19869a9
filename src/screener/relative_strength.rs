//! 상대강도(RS) 점수 산출
//!
//! - `Percentile`: 유니버스 내 성과 백분위 (0~100)
//! - `IndexRatio`: 벤치마크 지수 대비 성과 비율 * 10
//! - `External`: 외부에서 받은 점수 (symbol,rs_rating CSV)

use std::collections::HashMap;
use std::path::Path;

use crate::error::ScreenerError;
use crate::market_data::universe::normalize_symbol;
use crate::screener::metrics::SymbolMetrics;

#[derive(Debug, Clone, PartialEq)]
pub enum RsMethod {
  Percentile,
  IndexRatio,
  External(HashMap<String, f64>),
}

impl RsMethod {
  pub fn name(&self) -> &'static str {
    match self {
      RsMethod::Percentile => "percentile",
      RsMethod::IndexRatio => "index_ratio",
      RsMethod::External(_) => "external",
    }
  }

  pub fn needs_index(&self) -> bool {
    matches!(self, RsMethod::IndexRatio)
  }
}

/// 동순위는 중간 순위로 처리한 백분위 점수
///
/// `100 * (낮은 값 개수 + 0.5 * 동점 개수) / (n - 1)`. 한 종목뿐이면 50.
pub fn percentile_ranks(performances: &[f64]) -> Vec<f64> {
  let n = performances.len();
  if n == 1 {
    return vec![50.0];
  }

  performances
    .iter()
    .map(|p| {
      let below = performances.iter().filter(|other| *other < p).count();
      let ties = performances.iter().filter(|other| *other == p).count().saturating_sub(1);
      100.0 * (below as f64 + 0.5 * ties as f64) / (n - 1) as f64
    })
    .collect()
}

/// 벤치마크 대비 성과 비율 점수 (소수 둘째 자리 반올림)
pub fn index_ratio(performance: f64, index_performance: f64) -> Result<f64, ScreenerError> {
  if index_performance == 0.0 || !index_performance.is_finite() {
    return Err(ScreenerError::InvalidParameter(format!(
      "benchmark performance must be non-zero (got {})",
      index_performance
    )));
  }

  let rating = performance / index_performance * 10.0;
  Ok((rating * 100.0).round() / 100.0)
}

/// 종목별 RS 점수 산출 (입력 순서와 동일, 점수가 없으면 None)
pub fn assign_ratings(
  method: &RsMethod,
  metrics: &[SymbolMetrics],
  index_performance: Option<f64>,
) -> Result<Vec<Option<f64>>, ScreenerError> {
  match method {
    RsMethod::Percentile => {
      let performances: Vec<f64> = metrics.iter().map(|m| m.performance).collect();
      Ok(percentile_ranks(&performances).into_iter().map(Some).collect())
    }
    RsMethod::IndexRatio => {
      let index_performance = index_performance.ok_or_else(|| {
        ScreenerError::InvalidParameter("index ratio rating requires benchmark performance".into())
      })?;
      metrics
        .iter()
        .map(|m| index_ratio(m.performance, index_performance).map(Some))
        .collect()
    }
    RsMethod::External(ratings) => Ok(metrics.iter().map(|m| ratings.get(&m.symbol).copied()).collect()),
  }
}

/// `symbol,rs_rating` CSV 로드
pub fn load_external_ratings(path: impl AsRef<Path>) -> Result<HashMap<String, f64>, ScreenerError> {
  let mut rdr = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .from_path(path.as_ref())?;

  let mut ratings = HashMap::new();
  for rec in rdr.deserialize() {
    let row: RatingRow = rec?;
    if !(0.0..=100.0).contains(&row.rs_rating) {
      return Err(ScreenerError::ParseError(format!(
        "{}: RS rating {} outside 0-100",
        row.symbol, row.rs_rating
      )));
    }
    if let Some(symbol) = normalize_symbol(&row.symbol) {
      ratings.insert(symbol, row.rs_rating);
    }
  }

  Ok(ratings)
}

#[derive(serde::Deserialize)]
struct RatingRow {
  #[serde(alias = "Symbol", alias = "ticker", alias = "Ticker")]
  symbol: String,
  #[serde(alias = "RS Rating", alias = "rs")]
  rs_rating: f64,
}
