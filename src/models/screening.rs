use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 트렌드 템플릿 8개 조건
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
  PriceAboveLongAverages,
  Sma150AboveSma200,
  Sma200TrendingUp,
  Sma50AboveLongAverages,
  PriceAboveSma50,
  AboveYearLow,
  NearYearHigh,
  RelativeStrength,
}

impl Condition {
  pub const ALL: [Condition; 8] = [
    Condition::PriceAboveLongAverages,
    Condition::Sma150AboveSma200,
    Condition::Sma200TrendingUp,
    Condition::Sma50AboveLongAverages,
    Condition::PriceAboveSma50,
    Condition::AboveYearLow,
    Condition::NearYearHigh,
    Condition::RelativeStrength,
  ];

  /// 1부터 시작하는 조건 번호
  pub fn number(&self) -> usize {
    match self {
      Condition::PriceAboveLongAverages => 1,
      Condition::Sma150AboveSma200 => 2,
      Condition::Sma200TrendingUp => 3,
      Condition::Sma50AboveLongAverages => 4,
      Condition::PriceAboveSma50 => 5,
      Condition::AboveYearLow => 6,
      Condition::NearYearHigh => 7,
      Condition::RelativeStrength => 8,
    }
  }

  pub fn description(&self) -> &'static str {
    match self {
      Condition::PriceAboveLongAverages => "price above 150 and 200 day SMA",
      Condition::Sma150AboveSma200 => "150 day SMA above 200 day SMA",
      Condition::Sma200TrendingUp => "200 day SMA trending up for a month",
      Condition::Sma50AboveLongAverages => "50 day SMA above 150 and 200 day SMA",
      Condition::PriceAboveSma50 => "price above 50 day SMA",
      Condition::AboveYearLow => "price at least 30% above 52 week low",
      Condition::NearYearHigh => "price within 25% of 52 week high",
      Condition::RelativeStrength => "RS rating above 70",
    }
  }

  fn index(&self) -> usize {
    self.number() - 1
  }
}

impl fmt::Display for Condition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "condition {} ({})", self.number(), self.description())
  }
}

/// 조건별 평가 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConditionSet {
  results: [bool; 8],
}

impl ConditionSet {
  pub fn set(&mut self, condition: Condition, passed: bool) {
    self.results[condition.index()] = passed;
  }

  pub fn get(&self, condition: Condition) -> bool {
    self.results[condition.index()]
  }

  pub fn all(&self) -> bool {
    self.results.iter().all(|passed| *passed)
  }

  pub fn failed(&self) -> Vec<Condition> {
    Condition::ALL
      .iter()
      .copied()
      .filter(|condition| !self.get(*condition))
      .collect()
  }
}

/// 8개 조건을 모두 통과한 종목 (CSV 한 행)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenedStock {
  #[serde(rename = "Date")]
  pub date: NaiveDate,
  #[serde(rename = "Counter")]
  pub counter: usize,
  #[serde(rename = "Ticker")]
  pub ticker: String,
  #[serde(rename = "RS Rating")]
  pub rs_rating: f64,
  #[serde(rename = "Current Close")]
  pub current_close: f64,
  #[serde(rename = "50 Day MA")]
  pub sma_50: f64,
  #[serde(rename = "150 Day MA")]
  pub sma_150: f64,
  #[serde(rename = "200 Day MA")]
  pub sma_200: f64,
  #[serde(rename = "52 Week Low")]
  pub low_52_week: f64,
  #[serde(rename = "52 Week High")]
  pub high_52_week: f64,
}

/// 평가는 되었지만 조건을 통과하지 못한 종목
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedStock {
  pub counter: usize,
  pub ticker: String,
  pub conditions: ConditionSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
  Fetch(String),
  InsufficientHistory { required: usize, available: usize },
  MissingRsRating,
  /// 마지막 봉이 기준일보다 허용 일수 이상 오래됨 (상장폐지, 거래정지, 갱신 안 된 파일)
  StaleData { last_bar: NaiveDate, as_of: NaiveDate },
}

impl fmt::Display for FailureReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FailureReason::Fetch(message) => write!(f, "fetch failed: {}", message),
      FailureReason::InsufficientHistory { required, available } => {
        write!(f, "insufficient history: {} of {} closes", available, required)
      }
      FailureReason::MissingRsRating => write!(f, "no RS rating available"),
      FailureReason::StaleData { last_bar, as_of } => {
        write!(f, "stale data: last close {} is {} days before {}", last_bar, (*as_of - *last_bar).num_days(), as_of)
      }
    }
  }
}

/// 평가 자체가 불가능했던 종목
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolFailure {
  pub counter: usize,
  pub symbol: String,
  pub reason: FailureReason,
}

/// 한 번의 스크리닝 실행 결과
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningReport {
  pub evaluated_at: NaiveDate,
  pub index_ticker: Option<String>,
  pub universe_size: usize,
  pub passed: Vec<ScreenedStock>,
  pub rejected: Vec<RejectedStock>,
  pub failures: Vec<SymbolFailure>,
}

impl ScreeningReport {
  pub fn passed_symbols(&self) -> Vec<&str> {
    self.passed.iter().map(|stock| stock.ticker.as_str()).collect()
  }

  pub fn evaluated_count(&self) -> usize {
    self.passed.len() + self.rejected.len()
  }

  pub fn summary(&self) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== 스크리닝 결과 ({}) ===\n", self.evaluated_at));
    if let Some(index) = &self.index_ticker {
      out.push_str(&format!("벤치마크: {}\n", index));
    }
    out.push_str(&format!("유니버스: {}\n", self.universe_size));
    out.push_str(&format!("평가 완료: {}\n", self.evaluated_count()));
    out.push_str(&format!("통과: {}\n", self.passed.len()));
    out.push_str(&format!("탈락: {}\n", self.rejected.len()));
    out.push_str(&format!("오류: {}\n", self.failures.len()));

    if !self.passed.is_empty() {
      out.push_str("\n통과 종목:\n");
      for stock in &self.passed {
        out.push_str(&format!(
          "  {:<8} 종가 {:>10.2}  RS {:>6.2}  50MA {:>10.2}  150MA {:>10.2}  200MA {:>10.2}\n",
          stock.ticker, stock.current_close, stock.rs_rating, stock.sma_50, stock.sma_150, stock.sma_200
        ));
      }
    }

    out
  }
}
