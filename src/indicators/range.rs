/**
* filename : range
* author : HAMA
* date: 2025. 5. 11.
* description: 52주 최고/최저 등 구간 극값
**/

use std::collections::VecDeque;
use crate::error::ScreenerError;
use super::Indicator;

/// 52주 구간에 해당하는 거래일 수
pub const TRADING_DAYS_PER_YEAR: usize = 252;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
  Min,
  Max,
}

/// 최근 `window`개 종가의 최저/최고값
///
/// 윈도우보다 데이터가 적으면 있는 값만으로 계산한다.
#[derive(Debug)]
pub struct RollingExtreme {
  name: String,
  kind: Extreme,
  window: usize,
  values: VecDeque<f64>,
}

impl RollingExtreme {
  pub fn new(kind: Extreme, window: usize) -> Self {
    let label = match kind {
      Extreme::Min => "LOW",
      Extreme::Max => "HIGH",
    };

    RollingExtreme {
      name: format!("{}-{}", label, window),
      kind,
      window,
      values: VecDeque::with_capacity(window),
    }
  }

  pub fn min(window: usize) -> Self {
    RollingExtreme::new(Extreme::Min, window)
  }

  pub fn max(window: usize) -> Self {
    RollingExtreme::new(Extreme::Max, window)
  }
}

impl Indicator for RollingExtreme {
  fn name(&self) -> &str {
    &self.name
  }

  fn update(&mut self, price: f64) -> Result<(), ScreenerError> {
    if !price.is_finite() {
      return Err(ScreenerError::InvalidParameter(format!("{}: non-finite price", self.name)));
    }

    self.values.push_back(price);
    while self.values.len() > self.window {
      self.values.pop_front();
    }

    Ok(())
  }

  fn calculate(&self) -> Result<f64, ScreenerError> {
    let values = self.values.iter().copied();
    let result = match self.kind {
      Extreme::Min => values.reduce(f64::min),
      Extreme::Max => values.reduce(f64::max),
    };

    result.ok_or(ScreenerError::InsufficientHistory { required: 1, available: 0 })
  }

  fn is_ready(&self) -> bool {
    self.window > 0 && !self.values.is_empty()
  }

  fn reset(&mut self) {
    self.values.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rolling_extreme_drops_old_values() {
    let mut low = RollingExtreme::min(3);
    let mut high = RollingExtreme::max(3);
    for price in [5.0, 1.0, 7.0, 6.0, 8.0] {
      low.update(price).unwrap();
      high.update(price).unwrap();
    }

    // 윈도우: [7, 6, 8]
    assert_eq!(low.calculate().unwrap(), 6.0);
    assert_eq!(high.calculate().unwrap(), 8.0);
    assert_eq!(low.name(), "LOW-3");
  }

  #[test]
  fn test_empty_extreme_is_error() {
    let low = RollingExtreme::min(252);
    assert!(!low.is_ready());
    assert!(low.calculate().is_err());
  }
}
