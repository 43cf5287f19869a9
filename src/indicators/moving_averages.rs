/**
* filename : moving_averages
* author : HAMA
* date: 2025. 5. 11.
* description: 
**/

use std::collections::VecDeque;
use crate::error::ScreenerError;
use super::Indicator;

#[derive(Debug)]
pub struct SimpleMovingAverage {
  name: String,
  period: usize,
  values: VecDeque<f64>,
}

impl SimpleMovingAverage {
  pub fn new(period: usize) -> Self {
    SimpleMovingAverage {
      name: format!("SMA-{}", period),
      period,
      values: VecDeque::with_capacity(period),
    }
  }
}

impl Indicator for SimpleMovingAverage {
  fn name(&self) -> &str {
    &self.name
  }
  
  fn update(&mut self, price: f64) -> Result<(), ScreenerError> {
    if !price.is_finite() {
      return Err(ScreenerError::InvalidParameter(format!("{}: non-finite price", self.name)));
    }

    // 새 가격 추가
    self.values.push_back(price);

    // 오래된 가격 제거 (필요시)
    if self.values.len() > self.period {
      self.values.pop_front();
    }
    
    Ok(())
  }
  
  fn calculate(&self) -> Result<f64, ScreenerError> {
    if !self.is_ready() {
      return Err(ScreenerError::InsufficientHistory {
        required: self.period,
        available: self.values.len(),
      });
    }
    
    Ok(window_mean(self.values.iter().copied()))
  }
  
  fn is_ready(&self) -> bool {
    self.period > 0 && self.values.len() >= self.period
  }
  
  fn reset(&mut self) {
    self.values.clear();
  }
}

/// 구간 평균
///
/// 첫 값을 기준으로 한 편차의 평균을 더한다. 모든 값이 같으면 그 값이 그대로 나온다.
fn window_mean(values: impl Iterator<Item = f64>) -> f64 {
  let mut values = values.peekable();
  let Some(&base) = values.peek() else {
    return f64::NAN;
  };

  let (count, deviation) = values.fold((0usize, 0.0), |(count, sum), value| (count + 1, sum + (value - base)));
  base + deviation / count as f64
}

/// 마지막 봉에서 `offset`개 이전 시점의 단순 이동평균
///
/// `offset == 0`이면 가장 최근 값. 데이터가 부족하면 `None`.
pub fn sma_at(closes: &[f64], period: usize, offset: usize) -> Option<f64> {
  if period == 0 || closes.len() < period + offset {
    return None;
  }

  let end = closes.len() - offset;
  Some(window_mean(closes[end - period..end].iter().copied()))
}
