/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description: 
**/
pub mod moving_averages;
pub mod performance;
pub mod range;
pub mod utils;

pub use moving_averages::*;
pub use performance::*;
pub use range::*;
pub use utils::*;

use std::fmt::Debug;

use crate::error::ScreenerError;

pub trait Indicator: Debug + Send + Sync {
  fn name(&self) -> &str;

  // 새로운 종가로 지표 업데이트
  fn update(&mut self, price: f64) -> Result<(), ScreenerError>;

  // 현재 지표 값 반환
  fn calculate(&self) -> Result<f64, ScreenerError>;

  // 지표가 계산 가능한지 (충분한 데이터가 있는지) 확인
  fn is_ready(&self) -> bool;

  // 지표 상태 리셋
  fn reset(&mut self);
}
