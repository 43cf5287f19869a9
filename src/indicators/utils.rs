/**
* filename : utils
* author : HAMA
* date: 2025. 5. 11.
* description: 
**/

use crate::error::ScreenerError;
use super::Indicator;

// 단일 가격 데이터를 사용하여 여러 지표 업데이트
pub fn update_indicators(
  indicators: &mut [&mut dyn Indicator],
  price: f64,
) -> Result<(), ScreenerError> {
  for indicator in indicators.iter_mut() {
    indicator.update(price)?;
  }
  
  Ok(())
}

// 종가 시계열 전체를 지표에 순서대로 반영
pub fn feed_closes(
  indicators: &mut [&mut dyn Indicator],
  closes: &[f64],
) -> Result<(), ScreenerError> {
  for close in closes {
    update_indicators(indicators, *close)?;
  }

  Ok(())
}
