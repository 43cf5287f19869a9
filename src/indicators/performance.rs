/// 기간 성과: 일간 수익률(%)의 합
///
/// 종가가 두 개 미만이면 `None`.
pub fn period_performance(closes: &[f64]) -> Option<f64> {
  if closes.len() < 2 {
    return None;
  }

  let sum: f64 = closes
    .windows(2)
    .map(|pair| (pair[1] - pair[0]) / pair[0])
    .sum();

  Some(sum * 100.0)
}
