use crate::error::ScreenerError;
use crate::market_data::universe::Universe;
use crate::models::screening::ScreeningReport;

/// 암호화폐 스크리너 (조건 미정)
#[derive(Debug, Default)]
pub struct CryptoScreener;

impl CryptoScreener {
  pub fn new() -> Self {
    CryptoScreener
  }

  pub async fn screen(&self, _universe: &Universe) -> Result<ScreeningReport, ScreenerError> {
    Err(ScreenerError::Unsupported("crypto screening has no conditions defined yet".into()))
  }
}
