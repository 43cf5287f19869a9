//! 트렌드 템플릿 주식 스크리너 라이브러리
//!
//! 일봉 종가로 이동평균, 52주 범위, 상대강도를 계산해 8개 조건을 모두 만족하는 종목을 고릅니다.

pub mod config;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod models;
pub mod screener;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::ScreenerError;
pub use crate::market_data::{HistoricalDataProvider, Universe};
pub use crate::models::price::{PriceBar, PriceSeries};
pub use crate::models::screening::{Condition, ConditionSet, ScreenedStock, ScreeningReport};
pub use crate::screener::{RsMethod, ScreenerCriteria, ScreenerSettings, StockScreener};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ScreenerError>;
