/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description: 
**/
pub mod conditions;
pub mod crypto;
pub mod engine;
pub mod metrics;
pub mod relative_strength;
pub mod report;

pub use conditions::{evaluate, ScreenerCriteria};
pub use crypto::CryptoScreener;
pub use engine::{ScreenerSettings, StockScreener};
pub use metrics::SymbolMetrics;
pub use relative_strength::RsMethod;
pub use report::{write_csv, write_csv_to};
