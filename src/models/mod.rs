pub mod price;
pub mod screening;

pub use price::{PriceBar, PriceSeries};
pub use screening::{Condition, ConditionSet, FailureReason, RejectedStock, ScreenedStock, ScreeningReport, SymbolFailure};
