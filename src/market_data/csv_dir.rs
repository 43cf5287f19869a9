use std::path::PathBuf;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ScreenerError;
use crate::market_data::provider::HistoricalDataProvider;
use crate::models::price::{PriceBar, PriceSeries};

/// `{dir}/{SYMBOL}.csv` 파일에서 일봉을 읽는 제공자
///
/// 헤더에 `date`와 `close`(또는 `adj_close`)가 있어야 하며 나머지 컬럼은 무시한다.
pub struct CsvDirectoryProvider {
    dir: PathBuf,
}

impl CsvDirectoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        CsvDirectoryProvider { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", symbol))
    }

    /// 디렉터리에 있는 CSV 파일 이름으로 심볼 목록 추정
    pub fn available_symbols(&self) -> Result<Vec<String>, ScreenerError> {
        let mut symbols = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    symbols.push(stem.to_string());
                }
            }
        }
        symbols.sort();
        Ok(symbols)
    }

    fn load(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries, ScreenerError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(ScreenerError::DataNotFound(format!("{} ({})", symbol, path.display())));
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)?;

        let mut bars = Vec::new();
        for rec in rdr.deserialize() {
            let row: CsvRow = rec?;
            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d")
                .map_err(|e| ScreenerError::ParseError(format!("{}: bad date '{}': {}", symbol, row.date, e)))?;
            if date < start || date > end {
                continue;
            }
            if let Some(close) = row.adj_close.or(row.close) {
                bars.push(PriceBar::new(date, close));
            }
        }

        Ok(PriceSeries::new(symbol, bars))
    }
}

#[async_trait]
impl HistoricalDataProvider for CsvDirectoryProvider {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ScreenerError> {
        self.load(symbol, start, end)
    }
}

#[derive(serde::Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(default, alias = "Close")]
    close: Option<f64>,
    #[serde(default, alias = "Adj Close", alias = "adjclose")]
    adj_close: Option<f64>,
}
