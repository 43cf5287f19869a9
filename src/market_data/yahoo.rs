/**
* filename : yahoo
* author : HAMA
* date: 2025. 5. 11.
* description: Yahoo Finance chart API 일봉 조회 클라이언트
**/

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::error::ScreenerError;
use crate::market_data::provider::HistoricalDataProvider;
use crate::models::price::{PriceBar, PriceSeries};
use crate::utils::{date_to_timestamp, timestamp_to_date};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
    #[serde(default)]
    pub adjclose: Vec<AdjCloseBlock>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjCloseBlock {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ScreenerError> {
        let mut builder = Client::builder().user_agent(concat!("stock-screener/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn chart_url(&self, symbol: &str) -> String {
        // 지수 티커(^GSPC)는 경로에서 인코딩
        format!("{}/v8/finance/chart/{}", self.base_url, symbol.replace('^', "%5E"))
    }
}

#[async_trait]
impl HistoricalDataProvider for YahooChartProvider {
    async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ScreenerError> {
        let url = self.chart_url(symbol);
        let period1 = date_to_timestamp(start).to_string();
        // period2는 배타적이므로 종료일 다음 날 자정
        let period2 = date_to_timestamp(end + chrono::Duration::days(1)).to_string();

        log::debug!("GET {} ({} ~ {})", url, start, end);
        let response = self.client
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "div,splits"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let envelope: ChartEnvelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(ScreenerError::SerializationError(e)),
            Err(_) => {
                return Err(ScreenerError::Provider(format!("{}: HTTP {}", symbol, status)));
            }
        };

        let series = parse_chart(symbol, envelope)?;
        Ok(series.up_to(end))
    }
}

/// chart 응답을 종가 시계열로 변환
///
/// 수정 종가가 있으면 그것을, 없으면 종가를 쓴다. null 종가는 건너뛴다.
pub fn parse_chart(symbol: &str, envelope: ChartEnvelope) -> Result<PriceSeries, ScreenerError> {
    if let Some(error) = envelope.chart.error {
        return Err(ScreenerError::Provider(format!("{}: {} ({})", symbol, error.description, error.code)));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ScreenerError::DataNotFound(symbol.to_string()))?;

    let closes = match result.indicators.adjclose.into_iter().next() {
        Some(block) if !block.adjclose.is_empty() => block.adjclose,
        _ => result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|block| block.close)
            .unwrap_or_default(),
    };

    if closes.len() != result.timestamp.len() {
        return Err(ScreenerError::ParseError(format!(
            "{}: {} timestamps but {} closes",
            symbol,
            result.timestamp.len(),
            closes.len()
        )));
    }

    let bars: Vec<PriceBar> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| Some(PriceBar::new(timestamp_to_date(*ts)?, close?)))
        .collect();

    if bars.is_empty() {
        return Err(ScreenerError::DataNotFound(symbol.to_string()));
    }

    Ok(PriceSeries::new(symbol, bars))
}
