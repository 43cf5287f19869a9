//! Yahoo chart 제공자 테스트 (모의 HTTP 서버)

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stock_screener::market_data::YahooChartProvider;
use stock_screener::utils::date_to_timestamp;
use stock_screener::{
  HistoricalDataProvider, RsMethod, ScreenerCriteria, ScreenerError, ScreenerSettings, StockScreener, Universe,
};

fn as_of() -> NaiveDate {
  NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

/// 기준일에 끝나는 일간 chart 응답 (장 마감 14:30 UTC 타임스탬프)
fn chart_body(end: NaiveDate, closes: &[f64]) -> serde_json::Value {
  let start = end - Duration::days(closes.len() as i64 - 1);
  let timestamps: Vec<i64> = (0..closes.len())
    .map(|i| date_to_timestamp(start + Duration::days(i as i64)) + 52_200)
    .collect();

  json!({
    "chart": {
      "result": [{
        "meta": {"currency": "USD"},
        "timestamp": timestamps,
        "indicators": {
          "quote": [{"close": closes}],
          "adjclose": [{"adjclose": closes}]
        }
      }],
      "error": null
    }
  })
}

fn provider(server: &MockServer) -> YahooChartProvider {
  YahooChartProvider::new(server.uri(), Some(std::time::Duration::from_secs(5))).unwrap()
}

#[tokio::test]
async fn test_fetch_daily_parses_chart() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v8/finance/chart/AAPL"))
    .and(query_param("interval", "1d"))
    .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(as_of(), &[10.0, 11.0, 12.0])))
    .expect(1)
    .mount(&server)
    .await;

  let series = provider(&server)
    .fetch_daily("AAPL", as_of() - Duration::days(10), as_of())
    .await
    .unwrap();

  assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
  assert_eq!(series.last().map(|b| b.date), Some(as_of()));
}

#[tokio::test]
async fn test_fetch_daily_drops_bars_after_end() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v8/finance/chart/AAPL"))
    .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(as_of(), &[10.0, 11.0, 12.0])))
    .mount(&server)
    .await;

  let series = provider(&server)
    .fetch_daily("AAPL", as_of() - Duration::days(10), as_of() - Duration::days(1))
    .await
    .unwrap();

  assert_eq!(series.closes(), vec![10.0, 11.0]);
}

#[tokio::test]
async fn test_index_ticker_is_encoded() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v8/finance/chart/%5EGSPC"))
    .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(as_of(), &[5000.0, 5010.0])))
    .expect(1)
    .mount(&server)
    .await;

  let series = provider(&server)
    .fetch_daily("^GSPC", as_of() - Duration::days(5), as_of())
    .await
    .unwrap();
  assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn test_not_found_payload_is_provider_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v8/finance/chart/ZZZZ"))
    .respond_with(ResponseTemplate::new(404).set_body_json(json!({
      "chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}
    })))
    .mount(&server)
    .await;

  let result = provider(&server).fetch_daily("ZZZZ", as_of() - Duration::days(5), as_of()).await;
  match result {
    Err(ScreenerError::Provider(msg)) => assert!(msg.contains("delisted")),
    other => panic!("unexpected result: {:?}", other),
  }
}

#[tokio::test]
async fn test_server_error_is_provider_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(500).set_body_string("upstream failure"))
    .mount(&server)
    .await;

  let result = provider(&server).fetch_daily("AAPL", as_of() - Duration::days(5), as_of()).await;
  match result {
    Err(ScreenerError::Provider(msg)) => assert!(msg.contains("500")),
    other => panic!("unexpected result: {:?}", other),
  }
}

#[tokio::test]
async fn test_screener_over_http() {
  let server = MockServer::start().await;
  let rising: Vec<f64> = (0..300).map(|i| 50.0 + i as f64 * 0.5).collect();
  Mock::given(method("GET"))
    .and(path("/v8/finance/chart/LEAD"))
    .respond_with(ResponseTemplate::new(200).set_body_json(chart_body(as_of(), &rising)))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/v8/finance/chart/DEAD"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;

  let mut ratings = HashMap::new();
  ratings.insert("LEAD".to_string(), 92.0);
  ratings.insert("DEAD".to_string(), 92.0);

  let screener = StockScreener::new(
    Arc::new(provider(&server)),
    ScreenerCriteria::default(),
    RsMethod::External(ratings),
    ScreenerSettings { as_of: Some(as_of()), ..ScreenerSettings::default() },
  )
  .unwrap();

  let report = screener.run(&Universe::from_symbols(["LEAD", "DEAD"])).await.unwrap();
  assert_eq!(report.passed_symbols(), vec!["LEAD"]);
  assert_eq!(report.failures.len(), 1);
  assert_eq!(report.failures[0].symbol, "DEAD");
}
