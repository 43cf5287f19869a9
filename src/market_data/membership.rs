/**
* filename : membership
* author : HAMA
* date: 2025. 5. 14.
* description: 지수 구성 종목 조회 (S&P 500 구성 종목 표)
**/

use std::time::Duration;

use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::ScreenerError;
use crate::market_data::universe::Universe;

pub const SP500_MEMBERS_URL: &str = "https://en.wikipedia.org/wiki/List_of_S%26P_500_companies";

/// 구성 종목 표가 있는 페이지에서 유니버스를 받아온다
pub struct IndexMembership {
  client: Client,
  url: String,
}

impl IndexMembership {
  pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ScreenerError> {
    let mut builder = Client::builder().user_agent(concat!("stock-screener/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
      builder = builder.timeout(timeout);
    }

    Ok(Self { client: builder.build()?, url: url.into() })
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  pub async fn fetch(&self) -> Result<Universe, ScreenerError> {
    log::info!("지수 구성 종목 조회: {}", self.url);
    let response = self.client.get(&self.url).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(ScreenerError::Provider(format!("{}: HTTP {}", self.url, status)));
    }

    let html = response.text().await?;
    let universe = parse_constituents(&html)?;
    log::info!("구성 종목 {}개 로드", universe.len());
    Ok(universe)
  }
}

/// 구성 종목 표의 첫 번째 열(티커)을 읽는다
///
/// `#constituents` 표를 우선 찾고, 없으면 첫 `wikitable`을 쓴다. 헤더 행(th)은 건너뛴다.
pub fn parse_constituents(html: &str) -> Result<Universe, ScreenerError> {
  let document = Html::parse_document(html);
  let cell = selector("td")?;

  for table_selector in ["table#constituents", "table.wikitable"] {
    let table = selector(table_selector)?;
    let row = selector("tr")?;

    let Some(table) = document.select(&table).next() else {
      continue;
    };

    let symbols: Vec<String> = table
      .select(&row)
      .filter_map(|tr| tr.select(&cell).next())
      .map(|td| td.text().collect::<String>())
      .collect();

    let universe = Universe::from_symbols(symbols);
    if !universe.is_empty() {
      return Ok(universe);
    }
  }

  Err(ScreenerError::ParseError("no constituents table found".to_string()))
}

fn selector(css: &str) -> Result<Selector, ScreenerError> {
  Selector::parse(css).map_err(|e| ScreenerError::ParseError(format!("invalid selector {}: {:?}", css, e)))
}
