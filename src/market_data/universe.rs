use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::ScreenerError;

/// 스크리닝 대상 종목 목록 (순서 유지, 중복 제거)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
  symbols: Vec<String>,
}

/// 티커 정규화: 공백 제거, 대문자, 클래스 주식 표기(BRK.B -> BRK-B)
pub fn normalize_symbol(raw: &str) -> Option<String> {
  let symbol = raw.trim().trim_matches('"').trim();
  if symbol.is_empty() || symbol.starts_with('#') {
    return None;
  }
  Some(symbol.to_uppercase().replace('.', "-"))
}

impl Universe {
  pub fn from_symbols<I, S>(symbols: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut universe = Universe::default();
    universe.extend(symbols);
    universe
  }

  /// 파일에서 종목 목록 로드
  ///
  /// 첫 줄에 쉼표가 있으면 CSV로 보고 Symbol/Ticker 컬럼을 읽는다. 아니면 한 줄에 하나.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScreenerError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let first_line = contents.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    if !first_line.contains(',') {
      return Ok(Universe::from_symbols(contents.lines()));
    }

    let mut rdr = csv::ReaderBuilder::new()
      .trim(csv::Trim::All)
      .from_reader(contents.as_bytes());
    let headers = rdr.headers()?.clone();
    let column = headers
      .iter()
      .position(|h| h.eq_ignore_ascii_case("symbol") || h.eq_ignore_ascii_case("ticker"))
      .ok_or_else(|| {
        ScreenerError::ParseError(format!("{}: no Symbol or Ticker column", path.display()))
      })?;

    let mut symbols = Vec::new();
    for record in rdr.records() {
      let record = record?;
      if let Some(value) = record.get(column) {
        symbols.push(value.to_string());
      }
    }

    Ok(Universe::from_symbols(symbols))
  }

  pub fn extend<I, S>(&mut self, symbols: I)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut seen: HashSet<String> = self.symbols.iter().cloned().collect();
    for raw in symbols {
      if let Some(symbol) = normalize_symbol(raw.as_ref()) {
        if seen.insert(symbol.clone()) {
          self.symbols.push(symbol);
        }
      }
    }
  }

  pub fn symbols(&self) -> &[String] {
    &self.symbols
  }

  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.symbols.iter().map(|s| s.as_str())
  }
}
