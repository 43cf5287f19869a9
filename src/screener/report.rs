use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ScreenerError;
use crate::models::screening::ScreeningReport;

pub const CSV_HEADERS: [&str; 10] = [
  "Date",
  "Counter",
  "Ticker",
  "RS Rating",
  "Current Close",
  "50 Day MA",
  "150 Day MA",
  "200 Day MA",
  "52 Week Low",
  "52 Week High",
];

/// 통과 종목을 CSV로 기록 (통과 종목이 없어도 헤더는 기록)
pub fn write_csv_to<W: Write>(report: &ScreeningReport, writer: W) -> Result<(), ScreenerError> {
  let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
  wtr.write_record(CSV_HEADERS)?;
  for stock in &report.passed {
    wtr.serialize(stock)?;
  }
  wtr.flush()?;
  Ok(())
}

pub fn write_csv(report: &ScreeningReport, path: impl AsRef<Path>) -> Result<(), ScreenerError> {
  let file = File::create(path.as_ref())?;
  write_csv_to(report, file)?;
  log::info!("결과 저장: {}", path.as_ref().display());
  Ok(())
}
