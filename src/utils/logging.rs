//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::ScreenerError;
use crate::models::screening::SymbolFailure;

/// 로그 레벨 문자열 파싱 (알 수 없는 값은 info)
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// RUST_LOG가 없을 때만 적용할 기본 레벨
///
/// RUST_LOG가 있으면 `stock_screener=debug` 같은 지시어를 env_logger가 그대로 해석한다.
pub fn fallback_level(rust_log: Option<&str>, default_level: &str) -> Option<LevelFilter> {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => None,
        _ => Some(parse_level(default_level)),
    }
}

/// 로깅 시스템 초기화
///
/// RUST_LOG가 설정되어 있으면 그 지시어를, 아니면 `default_level`을 사용한다.
pub fn init(default_level: &str) -> Result<(), ScreenerError> {
    let mut builder = Builder::from_default_env();

    let rust_log = env::var("RUST_LOG").ok();
    if let Some(level) = fallback_level(rust_log.as_deref(), default_level) {
        builder.filter_level(level);
    }

    builder
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| ScreenerError::ConfigError(format!("logger already initialised: {}", e)))?;

    log::info!(
        "로깅 시스템 초기화 완료: 레벨 = {}",
        rust_log.unwrap_or_else(|| default_level.to_string())
    );

    Ok(())
}

/// 스크리닝 시작 로그
pub fn log_screening_start(universe_size: usize, evaluated_at: &str) {
    log::info!("스크리닝 시작: 종목 {}개 - 기준일: {}", universe_size, evaluated_at);
}

/// 종목 데이터 요청 로그
pub fn log_symbol_pull(symbol: &str, counter: usize, total: usize) {
    log::info!("pulling {} with index {}/{}", symbol, counter, total);
}

/// 조건 통과 로그
pub fn log_symbol_match(symbol: &str) {
    log::info!("{} match the requirements", symbol);
}

/// 종목별 실패 로그
pub fn log_symbol_failure(failure: &SymbolFailure) {
    log::warn!("종목 처리 실패 - {}: {}", failure.symbol, failure.reason);
}

/// 스크리닝 종료 로그
pub fn log_screening_end(passed: usize, rejected: usize, failed: usize) {
    log::info!("스크리닝 완료: 통과 {} - 탈락 {} - 오류 {}", passed, rejected, failed);
}

/// 오류 로그
pub fn log_error(context: &str, error: &ScreenerError) {
    log::error!("오류 발생 - {}: {}", context, error);
}
