/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ScreenerError;
use crate::market_data::membership::SP500_MEMBERS_URL;
use crate::market_data::yahoo::DEFAULT_BASE_URL;
use crate::screener::conditions::ScreenerCriteria;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub universe: UniverseConfig,
    pub data: DataConfig,
    pub criteria: ScreenerCriteria,
    pub relative_strength: RelativeStrengthConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// RS 계산 벤치마크 지수 (예: ^GSPC)
    pub index_ticker: String,
    pub symbols: Vec<String>,
    /// 한 줄에 하나씩, 또는 Symbol 컬럼이 있는 CSV
    pub file: Option<String>,
    /// 목록이 비었을 때 구성 종목을 받아올 페이지 (None이면 사용 안 함)
    pub members_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Yahoo,
    CsvDir,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: DataSource,
    pub data_dir: Option<String>,
    pub yahoo_base_url: String,
    pub timeout_ms: Option<u64>,
    /// 기준일로부터 조회할 달력 일수
    pub lookback_days: i64,
    pub max_concurrency: usize,
    /// 마지막 봉이 기준일보다 이 일수 넘게 오래되면 제외
    pub max_staleness_days: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsMethodKind {
    Percentile,
    IndexRatio,
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeStrengthConfig {
    pub method: RsMethodKind,
    /// External 방식에서 사용하는 symbol,rs_rating CSV
    pub file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from ./config.json, falling back to defaults
    pub fn load() -> Result<Self, ScreenerError> {
        let config_path = Path::new("config.json");

        let mut cfg = if config_path.exists() {
            Config::read_file(config_path)?
        } else {
            Config::default()
        };
        // environment overrides
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from an explicit file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScreenerError> {
        let mut cfg = Config::read_file(path.as_ref())?;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn read_file(path: &Path) -> Result<Self, ScreenerError> {
        let mut file = File::open(path)
            .map_err(|e| ScreenerError::ConfigError(format!("Failed to open config file: {}", e)))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ScreenerError::ConfigError(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ScreenerError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides for runtime fields
    pub fn apply_env_overrides(&mut self) -> Result<(), ScreenerError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    fn apply_overrides_from(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ScreenerError> {
        let get = |key: &str| var(key).filter(|v| !v.is_empty());

        if let Some(v) = get("SCREENER_DATA_DIR") {
            self.data.data_dir = Some(v);
            self.data.source = DataSource::CsvDir;
        }
        if let Some(v) = get("SCREENER_INDEX_TICKER") { self.universe.index_ticker = v; }
        if let Some(v) = get("SCREENER_YAHOO_BASE_URL") { self.data.yahoo_base_url = v; }
        if let Some(v) = get("SCREENER_OUTPUT") { self.output.csv_path = v; }
        if let Some(v) = get("SCREENER_MAX_CONCURRENCY") {
            self.data.max_concurrency = match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ScreenerError::ConfigError(format!(
                        "SCREENER_MAX_CONCURRENCY must be a positive integer, got {:?}",
                        v
                    )))
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ScreenerError> {
        if self.data.max_concurrency == 0 {
            return Err(ScreenerError::ConfigError("data.max_concurrency must be positive".into()));
        }
        if self.data.lookback_days <= 0 {
            return Err(ScreenerError::ConfigError("data.lookback_days must be positive".into()));
        }
        if self.data.max_staleness_days < 0 {
            return Err(ScreenerError::ConfigError("data.max_staleness_days must not be negative".into()));
        }
        if self.data.source == DataSource::CsvDir && self.data.data_dir.is_none() {
            return Err(ScreenerError::ConfigError("data.data_dir is required for csv_dir source".into()));
        }
        if self.relative_strength.method == RsMethodKind::External && self.relative_strength.file.is_none() {
            return Err(ScreenerError::ConfigError("relative_strength.file is required for external ratings".into()));
        }
        self.criteria.validate()
    }
}

impl Default for UniverseConfig {
    fn default() -> Self {
        UniverseConfig {
            index_ticker: "^GSPC".to_string(),
            symbols: Vec::new(),
            file: None,
            members_url: Some(SP500_MEMBERS_URL.to_string()),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            source: DataSource::Yahoo,
            data_dir: None,
            yahoo_base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: Some(10_000),
            lookback_days: 365,
            max_concurrency: 4,
            max_staleness_days: 10,
        }
    }
}

impl Default for RelativeStrengthConfig {
    fn default() -> Self {
        RelativeStrengthConfig {
            method: RsMethodKind::Percentile,
            file: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            csv_path: "screened_stocks.csv".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"universe": {{"symbols": ["AAPL", "MSFT"]}}, "relative_strength": {{"method": "index_ratio"}}}}"#
        )
        .unwrap();

        let cfg = Config::read_file(file.path()).unwrap();
        assert_eq!(cfg.universe.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(cfg.universe.index_ticker, "^GSPC");
        assert_eq!(cfg.relative_strength.method, RsMethodKind::IndexRatio);
        assert_eq!(cfg.data.lookback_days, 365);
        assert_eq!(cfg.criteria.min_rs_rating, 70.0);
    }

    #[test]
    fn test_validate_rejects_missing_data_dir() {
        let mut cfg = Config::default();
        cfg.data.source = DataSource::CsvDir;
        assert!(cfg.validate().is_err());

        cfg.data.data_dir = Some("./data".into());
        assert!(cfg.validate().is_ok());
    }

    fn vars(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
    }

    #[test]
    fn test_env_overrides_apply() {
        let mut cfg = Config::default();
        cfg.apply_overrides_from(vars(&[
            ("SCREENER_DATA_DIR", "/tmp/prices"),
            ("SCREENER_MAX_CONCURRENCY", "8"),
            ("SCREENER_OUTPUT", ""),
        ]))
        .unwrap();

        assert_eq!(cfg.data.source, DataSource::CsvDir);
        assert_eq!(cfg.data.data_dir.as_deref(), Some("/tmp/prices"));
        assert_eq!(cfg.data.max_concurrency, 8);
        assert_eq!(cfg.output.csv_path, "screened_stocks.csv");
        assert_eq!(cfg.data.yahoo_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_concurrency_env_is_config_error() {
        for bad in ["zero", "0", "-3"] {
            let mut cfg = Config::default();
            let result = cfg.apply_overrides_from(move |key| {
                (key == "SCREENER_MAX_CONCURRENCY").then(|| bad.to_string())
            });
            assert!(matches!(result, Err(ScreenerError::ConfigError(_))), "accepted {:?}", bad);
            assert_eq!(cfg.data.max_concurrency, 4);
        }
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(Config::read_file(file.path()), Err(ScreenerError::ConfigError(_))));
    }
}
