/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};

use stock_screener::config::{Config, DataSource, RsMethodKind};
use stock_screener::market_data::{
    CsvDirectoryProvider, HistoricalDataProvider, IndexMembership, Universe, YahooChartProvider,
};
use stock_screener::screener::relative_strength::load_external_ratings;
use stock_screener::screener::{write_csv, CryptoScreener, RsMethod, ScreenerSettings, StockScreener};
use stock_screener::utils::{logging, parse_date};

#[derive(Parser, Debug)]
#[command(author, version, about = "Screens equities against the eight trend template conditions.")]
struct Cli {
    /// Path to a JSON config file (defaults to ./config.json when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the stock screener over a universe of tickers.
    Screen(ScreenArgs),

    /// Runs the crypto screener (not implemented yet).
    Crypto,
}

#[derive(Args, Debug, Default)]
struct ScreenArgs {
    /// File with one ticker per line, or a CSV with a Symbol column.
    #[arg(short, long)]
    universe: Option<PathBuf>,

    /// Comma separated tickers added to the universe.
    #[arg(short, long, value_delimiter = ',')]
    symbols: Vec<String>,

    /// Benchmark index ticker used by the index ratio RS rating.
    #[arg(long)]
    index: Option<String>,

    /// Evaluation date in YYYY-MM-DD format (defaults to today).
    #[arg(long)]
    as_of: Option<String>,

    /// Read daily closes from {dir}/{SYMBOL}.csv instead of Yahoo Finance.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// How RS ratings are produced.
    #[arg(long, value_enum)]
    rs: Option<RsArg>,

    /// symbol,rs_rating CSV for --rs external.
    #[arg(long)]
    rs_file: Option<PathBuf>,

    /// Output CSV path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of symbols fetched concurrently.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Calendar days of history to request.
    #[arg(long)]
    lookback_days: Option<i64>,

    /// Skip symbols whose last close is more than this many days before the evaluation date.
    #[arg(long)]
    max_staleness_days: Option<i64>,

    /// Page with the index constituents table, used when no tickers are given.
    #[arg(long)]
    members_url: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RsArg {
    Percentile,
    Index,
    External,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // 설정 로드
    let config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Screen(args) => {
            let config = apply_overrides(config, &args)?;
            // 로깅 초기화
            logging::init(&config.logging.level)?;
            log::info!("설정 로드 완료");
            run_screen(config, args.as_of.as_deref()).await
        }
        Commands::Crypto => {
            logging::init(&config.logging.level)?;
            run_crypto().await
        }
    }
}

fn apply_overrides(mut config: Config, args: &ScreenArgs) -> Result<Config, anyhow::Error> {
    if let Some(path) = &args.universe {
        config.universe.file = Some(path.display().to_string());
    }
    config.universe.symbols.extend(args.symbols.iter().cloned());
    if let Some(index) = &args.index {
        config.universe.index_ticker = index.clone();
    }
    if let Some(dir) = &args.data_dir {
        config.data.source = DataSource::CsvDir;
        config.data.data_dir = Some(dir.display().to_string());
    }
    if let Some(rs) = args.rs {
        config.relative_strength.method = match rs {
            RsArg::Percentile => RsMethodKind::Percentile,
            RsArg::Index => RsMethodKind::IndexRatio,
            RsArg::External => RsMethodKind::External,
        };
    }
    if let Some(path) = &args.rs_file {
        config.relative_strength.file = Some(path.display().to_string());
    }
    if let Some(path) = &args.output {
        config.output.csv_path = path.display().to_string();
    }
    if let Some(n) = args.concurrency {
        config.data.max_concurrency = n;
    }
    if let Some(days) = args.lookback_days {
        config.data.lookback_days = days;
    }
    if let Some(days) = args.max_staleness_days {
        config.data.max_staleness_days = days;
    }
    if let Some(url) = &args.members_url {
        config.universe.members_url = Some(url.clone());
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

async fn build_universe(config: &Config) -> Result<Universe, anyhow::Error> {
    let mut universe = match &config.universe.file {
        Some(path) => Universe::from_file(path).with_context(|| format!("failed to read universe {}", path))?,
        None => Universe::default(),
    };
    universe.extend(&config.universe.symbols);

    if universe.is_empty() {
        match (config.data.source, &config.data.data_dir, &config.universe.members_url) {
            // 데이터 디렉터리의 CSV 전체를 대상으로
            (DataSource::CsvDir, Some(dir), _) => {
                let mut symbols = CsvDirectoryProvider::new(dir).available_symbols()?;
                symbols.retain(|symbol| symbol != &config.universe.index_ticker);
                universe.extend(symbols);
            }
            // 지수 구성 종목
            (DataSource::Yahoo, _, Some(url)) => {
                let membership = IndexMembership::new(url.clone(), config.data.timeout_ms.map(Duration::from_millis))?;
                universe = membership
                    .fetch()
                    .await
                    .with_context(|| format!("failed to load index members from {}", membership.url()))?;
            }
            _ => {}
        }
    }

    if universe.is_empty() {
        bail!("universe is empty: pass --universe or --symbols, or set universe.symbols in config.json");
    }
    Ok(universe)
}

fn build_provider(config: &Config) -> Result<Arc<dyn HistoricalDataProvider>, anyhow::Error> {
    let provider: Arc<dyn HistoricalDataProvider> = match config.data.source {
        DataSource::CsvDir => {
            let dir = config.data.data_dir.as_deref().context("data.data_dir is not set")?;
            log::info!("CSV 데이터 디렉터리 사용: {}", dir);
            Arc::new(CsvDirectoryProvider::new(dir))
        }
        DataSource::Yahoo => {
            log::info!("Yahoo Finance 사용: {}", config.data.yahoo_base_url);
            Arc::new(YahooChartProvider::new(
                config.data.yahoo_base_url.clone(),
                config.data.timeout_ms.map(Duration::from_millis),
            )?)
        }
    };
    Ok(provider)
}

fn build_rs_method(config: &Config) -> Result<RsMethod, anyhow::Error> {
    Ok(match config.relative_strength.method {
        RsMethodKind::Percentile => RsMethod::Percentile,
        RsMethodKind::IndexRatio => RsMethod::IndexRatio,
        RsMethodKind::External => {
            let path = config.relative_strength.file.as_deref().context("relative_strength.file is not set")?;
            let ratings = load_external_ratings(path).with_context(|| format!("failed to read RS ratings {}", path))?;
            log::info!("외부 RS 점수 {}개 로드", ratings.len());
            RsMethod::External(ratings)
        }
    })
}

async fn run_screen(config: Config, as_of: Option<&str>) -> Result<(), anyhow::Error> {
    let universe = build_universe(&config).await?;
    let provider = build_provider(&config)?;
    let rs_method = build_rs_method(&config)?;

    let settings = ScreenerSettings {
        index_ticker: config.universe.index_ticker.clone(),
        lookback_days: config.data.lookback_days,
        max_concurrency: config.data.max_concurrency,
        as_of: as_of.map(parse_date).transpose()?,
        max_staleness_days: config.data.max_staleness_days,
    };

    let screener = StockScreener::new(provider, config.criteria.clone(), rs_method, settings)?;
    let report = screener.run(&universe).await?;

    println!("\n{}", report.summary());
    if !report.failures.is_empty() {
        println!("=== 처리 실패 종목 ===");
        for failure in &report.failures {
            println!("  {:<8} {}", failure.symbol, failure.reason);
        }
    }

    write_csv(&report, &config.output.csv_path)?;
    Ok(())
}

async fn run_crypto() -> Result<(), anyhow::Error> {
    let screener = CryptoScreener::new();
    if let Err(e) = screener.screen(&Universe::default()).await {
        logging::log_error("crypto", &e);
        bail!(e);
    }
    Ok(())
}
