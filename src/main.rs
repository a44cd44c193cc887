//! SentimentTrader - Main Entry Point
//!
//! Runs the news-sentiment strategy either live against Alpaca or as a
//! backtest over historical prices and headlines.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sentiment_trader::alpaca::{AlpacaBroker, AlpacaNewsFeed, AlpacaRestClient};
use sentiment_trader::backtest::Backtest;
use sentiment_trader::config::{load_config, load_from_env, AppConfig};
use sentiment_trader::engine::{run, LiveClock};
use sentiment_trader::oracle::HttpSentimentOracle;
use sentiment_trader::strategy::{SentimentStrategy, StrategyController};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trade live (paper or real) through Alpaca
    Live,
    /// Replay the configured historical window against a simulated account
    Backtest,
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_logging(level: Level, json: bool) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    // Configuration errors are fatal before any iteration runs. Without a
    // config file, fall back to the plain ALPACA_* / SENTIMENT_ORACLE_URL
    // environment variables.
    let from_file = Path::new(&args.config).exists();
    let config = if from_file {
        load_config(Some(args.config.as_str()))
    } else {
        load_from_env()
    }
    .context("loading configuration")?;

    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.settings.log_level));
    init_logging(level, args.log_json)?;

    info!("Starting SentimentTrader");
    if from_file {
        info!("Configuration file: {}", args.config);
    } else {
        info!("No {} found, configured from environment", args.config);
    }

    let oracle = Arc::new(HttpSentimentOracle::with_timeout(
        &config.oracle.url,
        config.settings.request_timeout(),
    )?);

    match args.command {
        Command::Live => run_live(&config, oracle).await,
        Command::Backtest => {
            let backtest_config = config
                .backtest
                .as_ref()
                .context("backtest mode requires a [backtest] section")?;
            let report = Backtest::from_config(&config, backtest_config, oracle)?
                .run()
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
    }
}

async fn run_live(config: &AppConfig, oracle: Arc<HttpSentimentOracle>) -> Result<()> {
    let alpaca = config
        .alpaca
        .as_ref()
        .context("live mode requires an [alpaca] section with api_key and api_secret")?;
    if !alpaca.paper {
        warn!("Trading against a LIVE Alpaca account");
    }

    let rest = AlpacaRestClient::from_config(alpaca, config.settings.request_timeout())?;
    let strategy = SentimentStrategy::new(&config.strategy)?;
    let mut controller = StrategyController::new(
        strategy,
        Arc::new(AlpacaBroker::new(rest.clone())),
        Arc::new(AlpacaNewsFeed::new(rest)),
        oracle,
    )
    .with_news_lookback_days(config.strategy.news_lookback_days)
    .with_request_timeout(config.settings.request_timeout());

    let mut clock = LiveClock::new(config.strategy.interval()?);

    info!(
        symbol = %config.strategy.symbol,
        interval = %config.strategy.iteration_interval,
        "Live trading started"
    );

    tokio::select! {
        result = run(&mut clock, &mut controller) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, cleaning up...");
        }
    }

    controller.shutdown();
    Ok(())
}
