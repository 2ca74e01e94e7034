//! DivScan CLI - one-shot scan over the configured watch list.
//!
//! Fetches bars through the file-backed provider, runs the concurrent
//! scan and logs the ranked result set. Presentation stays thin; all the
//! logic lives in the library.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use divscan::config::AppConfig;
use divscan::data::JsonFileProvider;
use divscan::scanner::Scanner;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    config.scan.validate()?;
    info!("divscan starting: {}", config.digest());

    let timeframes = config.timeframes()?;
    let provider = Arc::new(JsonFileProvider::new(&config.data.data_dir));
    let scanner = Scanner::new(provider, config.scan.clone(), config.scanner.max_workers);

    let outcome = scanner.run(&config.watchlist.symbols, &timeframes).await?;

    for result in &outcome.results {
        let divergence = result
            .divergence
            .map(|d| d.to_string())
            .unwrap_or_default();
        let zone = result.ob_zone.as_deref().unwrap_or("-");
        info!(
            "{:<12} {:<8} signal={:<8} div={:<8} validated={:<5} near_ob={:<5} rsi={:>5.1} price={:>10.2} zone={}",
            result.symbol,
            result.timeframe.to_string(),
            result.signal.to_string(),
            divergence,
            result.validated,
            result.near_order_block,
            result.rsi,
            result.price,
            zone
        );
        if result.ob_confirmed {
            if let (Some(direction), Some(zone)) =
                (result.ob_confirm_direction, result.ob_confirm_zone.as_deref())
            {
                info!(
                    "{:<12} {:<8} breakout confirmed: {} through {}",
                    result.symbol,
                    result.timeframe.to_string(),
                    direction,
                    zone
                );
            }
        }
    }

    let summary = &outcome.summary;
    info!(
        "scanned {} tasks: {} signals, {} validated, {} breakout-confirmed at {}",
        summary.scanned,
        summary.signals,
        summary.validated,
        summary.ob_confirmed,
        summary.timestamp.format("%Y-%m-%d %H:%M:%S")
    );

    Ok(())
}
