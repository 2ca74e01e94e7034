//! Scan orchestrator - fans symbol × timeframe tasks across a bounded
//! worker pool.
//!
//! Each task is a pure function of its fetched bars plus the scan
//! configuration; tasks share nothing but the result channel. A single
//! aggregator drains the channel and applies the deterministic final sort,
//! so output order never depends on completion order. Per-task failures
//! (fetch errors, too few bars) drop that task only and never abort the
//! batch.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, warn};

use crate::analytics::{
    combine, confirm_breakout, detect_divergences, detect_order_blocks, find_pivots, near_zone,
    rsi, select_active, OrderBlock,
};
use crate::config::ScanConfig;
use crate::data::{BarProvider, BarSeries};
use crate::types::{ScanResult, ScanSummary, Signal, Timeframe};

/// Results plus aggregate counters for one scan batch.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub results: Vec<ScanResult>,
    pub summary: ScanSummary,
}

/// Concurrent multi-symbol/multi-timeframe scanner.
pub struct Scanner {
    provider: Arc<dyn BarProvider>,
    config: ScanConfig,
    max_workers: usize,
}

impl Scanner {
    pub fn new(provider: Arc<dyn BarProvider>, config: ScanConfig, max_workers: usize) -> Self {
        Self {
            provider,
            config,
            max_workers: max_workers.max(1),
        }
    }

    /// Scan the symbols × timeframes cross product.
    ///
    /// Only configuration validation errors propagate; everything that
    /// goes wrong inside a task is logged and dropped.
    pub async fn run(&self, symbols: &[String], timeframes: &[Timeframe]) -> Result<ScanOutcome> {
        self.config.validate()?;

        let scanned = symbols.len() * timeframes.len();
        info!(
            tasks = scanned,
            workers = self.max_workers,
            "starting scan batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let (tx, mut rx) = mpsc::channel::<ScanResult>(scanned.max(1));

        for symbol in symbols {
            for &timeframe in timeframes {
                let permit_source = semaphore.clone();
                let tx = tx.clone();
                let provider = self.provider.clone();
                let config = self.config.clone();
                let symbol = symbol.clone();

                tokio::spawn(async move {
                    let _permit = match permit_source.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => return,
                    };
                    match provider.fetch(&symbol, timeframe).await {
                        Ok(series) => {
                            if let Some(result) =
                                scan_series(&symbol, timeframe, &series, &config)
                            {
                                let _ = tx.send(result).await;
                            }
                        }
                        Err(e) => {
                            warn!(%symbol, %timeframe, error = %e, "fetch failed, task dropped");
                        }
                    }
                });
            }
        }
        drop(tx);

        let mut results = Vec::new();
        while let Some(result) = rx.recv().await {
            results.push(result);
        }
        sort_results(&mut results);

        let summary = ScanSummary {
            scanned,
            signals: results.iter().filter(|r| r.signal != Signal::None).count(),
            validated: results.iter().filter(|r| r.validated).count(),
            ob_confirmed: results.iter().filter(|r| r.ob_confirmed).count(),
            timestamp: Utc::now(),
        };
        info!(
            scanned = summary.scanned,
            returned = results.len(),
            signals = summary.signals,
            validated = summary.validated,
            "scan batch complete"
        );

        Ok(ScanOutcome { results, summary })
    }
}

/// Deterministic result ordering: validated-and-signaled rows first, then
/// symbol ascending, then canonical timeframe order.
pub fn sort_results(results: &mut [ScanResult]) {
    results.sort_by(|a, b| {
        (!a.validated, a.signal == Signal::None, &a.symbol, a.timeframe).cmp(&(
            !b.validated,
            b.signal == Signal::None,
            &b.symbol,
            b.timeframe,
        ))
    });
}

/// Analyze one fetched bar series. Pure: no I/O, no shared state.
///
/// Returns `None` when the series is too short or the task produces no
/// qualifying row under the active feature toggles.
pub fn scan_series(
    symbol: &str,
    timeframe: Timeframe,
    series: &BarSeries,
    config: &ScanConfig,
) -> Option<ScanResult> {
    let bars = &series.bars;
    if bars.len() < config.min_bars() {
        debug!(
            %symbol,
            %timeframe,
            bars = bars.len(),
            needed = config.min_bars(),
            "insufficient data, task dropped"
        );
        return None;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    // RSI is always computed: it is displayed even when divergence is off.
    let rsi_series = rsi(&closes, config.rsi_length);
    let price = *closes.last()?;
    let current_rsi = *rsi_series.last()?;

    let mut signal = Signal::None;
    let mut divergence = None;
    if config.divergence_enabled {
        let (rsi_pivot_highs, rsi_pivot_lows) =
            find_pivots(&rsi_series, config.pivot_window, config.pivot_window);
        let divergences = detect_divergences(
            &highs,
            &lows,
            &rsi_series,
            &rsi_pivot_highs,
            &rsi_pivot_lows,
        );
        if let Some((flavor, _anchor)) =
            select_active(&divergences, bars.len(), config.pivot_window)
        {
            signal = flavor.signal();
            divergence = Some(flavor.kind());
        }
    }

    let mut near_bullish = false;
    let mut near_bearish = false;
    let mut bullish_blocks: Vec<OrderBlock> = Vec::new();
    let mut bearish_blocks: Vec<OrderBlock> = Vec::new();
    let mut ob_confirmed = false;
    let mut ob_confirm_direction = None;
    let mut ob_confirm_zone = None;

    if config.order_block_enabled {
        let (price_pivot_highs, _) = find_pivots(&highs, config.pivot_window, config.pivot_window);
        let (_, price_pivot_lows) = find_pivots(&lows, config.pivot_window, config.pivot_window);
        let (bullish, bearish) = detect_order_blocks(bars, &price_pivot_highs, &price_pivot_lows);
        near_bullish = near_zone(price, &bullish, config.ob_proximity_pct);
        near_bearish = near_zone(price, &bearish, config.ob_proximity_pct);

        if config.ob_confirm_pct > 0.0 {
            if let Some(zone) =
                confirm_breakout(price, &bullish, config.ob_confirm_pct, Signal::Bullish)
            {
                ob_confirmed = true;
                ob_confirm_direction = Some(Signal::Bullish);
                ob_confirm_zone = Some(zone.zone_label());
            }
            if let Some(zone) =
                confirm_breakout(price, &bearish, config.ob_confirm_pct, Signal::Bearish)
            {
                ob_confirmed = true;
                ob_confirm_direction = Some(Signal::Bearish);
                ob_confirm_zone = Some(zone.zone_label());
            }
        }

        bullish_blocks = bullish;
        bearish_blocks = bearish;
    }

    let combined = combine(config, signal, near_bullish, near_bearish)?;
    let signal = combined.signal;

    let ob_zone = if config.order_block_enabled && (near_bullish || near_bearish) {
        if (signal == Signal::Bullish || near_bullish) && !bullish_blocks.is_empty() {
            bullish_blocks.last().map(|z| z.zone_label())
        } else if (signal == Signal::Bearish || near_bearish) && !bearish_blocks.is_empty() {
            bearish_blocks.last().map(|z| z.zone_label())
        } else {
            None
        }
    } else {
        None
    };

    Some(ScanResult {
        symbol: symbol.to_string(),
        timeframe,
        signal,
        divergence,
        validated: combined.validated,
        near_order_block: near_bullish || near_bearish,
        rsi: round_to(current_rsi, 1),
        price: round_to(price, 2),
        ob_zone,
        market_cap: series.market_cap,
        ob_confirmed,
        ob_confirm_direction,
        ob_confirm_zone,
    })
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
