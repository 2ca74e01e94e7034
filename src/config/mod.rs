//! Configuration management for DivScan
//!
//! Loads from optional config files + environment variables via .env.
//! The watch list lives here as injected data, never baked into the
//! analytics core.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::types::Timeframe;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub watchlist: WatchlistConfig,
    pub scan: ScanConfig,
    pub scanner: ScannerConfig,
    pub data: DataConfig,
}

/// The symbols × timeframes cross product to scan
#[derive(Debug, Clone, Deserialize)]
pub struct WatchlistConfig {
    /// Symbols to scan
    pub symbols: Vec<String>,
    /// Timeframes to scan (1H, Daily, Weekly, Monthly)
    pub timeframes: Vec<String>,
}

/// Analytics parameters for a single scan task
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// RSI smoothing length
    pub rsi_length: usize,
    /// Symmetric left/right radius for pivot confirmation
    pub pivot_window: usize,
    /// Proximity threshold to an order-block midpoint (fraction, 0-1)
    pub ob_proximity_pct: f64,
    /// Breakout confirmation margin (fraction, 0 disables confirmation)
    pub ob_confirm_pct: f64,
    /// Enable RSI divergence detection
    pub divergence_enabled: bool,
    /// Enable order-block detection
    pub order_block_enabled: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            rsi_length: 14,
            pivot_window: 5,
            ob_proximity_pct: 0.01,
            ob_confirm_pct: 0.0,
            divergence_enabled: true,
            order_block_enabled: true,
        }
    }
}

impl ScanConfig {
    /// Fewest bars a task needs before it is worth analyzing.
    pub fn min_bars(&self) -> usize {
        self.rsi_length + self.pivot_window * 2 + 10
    }

    /// Reject invalid parameter combinations before any task executes.
    pub fn validate(&self) -> Result<()> {
        if self.rsi_length == 0 {
            bail!("rsi_length must be greater than zero");
        }
        if self.pivot_window == 0 {
            bail!("pivot_window must be greater than zero");
        }
        if !(0.0..=1.0).contains(&self.ob_proximity_pct) {
            bail!("ob_proximity_pct must be within 0..=1");
        }
        if self.ob_confirm_pct < 0.0 {
            bail!("ob_confirm_pct must not be negative");
        }
        if !self.divergence_enabled && !self.order_block_enabled {
            bail!("enable at least one of: RSI divergence or order blocks");
        }
        Ok(())
    }
}

/// Worker-pool settings
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    /// Maximum concurrent scan tasks
    pub max_workers: usize,
}

/// File-backed bar provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding `<SYMBOL>_<TIMEFRAME>.json` bar files
    pub data_dir: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Watchlist defaults
            .set_default(
                "watchlist.symbols",
                vec!["RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "INFY.NS"],
            )?
            .set_default("watchlist.timeframes", vec!["Daily"])?
            // Scan defaults
            .set_default("scan.rsi_length", 14)?
            .set_default("scan.pivot_window", 5)?
            .set_default("scan.ob_proximity_pct", 0.01)?
            .set_default("scan.ob_confirm_pct", 0.0)?
            .set_default("scan.divergence_enabled", true)?
            .set_default("scan.order_block_enabled", true)?
            // Scanner defaults
            .set_default("scanner.max_workers", 20)?
            // Data defaults
            .set_default("data.data_dir", "./data")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (DIVSCAN_*)
            .add_source(Environment::with_prefix("DIVSCAN").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Resolve the configured timeframe labels, rejecting unknown ones.
    pub fn timeframes(&self) -> Result<Vec<Timeframe>> {
        self.watchlist
            .timeframes
            .iter()
            .map(|label| {
                Timeframe::from_str(label)
                    .with_context(|| format!("Unknown timeframe label: {label}"))
            })
            .collect()
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "symbols={} timeframes={:?} rsi_len={} pivot={} prox={:.3} confirm={:.3} div={} ob={} workers={}",
            self.watchlist.symbols.len(),
            self.watchlist.timeframes,
            self.scan.rsi_length,
            self.scan.pivot_window,
            self.scan.ob_proximity_pct,
            self.scan.ob_confirm_pct,
            self.scan.divergence_enabled,
            self.scan.order_block_enabled,
            self.scanner.max_workers
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scan_config_is_valid() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn min_bars_formula() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.min_bars(), 14 + 2 * 5 + 10);
    }

    #[test]
    fn both_toggles_off_is_rejected() {
        let cfg = ScanConfig {
            divergence_enabled: false,
            order_block_enabled: false,
            ..ScanConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let cfg = ScanConfig {
            rsi_length: 0,
            ..ScanConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ScanConfig {
            pivot_window: 0,
            ..ScanConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ScanConfig {
            ob_proximity_pct: 1.5,
            ..ScanConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ScanConfig {
            ob_confirm_pct: -0.1,
            ..ScanConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
