//! External bar-data boundary.
//!
//! The core never fetches, caches or normalizes market data itself; it is
//! handed an ascending-time bar sequence (plus an optional market-cap
//! scalar) through the [`BarProvider`] trait. A JSON-file-backed
//! implementation serves the CLI and demos.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{Bar, Timeframe};

/// One fetched bar sequence for a (symbol, timeframe) pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BarSeries {
    /// Bars in ascending time order
    pub bars: Vec<Bar>,
    /// Optional market-cap scalar, passed through to results untouched
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// External market-data collaborator.
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Fetch the historical bar window for one symbol and timeframe.
    async fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<BarSeries>;
}

/// Reads bar series from `<data_dir>/<SYMBOL>_<TIMEFRAME>.json`.
pub struct JsonFileProvider {
    data_dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.data_dir.join(format!("{symbol}_{timeframe}.json"))
    }
}

#[async_trait]
impl BarProvider for JsonFileProvider {
    async fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<BarSeries> {
        let path = self.path_for(symbol, timeframe);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read bar file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse bar file {}", path.display()))
    }
}
