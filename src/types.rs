//! Core types used throughout DivScan
//!
//! Defines common data structures for bars, timeframes, signals and
//! scan results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single OHLC price bar.
///
/// Bars arrive in ascending time order and are immutable once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
}

impl Bar {
    /// Bearish body: the bar closed below its open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Bullish body: the bar closed above its open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

/// Supported scan timeframes.
///
/// The declaration order is the canonical display/sort order, so the
/// derived `Ord` gives the ranking used by the result set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Timeframe {
    Hour1,
    Daily,
    Weekly,
    Monthly,
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::Daily
    }
}

impl Timeframe {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "1h" | "hour" | "hourly" => Some(Timeframe::Hour1),
            "daily" | "1d" | "d" => Some(Timeframe::Daily),
            "weekly" | "1wk" | "w" => Some(Timeframe::Weekly),
            "monthly" | "1mo" | "m" => Some(Timeframe::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Hour1 => write!(f, "1H"),
            Timeframe::Daily => write!(f, "Daily"),
            Timeframe::Weekly => write!(f, "Weekly"),
            Timeframe::Monthly => write!(f, "Monthly"),
        }
    }
}

/// Directional signal produced for a (symbol, timeframe) task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    None,
    Bullish,
    Bearish,
}

impl Default for Signal {
    fn default() -> Self {
        Signal::None
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::None => write!(f, "None"),
            Signal::Bullish => write!(f, "Bullish"),
            Signal::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Divergence flavor carried on a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DivergenceKind {
    Regular,
    Hidden,
}

impl fmt::Display for DivergenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceKind::Regular => write!(f, "Regular"),
            DivergenceKind::Hidden => write!(f, "Hidden"),
        }
    }
}

/// One row of the scan output, produced per (symbol, timeframe) task.
///
/// Created fresh per scan and never mutated afterwards; the caller owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Symbol scanned
    pub symbol: String,
    /// Timeframe scanned
    pub timeframe: Timeframe,
    /// Directional signal
    pub signal: Signal,
    /// Divergence flavor behind the signal (None when signal came from OB only)
    pub divergence: Option<DivergenceKind>,
    /// Whether the signal passed the active validation mode
    pub validated: bool,
    /// Price is near a recent order-block zone (either direction)
    pub near_order_block: bool,
    /// Current RSI, rounded to 1 decimal
    pub rsi: f64,
    /// Current close, rounded to 2 decimals
    pub price: f64,
    /// The relevant order-block zone, formatted `"<low> – <high>"`
    pub ob_zone: Option<String>,
    /// Market-cap pass-through from the data provider
    pub market_cap: Option<f64>,
    /// An order-block breakout was confirmed at the current price
    pub ob_confirmed: bool,
    /// Direction of the confirmed breakout
    pub ob_confirm_direction: Option<Signal>,
    /// Zone of the confirmed breakout, formatted `"<low> – <high>"`
    pub ob_confirm_zone: Option<String>,
}

/// Aggregate counters for a whole scan batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Tasks attempted (symbols × timeframes)
    pub scanned: usize,
    /// Rows with a directional signal
    pub signals: usize,
    /// Rows that passed validation
    pub validated: usize,
    /// Rows with a confirmed order-block breakout
    pub ob_confirmed: usize,
    /// When the scan finished
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeframe_parsing() {
        assert_eq!(Timeframe::from_str("1H"), Some(Timeframe::Hour1));
        assert_eq!(Timeframe::from_str("daily"), Some(Timeframe::Daily));
        assert_eq!(Timeframe::from_str("1wk"), Some(Timeframe::Weekly));
        assert_eq!(Timeframe::from_str("Monthly"), Some(Timeframe::Monthly));
        assert_eq!(Timeframe::from_str("5m"), None);
    }

    #[test]
    fn test_timeframe_canonical_order() {
        let mut tfs = vec![
            Timeframe::Monthly,
            Timeframe::Hour1,
            Timeframe::Weekly,
            Timeframe::Daily,
        ];
        tfs.sort();
        assert_eq!(
            tfs,
            vec![
                Timeframe::Hour1,
                Timeframe::Daily,
                Timeframe::Weekly,
                Timeframe::Monthly
            ]
        );
    }

    #[test]
    fn test_bar_body_direction() {
        let bar = Bar {
            open: 10.0,
            high: 10.5,
            low: 9.5,
            close: 9.8,
        };
        assert!(bar.is_bearish());
        assert!(!bar.is_bullish());

        let flat = Bar {
            open: 10.0,
            high: 10.5,
            low: 9.5,
            close: 10.0,
        };
        assert!(!flat.is_bearish());
        assert!(!flat.is_bullish());
    }
}
