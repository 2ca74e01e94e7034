//! Order-block detection and zone validation.
//!
//! A bullish order block is the nearest bearish-bodied candle before price
//! breaks above the last confirmed pivot high; a bearish order block is the
//! nearest bullish-bodied candle before price breaks below the last
//! confirmed pivot low. Zones mark supply/demand areas that price tends to
//! revisit.

use crate::types::{Bar, Signal};

/// How far back a breakout searches for its anchor candle.
pub const ANCHOR_LOOKBACK: usize = 30;
/// Zones examined by proximity/confirmation checks (most recent first).
pub const ZONE_WINDOW: usize = 10;

/// A supply/demand candle zone.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderBlock {
    /// Zone top (anchor candle high)
    pub high: f64,
    /// Zone bottom (anchor candle low)
    pub low: f64,
    /// Index of the anchor candle
    pub origin_bar: usize,
    /// Index of the bar that broke the pivot level
    pub breakout_bar: usize,
}

impl OrderBlock {
    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// Display form used on result rows, e.g. `"101.25 – 103.80"`.
    pub fn zone_label(&self) -> String {
        format!("{:.2} – {:.2}", self.low, self.high)
    }
}

/// Derive order blocks from price-pivot breakouts.
///
/// Scans bars in time order, tracking the high of the most recently
/// confirmed pivot high and the low of the most recently confirmed pivot
/// low (thresholds update at the pivot bar itself). A bar whose high
/// crosses above the pivot-high threshold anchors a bullish block on the
/// nearest bearish-bodied candle within [`ANCHOR_LOOKBACK`] bars back;
/// the downside crossing is symmetric. Breakouts with no qualifying anchor
/// register nothing.
///
/// Returns `(bullish, bearish)` lists in discovery order.
pub fn detect_order_blocks(
    bars: &[Bar],
    pivot_highs: &[usize],
    pivot_lows: &[usize],
) -> (Vec<OrderBlock>, Vec<OrderBlock>) {
    let mut bullish = Vec::new();
    let mut bearish = Vec::new();

    let mut ph_iter = pivot_highs.iter().peekable();
    let mut pl_iter = pivot_lows.iter().peekable();
    let mut last_pivot_high: Option<f64> = None;
    let mut last_pivot_low: Option<f64> = None;

    for i in 0..bars.len() {
        if ph_iter.peek() == Some(&&i) {
            last_pivot_high = Some(bars[i].high);
            ph_iter.next();
        }
        if pl_iter.peek() == Some(&&i) {
            last_pivot_low = Some(bars[i].low);
            pl_iter.next();
        }
        if i == 0 {
            continue;
        }

        // Break above pivot high -> bullish block on last bearish candle
        if let Some(level) = last_pivot_high {
            if bars[i].high > level && bars[i - 1].high <= level {
                let search_from = i.saturating_sub(ANCHOR_LOOKBACK);
                if let Some(j) = (search_from..i).rev().find(|&j| bars[j].is_bearish()) {
                    bullish.push(OrderBlock {
                        high: bars[j].high,
                        low: bars[j].low,
                        origin_bar: j,
                        breakout_bar: i,
                    });
                }
            }
        }

        // Break below pivot low -> bearish block on last bullish candle
        if let Some(level) = last_pivot_low {
            if bars[i].low < level && bars[i - 1].low >= level {
                let search_from = i.saturating_sub(ANCHOR_LOOKBACK);
                if let Some(j) = (search_from..i).rev().find(|&j| bars[j].is_bullish()) {
                    bearish.push(OrderBlock {
                        high: bars[j].high,
                        low: bars[j].low,
                        origin_bar: j,
                        breakout_bar: i,
                    });
                }
            }
        }
    }

    (bullish, bearish)
}

/// True when `price` sits within `threshold` (fractional) of a recent zone
/// midpoint. Only the last [`ZONE_WINDOW`] zones are examined, most recent
/// first; the first match wins. Non-positive midpoints are skipped.
pub fn near_zone(price: f64, zones: &[OrderBlock], threshold: f64) -> bool {
    for zone in zones.iter().rev().take(ZONE_WINDOW) {
        let mid = zone.midpoint();
        if mid <= 0.0 {
            continue;
        }
        if ((price - mid) / mid).abs() <= threshold {
            return true;
        }
    }
    false
}

/// Breakout confirmation against recent zones.
///
/// Bullish zones confirm when `price ≥ high·(1+confirm_pct)`; bearish
/// zones when `price ≤ low·(1−confirm_pct)`. Same window and scan order as
/// [`near_zone`]; returns the first confirming zone.
pub fn confirm_breakout(
    price: f64,
    zones: &[OrderBlock],
    confirm_pct: f64,
    direction: Signal,
) -> Option<OrderBlock> {
    for zone in zones.iter().rev().take(ZONE_WINDOW) {
        let confirmed = match direction {
            Signal::Bullish => price >= zone.high * (1.0 + confirm_pct),
            Signal::Bearish => price <= zone.low * (1.0 - confirm_pct),
            Signal::None => false,
        };
        if confirmed {
            return Some(*zone);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            open,
            high,
            low,
            close,
        }
    }

    fn zone(low: f64, high: f64, origin: usize, breakout: usize) -> OrderBlock {
        OrderBlock {
            low,
            high,
            origin_bar: origin,
            breakout_bar: breakout,
        }
    }

    #[test]
    fn bullish_block_anchors_on_last_bearish_candle() {
        let bars = vec![
            bar(10.0, 10.5, 9.5, 10.2),
            bar(10.2, 11.0, 10.0, 10.8),
            bar(10.8, 12.0, 10.6, 11.8), // pivot high (12.0)
            bar(11.8, 11.5, 10.9, 11.0), // bearish: the anchor
            bar(11.0, 11.2, 10.8, 11.1),
            bar(11.1, 11.6, 11.0, 11.5),
            bar(11.5, 12.4, 11.4, 12.3), // breaks above 12.0
        ];
        let (bullish, bearish) = detect_order_blocks(&bars, &[2], &[]);
        assert!(bearish.is_empty());
        assert_eq!(bullish, vec![zone(10.9, 11.5, 3, 6)]);

        let ob = &bullish[0];
        assert!(ob.low <= ob.high);
        assert!(ob.origin_bar < ob.breakout_bar);
        assert!(ob.breakout_bar - ob.origin_bar <= ANCHOR_LOOKBACK);
    }

    #[test]
    fn bearish_block_anchors_on_last_bullish_candle() {
        let bars = vec![
            bar(10.0, 10.5, 9.5, 10.2),
            bar(10.2, 10.6, 9.2, 9.5),
            bar(9.5, 9.8, 9.0, 9.2), // pivot low (9.0)
            bar(9.2, 10.0, 9.1, 9.9), // bullish: the anchor
            bar(9.9, 10.1, 9.4, 9.5),
            bar(9.5, 9.7, 9.2, 9.3),
            bar(9.3, 9.4, 8.8, 8.9), // breaks below 9.0
        ];
        let (bullish, bearish) = detect_order_blocks(&bars, &[], &[2]);
        assert!(bullish.is_empty());
        assert_eq!(bearish, vec![zone(9.1, 10.0, 3, 6)]);
    }

    #[test]
    fn breakout_without_anchor_registers_nothing() {
        // A dip drawn entirely with bullish bodies (gap-down opens) offers
        // no bearish anchor candle for the eventual upside breakout.
        let mut bars = Vec::new();
        for i in 0..40 {
            let high = match i {
                0..=5 => 14.0 + i as f64,        // rise to pivot high 19.0 at i=5
                6..=20 => 18.0 - (i - 6) as f64 * 0.2,
                _ => 15.5 + (i - 21) as f64 * 0.3, // crosses 19.0 near the end
            };
            let close = high - 0.3;
            bars.push(bar(close - 0.1, high, close - 0.5, close)); // always bullish
        }
        let (ph, _) = {
            let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
            crate::analytics::find_pivots(&highs, 3, 3)
        };
        assert!(ph.contains(&5));
        let (bullish, _) = detect_order_blocks(&bars, &ph, &[]);
        assert!(bullish.is_empty());
    }

    #[test]
    fn proximity_matches_recent_midpoints_only() {
        let zones = vec![zone(99.0, 101.0, 1, 5)];
        assert!(near_zone(100.5, &zones, 0.01));
        assert!(!near_zone(103.0, &zones, 0.01));

        // Push the matching zone outside the 10-zone window.
        let mut crowded = vec![zone(99.0, 101.0, 1, 5)];
        for k in 0..ZONE_WINDOW {
            crowded.push(zone(499.0, 501.0, 10 + k, 20 + k));
        }
        assert!(!near_zone(100.0, &crowded, 0.01));
        assert!(near_zone(500.0, &crowded, 0.01));
    }

    #[test]
    fn proximity_skips_non_positive_midpoints() {
        let zones = vec![zone(-5.0, 3.0, 1, 5)]; // midpoint -1.0
        assert!(!near_zone(-1.0, &zones, 0.5));
    }

    #[test]
    fn breakout_confirmation_directions() {
        let bullish = vec![zone(100.0, 105.0, 1, 5)];
        assert!(confirm_breakout(106.05, &bullish, 0.01, Signal::Bullish).is_some());
        assert!(confirm_breakout(106.0, &bullish, 0.01, Signal::Bullish).is_none());

        let bearish = vec![zone(100.0, 105.0, 1, 5)];
        assert!(confirm_breakout(99.0, &bearish, 0.01, Signal::Bearish).is_some());
        assert!(confirm_breakout(99.5, &bearish, 0.01, Signal::Bearish).is_none());

        assert!(confirm_breakout(200.0, &bullish, 0.01, Signal::None).is_none());
    }

    #[test]
    fn confirmation_returns_most_recent_match_first() {
        let zones = vec![zone(90.0, 95.0, 1, 4), zone(100.0, 105.0, 6, 9)];
        let hit = confirm_breakout(120.0, &zones, 0.0, Signal::Bullish).unwrap();
        assert_eq!(hit.breakout_bar, 9);
    }
}
