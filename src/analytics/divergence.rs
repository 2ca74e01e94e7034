//! Divergence classification between price and RSI.
//!
//! Pivots are detected on the RSI series; price is read at those *same*
//! bar indices for comparison:
//!
//! - Regular Bullish:  price lower-low  + RSI higher-low   (at RSI pivot lows)
//! - Hidden Bullish:   price higher-low + RSI lower-low    (at RSI pivot lows)
//! - Regular Bearish:  price higher-high + RSI lower-high  (at RSI pivot highs)
//! - Hidden Bearish:   price lower-high + RSI higher-high  (at RSI pivot highs)

use crate::types::{DivergenceKind, Signal};

/// Minimum bar gap between the two pivots of a divergence pair.
pub const MIN_PIVOT_GAP: usize = 5;
/// Maximum bar gap between the two pivots of a divergence pair.
pub const MAX_PIVOT_GAP: usize = 60;

/// The four divergence flavors, in selection tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivergenceType {
    RegularBullish,
    HiddenBullish,
    RegularBearish,
    HiddenBearish,
}

impl DivergenceType {
    pub fn signal(self) -> Signal {
        match self {
            DivergenceType::RegularBullish | DivergenceType::HiddenBullish => Signal::Bullish,
            DivergenceType::RegularBearish | DivergenceType::HiddenBearish => Signal::Bearish,
        }
    }

    pub fn kind(self) -> DivergenceKind {
        match self {
            DivergenceType::RegularBullish | DivergenceType::RegularBearish => {
                DivergenceKind::Regular
            }
            DivergenceType::HiddenBullish | DivergenceType::HiddenBearish => DivergenceKind::Hidden,
        }
    }
}

/// Anchor bar indices per divergence flavor, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct Divergences {
    pub regular_bullish: Vec<usize>,
    pub hidden_bullish: Vec<usize>,
    pub regular_bearish: Vec<usize>,
    pub hidden_bearish: Vec<usize>,
}

/// Classify divergences over consecutive same-kind RSI pivot pairs.
///
/// `highs`/`lows` are the per-bar price extremes; `rsi` is the oscillator
/// series; `rsi_pivot_highs`/`rsi_pivot_lows` are confirmed pivot indices
/// on the RSI series. Pairs whose index gap falls outside
/// `[MIN_PIVOT_GAP, MAX_PIVOT_GAP]` are ignored.
pub fn detect_divergences(
    highs: &[f64],
    lows: &[f64],
    rsi: &[f64],
    rsi_pivot_highs: &[usize],
    rsi_pivot_lows: &[usize],
) -> Divergences {
    let mut out = Divergences::default();

    // Bullish flavors at RSI pivot lows
    for pair in rsi_pivot_lows.windows(2) {
        let (prior, current) = (pair[0], pair[1]);
        let gap = current - prior;
        if !(MIN_PIVOT_GAP..=MAX_PIVOT_GAP).contains(&gap) {
            continue;
        }
        if lows[current] < lows[prior] && rsi[current] > rsi[prior] {
            out.regular_bullish.push(current);
        }
        if lows[current] > lows[prior] && rsi[current] < rsi[prior] {
            out.hidden_bullish.push(current);
        }
    }

    // Bearish flavors at RSI pivot highs
    for pair in rsi_pivot_highs.windows(2) {
        let (prior, current) = (pair[0], pair[1]);
        let gap = current - prior;
        if !(MIN_PIVOT_GAP..=MAX_PIVOT_GAP).contains(&gap) {
            continue;
        }
        if highs[current] > highs[prior] && rsi[current] < rsi[prior] {
            out.regular_bearish.push(current);
        }
        if highs[current] < highs[prior] && rsi[current] > rsi[prior] {
            out.hidden_bearish.push(current);
        }
    }

    out
}

/// Pick the divergence that anchors the scan signal.
///
/// A flavor is active only if its latest anchor falls inside the recency
/// window `index ≥ series_len − pivot_window·5`. Among active flavors the
/// most recent anchor wins; exact ties resolve in the order
/// Bullish-Regular, Bullish-Hidden, Bearish-Regular, Bearish-Hidden.
pub fn select_active(
    divergences: &Divergences,
    series_len: usize,
    pivot_window: usize,
) -> Option<(DivergenceType, usize)> {
    let threshold = series_len.saturating_sub(pivot_window * 5);

    let flavors = [
        (DivergenceType::RegularBullish, &divergences.regular_bullish),
        (DivergenceType::HiddenBullish, &divergences.hidden_bullish),
        (DivergenceType::RegularBearish, &divergences.regular_bearish),
        (DivergenceType::HiddenBearish, &divergences.hidden_bearish),
    ];

    let mut candidates: Vec<(DivergenceType, usize)> = Vec::new();
    for (flavor, anchors) in flavors {
        if let Some(&last) = anchors.last() {
            if last >= threshold {
                candidates.push((flavor, last));
            }
        }
    }

    // Stable sort keeps insertion order among equal indices.
    candidates.sort_by(|a, b| b.1.cmp(&a.1));
    candidates.first().copied()
}
