//! Analytics engine - pattern detection over OHLC bar sequences
//!
//! Leaf-first components:
//! - RSI (Wilder's smoothing)
//! - Generic pivot detection (price and oscillator series)
//! - Divergence classification (regular/hidden, bullish/bearish)
//! - Order-block detection with proximity/breakout validation
//! - Signal combination under the feature-toggle policy
//!
//! Every function here is pure: bars in, evidence out. No shared state.

pub mod combiner;
pub mod divergence;
pub mod order_blocks;
pub mod pivots;
pub mod rsi;

pub use combiner::{combine, CombinedSignal};
pub use divergence::{detect_divergences, select_active, DivergenceType, Divergences};
pub use order_blocks::{confirm_breakout, detect_order_blocks, near_zone, OrderBlock};
pub use pivots::find_pivots;
pub use rsi::{rsi, NEUTRAL_RSI};
