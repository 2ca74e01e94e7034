//! Signal combiner - merges divergence and order-block evidence.
//!
//! Validation follows a 4-mode truth table keyed by the two feature
//! toggles:
//!
//! | divergence | order block | validated iff                                  |
//! |------------|-------------|------------------------------------------------|
//! | on         | on          | signal matches the near-zone direction          |
//! | on         | off         | any active divergence exists (signal != None)   |
//! | off        | on          | near any zone; signal forced from zone side     |
//! | off        | off         | invalid configuration, rejected before scanning |

use crate::config::ScanConfig;
use crate::types::Signal;

/// Outcome of the truth table for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinedSignal {
    pub signal: Signal,
    pub validated: bool,
}

/// Apply the feature-toggle policy to one task's evidence.
///
/// Returns `None` when the task produces no qualifying row under the
/// active mode (dropped from the result set, not an error). The off/off
/// combination never reaches here — configuration validation rejects it
/// before any task executes — but it also yields `None` defensively.
pub fn combine(
    config: &ScanConfig,
    signal: Signal,
    near_bullish: bool,
    near_bearish: bool,
) -> Option<CombinedSignal> {
    match (config.divergence_enabled, config.order_block_enabled) {
        (true, true) => {
            let validated = (signal == Signal::Bullish && near_bullish)
                || (signal == Signal::Bearish && near_bearish);
            Some(CombinedSignal { signal, validated })
        }
        (true, false) => {
            if signal == Signal::None {
                return None;
            }
            Some(CombinedSignal {
                signal,
                validated: true,
            })
        }
        (false, true) => {
            if !near_bullish && !near_bearish {
                return None;
            }
            // Near both defaults to Bullish.
            let signal = if near_bullish {
                Signal::Bullish
            } else {
                Signal::Bearish
            };
            Some(CombinedSignal {
                signal,
                validated: true,
            })
        }
        (false, false) => None,
    }
}
