//! RSI (Relative Strength Index) — Wilder smoothing of avg gain/loss.
//!
//! The smoothed averages seed as the simple mean of the first `length`
//! gains/losses, then follow the recurrence `avg = (avg·(L−1) + x) / L`.

/// Neutral value reported before the smoothing window has seeded.
///
/// Downstream pivot/divergence logic indexes freely into the series, so
/// warm-up bars carry this sentinel instead of a hole.
pub const NEUTRAL_RSI: f64 = 50.0;

/// Compute the RSI series for a close-price sequence.
///
/// The output has the same length as `closes`; values before the warm-up
/// window completes are [`NEUTRAL_RSI`]. When the smoothed average loss is
/// zero the value saturates at 100 (divide-by-zero guard).
pub fn rsi(closes: &[f64], length: usize) -> Vec<f64> {
    let n = closes.len();
    let mut out = vec![NEUTRAL_RSI; n];
    if length == 0 || n < length + 1 {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..n {
        let change = closes[i] - closes[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i <= length {
            avg_gain += gain;
            avg_loss += loss;
            if i == length {
                avg_gain /= length as f64;
                avg_loss /= length as f64;
                out[i] = value(avg_gain, avg_loss);
            }
        } else {
            let w = length as f64;
            avg_gain = (avg_gain * (w - 1.0) + gain) / w;
            avg_loss = (avg_loss * (w - 1.0) + loss) / w;
            out[i] = value(avg_gain, avg_loss);
        }
    }

    out
}

fn value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}
