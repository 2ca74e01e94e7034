//! Generic pivot detection over any numeric series.
//!
//! A pivot is a causally-confirmed strict local extremum: the value at `i`
//! must beat every other value in `[i−left, i+right]`, so it can only be
//! known `right` bars after the fact. Callers must respect that lag — no
//! consumer of these indices looks ahead of the confirming bar.

/// Find confirmed pivot highs and lows in `series`.
///
/// Returns two strictly-ascending index lists `(highs, lows)`. An index is
/// a pivot high only if its value is strictly greater than every other
/// value in the symmetric window; any tie invalidates it. Pivot lows are
/// symmetric. No index inside the first `left` or last `right` positions is
/// ever reported.
pub fn find_pivots(series: &[f64], left: usize, right: usize) -> (Vec<usize>, Vec<usize>) {
    let n = series.len();
    let mut highs = Vec::new();
    let mut lows = Vec::new();
    if n < left + right + 1 {
        return (highs, lows);
    }

    for i in left..n - right {
        let v = series[i];
        let mut is_high = true;
        let mut is_low = true;
        for j in i - left..=i + right {
            if j == i {
                continue;
            }
            if series[j] >= v {
                is_high = false;
            }
            if series[j] <= v {
                is_low = false;
            }
            if !is_high && !is_low {
                break;
            }
        }
        if is_high {
            highs.push(i);
        }
        if is_low {
            lows.push(i);
        }
    }

    (highs, lows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_strict_extrema() {
        let series = vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0];
        let (highs, lows) = find_pivots(&series, 2, 2);
        assert_eq!(highs, vec![2, 7]);
        assert_eq!(lows, vec![4]);
    }

    #[test]
    fn ties_invalidate_pivots() {
        let series = vec![1.0, 2.0, 3.0, 3.0, 2.0, 1.0];
        let (highs, lows) = find_pivots(&series, 1, 1);
        assert!(highs.is_empty());
        assert!(lows.is_empty());
    }

    #[test]
    fn respects_confirmation_boundaries() {
        // Extremes at the edges cannot be confirmed.
        let series = vec![9.0, 1.0, 2.0, 3.0, 2.0, 1.0, 9.0];
        let (highs, lows) = find_pivots(&series, 2, 2);
        for &i in highs.iter().chain(lows.iter()) {
            assert!(i >= 2 && i < series.len() - 2);
        }
        assert_eq!(highs, vec![3]);
    }

    #[test]
    fn index_lists_are_strictly_ascending() {
        let series: Vec<f64> = (0..80)
            .map(|i| (i as f64 * 0.7).sin() * 10.0 + (i as f64 * 0.13).cos())
            .collect();
        let (highs, lows) = find_pivots(&series, 3, 3);
        assert!(highs.windows(2).all(|w| w[0] < w[1]));
        assert!(lows.windows(2).all(|w| w[0] < w[1]));
        assert!(!highs.is_empty() && !lows.is_empty());
    }

    #[test]
    fn short_series_yields_nothing() {
        let series = vec![1.0, 5.0, 1.0];
        let (highs, lows) = find_pivots(&series, 2, 2);
        assert!(highs.is_empty());
        assert!(lows.is_empty());
    }
}
