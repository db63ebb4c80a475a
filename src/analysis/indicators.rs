//! Rolling indicator math over date-ordered series.
//!
//! Every function returns one output per input row; `None` marks positions
//! where the value is undefined (warm-up rows, or a degenerate window).

/// Trailing simple mean over `window` rows, inclusive of the current row.
/// Undefined for the first `window - 1` rows.
pub fn trailing_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    debug_assert!(window > 0);

    let mut out = Vec::with_capacity(values.len());
    let mut rolling_sum = 0.0;

    for (i, value) in values.iter().enumerate() {
        rolling_sum += value;
        if i >= window {
            rolling_sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(rolling_sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Raw stochastic value over a trailing window:
/// `(close - min(low)) / (max(high) - min(low)) * 100`.
///
/// Undefined during warm-up and whenever the window's high-low range is
/// zero (a flat window must not collapse to a silent zero or divide).
pub fn raw_stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    window: usize,
) -> Vec<Option<f64>> {
    debug_assert!(window > 0);
    debug_assert_eq!(high.len(), low.len());
    debug_assert_eq!(high.len(), close.len());

    let mut out = Vec::with_capacity(close.len());

    for i in 0..close.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }

        let start = i + 1 - window;
        let mut highest = high[start];
        let mut lowest = low[start];
        for j in start + 1..=i {
            highest = highest.max(high[j]);
            lowest = lowest.min(low[j]);
        }

        let range = highest - lowest;
        if range > 0.0 {
            out.push(Some((close[i] - lowest) / range * 100.0));
        } else {
            out.push(None);
        }
    }
    out
}

/// Recursive exponential smoothing with a center-of-mass parameter:
/// `alpha = 1 / (com + 1)`, `s_t = alpha * x_t + (1 - alpha) * s_{t-1}`,
/// seeded by the first defined input. At an undefined input after seeding
/// the line holds its last value; before seeding the output is undefined.
pub fn exp_smooth(values: &[Option<f64>], com: f64) -> Vec<Option<f64>> {
    let alpha = 1.0 / (com + 1.0);
    let mut state: Option<f64> = None;

    values
        .iter()
        .map(|value| {
            if let Some(x) = value {
                state = Some(match state {
                    Some(prev) => alpha * x + (1.0 - alpha) * prev,
                    None => *x,
                });
            }
            state
        })
        .collect()
}
