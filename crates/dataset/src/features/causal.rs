//! Backward-looking price-momentum features.
//!
//! For each lookback window `w`, the rise ratio at snapshot `i` is the
//! percent change of the best ask against a baseline snapshot roughly
//! `w` seconds earlier: the first snapshot whose offset is
//! `>= offset[i] - w`. Until any snapshot is at least `w` seconds past
//! session open, the baseline is the session-open price (index 0).
//!
//! Input is the ask series restricted to at/after session open, so the
//! series indices here line up with offsets into the session from the
//! morning anchor snapshot.

use lob_core::types::specs::LookbackSpec;

use crate::error::{DatasetError, Result};

/// One lookback window's full snapshot-indexed rise-ratio series.
#[derive(Debug, Clone)]
pub struct RiseRatioSeries {
    /// Window length in seconds.
    pub window_secs: u32,
    /// Rise ratio per snapshot, rounded to 5 decimal places.
    pub values: Vec<f64>,
}

/// The 30 rise-ratio series, in ascending window order.
#[derive(Debug, Clone)]
pub struct CausalFeatureBank {
    /// One series per lookback window.
    pub series: Vec<RiseRatioSeries>,
}

impl CausalFeatureBank {
    /// Compute all rise-ratio series over the session-restricted ask
    /// prices and their offsets (both slices parallel, offsets
    /// non-decreasing).
    ///
    /// When `substitute_zero_prices` is set, every zero price is first
    /// replaced by the arithmetic mean of the whole input series (the
    /// mean is taken over the original values, zeros included). The
    /// mean covers the entire day, so the substituted value leaks
    /// future information into an otherwise causal feature; the
    /// behavior is preserved from the upstream feature catalogue and
    /// can only be disabled, not changed. With substitution disabled, a
    /// zero baseline price is an [`DatasetError::UndefinedRiseRatio`].
    pub fn compute(
        ask1: &[f64],
        offsets: &[f64],
        windows: &[LookbackSpec],
        substitute_zero_prices: bool,
    ) -> Result<Self> {
        debug_assert_eq!(ask1.len(), offsets.len());

        let prices = if substitute_zero_prices {
            substitute_zeros(ask1)
        } else {
            ask1.to_vec()
        };

        let mut series = Vec::with_capacity(windows.len());
        for spec in windows {
            series.push(RiseRatioSeries {
                window_secs: spec.window_secs,
                values: rise_ratios(&prices, offsets, spec.window_secs, substitute_zero_prices)?,
            });
        }
        Ok(Self { series })
    }
}

/// Replace zero entries by the mean of the whole series (zeros included
/// in the mean, matching the upstream definition).
fn substitute_zeros(prices: &[f64]) -> Vec<f64> {
    if prices.is_empty() {
        return Vec::new();
    }
    let mean = prices.iter().sum::<f64>() / prices.len() as f64;
    prices
        .iter()
        .map(|&p| if p == 0.0 { mean } else { p })
        .collect()
}

/// One window's rise-ratio pass with a monotonically advancing baseline
/// cursor: O(n) total instead of a backward scan per snapshot.
fn rise_ratios(
    prices: &[f64],
    offsets: &[f64],
    window_secs: u32,
    substituted: bool,
) -> Result<Vec<f64>> {
    let n = prices.len();
    let mut values = Vec::with_capacity(n);
    if n == 0 {
        return Ok(values);
    }

    let window = window_secs as f64;
    // First snapshot at least `window` seconds past session open; all
    // earlier snapshots fall back to the index-0 baseline.
    let reachable = offsets.partition_point(|&t| t < window);

    let mut baseline = 0usize;
    for i in 0..n {
        if i >= reachable {
            let target = offsets[i] - window;
            while offsets[baseline] < target {
                baseline += 1;
            }
        }
        let base_price = prices[baseline];
        if base_price == 0.0 && !substituted {
            return Err(DatasetError::UndefinedRiseRatio { index: baseline });
        }
        values.push(round5((prices[i] - base_price) / base_price * 100.0));
    }
    Ok(values)
}

/// Round to 5 decimal places.
fn round5(x: f64) -> f64 {
    (x * 1e5).round() / 1e5
}
