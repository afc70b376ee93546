//! Weighted order-book depth-imbalance features.
//!
//! Each [`WeightTriple`] aggregates the three resting-quantity levels
//! per side into `wa = w1*aq1 + w2*aq2 + w3*aq3` (bid analogous) and
//! yields two snapshot-indexed series:
//!
//! - `ratio = wa / wb`
//! - `diff  = (wa - wb) / (wa + wb)`
//!
//! A side with zero weighted depth produces non-finite values; the raw
//! series is emitted as-is, exactly as the labeler and writer consume it.

use lob_core::types::specs::WeightTriple;
use lob_core::types::SnapshotSeries;

/// One weight triple's pair of snapshot-indexed series.
#[derive(Debug, Clone)]
pub struct DepthFeature {
    /// The level weighting that produced this pair.
    pub triple: WeightTriple,
    /// Weighted ask depth over weighted bid depth.
    pub ratio: Vec<f64>,
    /// Normalized weighted depth difference, in [-1, 1] when defined.
    pub diff: Vec<f64>,
}

/// All depth feature pairs, in weight-table order.
#[derive(Debug, Clone)]
pub struct DepthImbalanceBank {
    /// One record per weight triple.
    pub features: Vec<DepthFeature>,
}

impl DepthImbalanceBank {
    /// Compute the ratio/diff pair for every triple over the whole day.
    pub fn compute(series: &SnapshotSeries, triples: &[WeightTriple]) -> Self {
        let n = series.len();
        let features = triples
            .iter()
            .map(|&triple| {
                let mut ratio = Vec::with_capacity(n);
                let mut diff = Vec::with_capacity(n);
                for i in 0..n {
                    let wa = triple.w1 * series.ask_qty[0][i]
                        + triple.w2 * series.ask_qty[1][i]
                        + triple.w3 * series.ask_qty[2][i];
                    let wb = triple.w1 * series.bid_qty[0][i]
                        + triple.w2 * series.bid_qty[1][i]
                        + triple.w3 * series.bid_qty[2][i];
                    ratio.push(wa / wb);
                    diff.push((wa - wb) / (wa + wb));
                }
                DepthFeature { triple, ratio, diff }
            })
            .collect();
        Self { features }
    }
}
