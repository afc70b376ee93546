//! Structure-of-arrays view of one trading day's order-book snapshots.

/// Number of book depth levels carried per side.
pub const DEPTH_LEVELS: usize = 3;

/// All snapshots of one trading day, as parallel arrays.
///
/// `offset_secs[i]` is snapshot `i`'s timestamp relative to the 09:00:00
/// session open. Offsets are assumed non-decreasing; the parser does not
/// validate this. Prices are in currency units (the raw feed carries
/// them scaled by 100); missing quantities are stored as zero.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSeries {
    /// Seconds relative to session open, one entry per snapshot.
    pub offset_secs: Vec<f64>,
    /// Bid prices, one vector per depth level (level 1 first).
    pub bid_price: [Vec<f64>; DEPTH_LEVELS],
    /// Bid quantities, one vector per depth level.
    pub bid_qty: [Vec<f64>; DEPTH_LEVELS],
    /// Ask prices, one vector per depth level (level 1 first).
    pub ask_price: [Vec<f64>; DEPTH_LEVELS],
    /// Ask quantities, one vector per depth level.
    pub ask_qty: [Vec<f64>; DEPTH_LEVELS],
}

impl SnapshotSeries {
    /// Create an empty series with capacity for `n` snapshots.
    pub fn with_capacity(n: usize) -> Self {
        let vecs = || {
            [
                Vec::with_capacity(n),
                Vec::with_capacity(n),
                Vec::with_capacity(n),
            ]
        };
        Self {
            offset_secs: Vec::with_capacity(n),
            bid_price: vecs(),
            bid_qty: vecs(),
            ask_price: vecs(),
            ask_qty: vecs(),
        }
    }

    /// Number of snapshots in the series.
    pub fn len(&self) -> usize {
        self.offset_secs.len()
    }

    /// Whether the series holds no snapshots.
    pub fn is_empty(&self) -> bool {
        self.offset_secs.is_empty()
    }

    /// Append one snapshot. Level arrays are ordered level 1 first.
    #[allow(clippy::too_many_arguments)]
    pub fn push(
        &mut self,
        offset_secs: f64,
        bid_price: [f64; DEPTH_LEVELS],
        bid_qty: [f64; DEPTH_LEVELS],
        ask_price: [f64; DEPTH_LEVELS],
        ask_qty: [f64; DEPTH_LEVELS],
    ) {
        self.offset_secs.push(offset_secs);
        for level in 0..DEPTH_LEVELS {
            self.bid_price[level].push(bid_price[level]);
            self.bid_qty[level].push(bid_qty[level]);
            self.ask_price[level].push(ask_price[level]);
            self.ask_qty[level].push(ask_qty[level]);
        }
    }

    /// Best (level-1) bid price at snapshot `i`.
    #[inline]
    pub fn best_bid(&self, i: usize) -> f64 {
        self.bid_price[0][i]
    }

    /// Best (level-1) ask price at snapshot `i`.
    #[inline]
    pub fn best_ask(&self, i: usize) -> f64 {
        self.ask_price[0][i]
    }
}
