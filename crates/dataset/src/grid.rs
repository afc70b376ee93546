//! The one-second grid walk: as-of alignment, forward labeling, and
//! gap carry-forward for one session half.
//!
//! The walk visits every grid second of the half exactly once, in
//! increasing order, and appends exactly one row per second. All
//! lookups ride on monotonically advancing cursors (as-of, forward
//! horizon, and a monotonic-deque window minimum), so a whole half is
//! O(snapshots + seconds) instead of a scan per second.
//!
//! Two behaviors are preserved from the upstream pipeline rather than
//! "fixed":
//!
//! - The as-of rule is asymmetric: at the half's anchor second the
//!   lookup is closed (`offset <= i`), at every other second it is the
//!   half-open `[i, i+1)`.
//! - Rise-ratio series are read at `asof - anchor_index`, i.e. relative
//!   to the half's anchor snapshot, while depth series are read at the
//!   absolute snapshot index.

use std::collections::VecDeque;

use lob_core::types::{SessionHalf, SnapshotSeries, SESSION_CLOSE_SECOND};

use crate::error::{DatasetError, Result};
use crate::features::{CausalFeatureBank, DepthImbalanceBank};

/// Dense per-second output of one session half.
///
/// Row-major storage, one row per grid second: column 0 is the label,
/// then one column per rise-ratio series, then `(ratio, diff)` per
/// depth feature.
#[derive(Debug, Clone)]
pub struct HalfMatrix {
    half: SessionHalf,
    n_cols: usize,
    data: Vec<f64>,
    start_index: usize,
    end_index: Option<usize>,
}

impl HalfMatrix {
    fn new(half: SessionHalf, n_cols: usize, n_rows: usize, start_index: usize) -> Self {
        Self {
            half,
            n_cols,
            data: Vec::with_capacity(n_cols * n_rows),
            start_index,
            end_index: None,
        }
    }

    /// Session half this matrix belongs to.
    pub fn half(&self) -> SessionHalf {
        self.half
    }

    /// Number of columns (label + features).
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Number of completed rows.
    pub fn n_rows(&self) -> usize {
        self.data.len() / self.n_cols
    }

    /// One grid row, label first.
    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.n_cols..(r + 1) * self.n_cols]
    }

    /// Iterate rows in grid-second order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.n_cols)
    }

    /// As-of snapshot index at the half's first grid second.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// As-of snapshot index at the half's last grid second, if that
    /// second had a fresh snapshot.
    pub fn end_index(&self) -> Option<usize> {
        self.end_index
    }

    /// Duplicate the previous row verbatim, then overwrite the label.
    ///
    /// This is the gap carry-forward: features are copied, the label is
    /// recomputed by the caller.
    fn push_carried(&mut self, label: f64) {
        let prev = self.data.len() - self.n_cols;
        self.data.extend_from_within(prev..);
        let label_cell = self.data.len() - self.n_cols;
        self.data[label_cell] = label;
    }
}

/// Build one session half's dense matrix.
///
/// `causal` must be computed over the ask series restricted to at/after
/// session open; `depth` over the full day. `horizon_secs` is the
/// forward labeling window.
pub fn build_half(
    half: SessionHalf,
    series: &SnapshotSeries,
    causal: &CausalFeatureBank,
    depth: &DepthImbalanceBank,
    horizon_secs: u32,
) -> Result<HalfMatrix> {
    let t = &series.offset_secs;
    let n = series.len();
    let time1 = half.start_second();
    let time2 = half.end_second();

    // Anchor second: closed-interval as-of (`offset <= time1`).
    let anchor_count = t.partition_point(|&x| x <= time1 as f64);
    if anchor_count == 0 {
        return Err(DatasetError::NoAnchorSnapshot {
            half,
            second: time1,
        });
    }
    let anchor_index = anchor_count - 1;

    let ask1 = &series.ask_price[0];
    let bid1 = &series.bid_price[0];
    let final_ask = ask1[n - 1];

    let n_cols = 1 + causal.series.len() + 2 * depth.features.len();
    let mut matrix = HalfMatrix::new(half, n_cols, (time2 - time1) as usize, anchor_index);

    // Monotone cursors over the snapshot array.
    let mut asof = anchor_index;
    let mut next = 0usize; // first index with offset >= i + 1
    let mut fwd_next = 0usize; // first index with offset > i + horizon

    // Monotonic deque holding candidate minima of ask1 over the
    // half-open label window [asof, fwd_last); `offered` counts the
    // indices pushed so far.
    let mut window: VecDeque<usize> = VecDeque::new();
    let mut offered = 0usize;

    // A horizon reaching past the close routes every second through the
    // final-ask fallback.
    let close_cutoff = SESSION_CLOSE_SECOND.saturating_sub(horizon_secs);

    for i in time1..time2 {
        let sec = i as f64;
        while next < n && t[next] < sec + 1.0 {
            next += 1;
        }

        // As-of lookup. The anchor second uses the closed rule; every
        // other second requires a snapshot inside [i, i+1).
        let lookup = if i == time1 {
            Some(anchor_index)
        } else if next > 0 && t[next - 1] >= sec {
            Some(next - 1)
        } else {
            None
        };

        let fresh = lookup.is_some();
        if let Some(ix) = lookup {
            debug_assert!(ix >= asof, "as-of cursor must not move backwards");
            asof = ix;
        }

        // Forward label anchor: last snapshot with offset <= i + horizon.
        while fwd_next < n && t[fwd_next] <= (i + horizon_secs) as f64 {
            fwd_next += 1;
        }

        let label = if i < close_cutoff {
            // fwd_next > 0: the anchor snapshot satisfies
            // offset <= time1 <= i + horizon.
            let fwd_last = fwd_next - 1;
            while offered < fwd_last {
                while window
                    .back()
                    .is_some_and(|&back| ask1[back] >= ask1[offered])
                {
                    window.pop_back();
                }
                window.push_back(offered);
                offered += 1;
            }
            while window.front().is_some_and(|&front| front < asof) {
                window.pop_front();
            }
            // Empty window (no snapshot strictly inside the horizon):
            // the as-of ask itself stands in for the minimum.
            let min_ask = window.front().map_or(ask1[asof], |&j| ask1[j]);
            bid1[asof] > min_ask
        } else {
            // Too close to the session close for a full horizon:
            // compare against the final ask of the day.
            bid1[asof] > final_ask
        };
        let label = f64::from(u8::from(label));

        if fresh {
            matrix.data.push(label);
            let rel = asof - anchor_index;
            for s in &causal.series {
                matrix.data.push(s.values[rel]);
            }
            for f in &depth.features {
                matrix.data.push(f.ratio[asof]);
                matrix.data.push(f.diff[asof]);
            }
        } else {
            matrix.push_carried(label);
        }

        if i == time2 - 1 && fresh {
            matrix.end_index = Some(asof);
        }
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lob_core::types::specs::{weight_triples, LookbackSpec};

    /// Series with one snapshot per given offset. Ask/bid level-1
    /// prices are taken from the slices; deeper levels and quantities
    /// are filled with fixed values, except ask level-1 quantity which
    /// encodes the snapshot index (`i + 1`) so tests can recover the
    /// as-of index from the `100/0/0` depth ratio.
    fn series_at(offsets: &[f64], asks: &[f64], bids: &[f64]) -> SnapshotSeries {
        let mut s = SnapshotSeries::with_capacity(offsets.len());
        for (i, &t) in offsets.iter().enumerate() {
            s.push(
                t,
                [bids[i], bids[i] - 1.0, bids[i] - 2.0],
                [1.0, 1.0, 1.0],
                [asks[i], asks[i] + 1.0, asks[i] + 2.0],
                [(i + 1) as f64, 1.0, 1.0],
            );
        }
        s
    }

    fn banks(
        series: &SnapshotSeries,
        window_secs: u32,
    ) -> (CausalFeatureBank, DepthImbalanceBank) {
        let causal = CausalFeatureBank::compute(
            &series.ask_price[0],
            &series.offset_secs,
            &[LookbackSpec { window_secs }],
            true,
        )
        .unwrap();
        let depth = DepthImbalanceBank::compute(series, &weight_triples()[..1]);
        (causal, depth)
    }

    /// As-of snapshot index implied by the `100/0/0` depth ratio column.
    fn implied_index(row: &[f64]) -> usize {
        row[2].round() as usize - 1
    }

    #[test]
    fn test_morning_row_count_and_width() {
        let offsets: Vec<f64> = (0..200).map(|k| -2.0 + k as f64 * 11.0).collect();
        let asks = vec![100.0; 200];
        let bids = vec![99.0; 200];
        let series = series_at(&offsets, &asks, &bids);
        let (causal, depth) = banks(&series, 360);

        let m = build_half(SessionHalf::Morning, &series, &causal, &depth, 600).unwrap();
        assert_eq!(m.n_rows(), 9_000);
        assert_eq!(m.n_cols(), 1 + 1 + 2);
        assert_eq!(m.start_index(), 0);
    }

    #[test]
    fn test_reference_scenario_row_at_second_ten() {
        // Snapshots at 0/5/10 s, asks 100/101/99, bids 99/100/98,
        // lookback 5 s, horizon 5 s.
        let series = series_at(
            &[0.0, 5.0, 10.0],
            &[100.0, 101.0, 99.0],
            &[99.0, 100.0, 98.0],
        );
        let (causal, depth) = banks(&series, 5);

        let m = build_half(SessionHalf::Morning, &series, &causal, &depth, 5).unwrap();
        let row = m.row(10);
        // Rise ratio baselines at the 5 s snapshot: (99-101)/101*100.
        assert_eq!(row[1], -1.98020);
        // Forward window [asof(10), asof(15)) is empty; the degenerate
        // fallback compares bid 98 against the as-of ask 99.
        assert_eq!(row[0], 0.0);
    }

    #[test]
    fn test_label_one_when_future_ask_dips_below_bid() {
        // At second 0 the window [0, 2) covers asks 100 and 98; bid 99
        // beats the 98 minimum.
        let series = series_at(&[0.0, 3.0, 5.0], &[100.0, 98.0, 101.0], &[99.0, 97.5, 100.0]);
        let (causal, depth) = banks(&series, 5);

        let m = build_half(SessionHalf::Morning, &series, &causal, &depth, 5).unwrap();
        assert_eq!(m.row(0)[0], 1.0);
    }

    #[test]
    fn test_forward_window_excludes_forward_index() {
        // Only snapshots 0 and 3 s exist; the 3 s snapshot IS the
        // forward index at second 0 (last offset <= 5), so the ask dip
        // to 98 is outside the half-open window and the label stays 0.
        let series = series_at(&[0.0, 3.0], &[100.0, 98.0], &[99.0, 97.5]);
        let (causal, depth) = banks(&series, 5);

        let m = build_half(SessionHalf::Morning, &series, &causal, &depth, 5).unwrap();
        assert_eq!(m.row(0)[0], 0.0);
    }

    #[test]
    fn test_gap_rows_copy_features_and_recompute_labels() {
        // Data gap: snapshots at 20 s then 26 s, so seconds 21-25 carry
        // second 20's features forward while their labels keep moving
        // with the horizon.
        let offsets = [0.0, 10.0, 20.0, 26.0, 30.0];
        let asks = [100.0, 101.0, 102.0, 99.5, 103.0];
        let bids = [99.0, 100.0, 101.0, 98.5, 102.0];
        let series = series_at(&offsets, &asks, &bids);
        let (causal, depth) = banks(&series, 5);

        let m = build_half(SessionHalf::Morning, &series, &causal, &depth, 5).unwrap();
        let base = m.row(20).to_vec();
        for sec in 21..26 {
            let row = m.row(sec);
            assert_eq!(&row[1..], &base[1..], "features at second {sec}");
        }
        // Gap labels stay anchored at the second-20 snapshot (index 2,
        // bid 101) but the forward bound keeps advancing.
        // Second 21: forward index = last offset <= 26 -> index 3,
        // window [2, 3) = {102} -> 101 > 102 is false.
        assert_eq!(m.row(21)[0], 0.0);
        // Second 25: forward index = last offset <= 30 -> index 4,
        // window [2, 4) now includes the 99.5 dip -> 101 > 99.5.
        assert_eq!(m.row(25)[0], 1.0);
    }

    #[test]
    fn test_as_of_cursor_is_non_decreasing() {
        let offsets: Vec<f64> = (0..300).map(|k| -1.0 + (k * k % 8831) as f64).collect();
        // Not monotone as written; sort to honor the input contract.
        let mut offsets = offsets;
        offsets.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let asks = vec![100.0; 300];
        let bids = vec![99.0; 300];
        let series = series_at(&offsets, &asks, &bids);
        let (causal, depth) = banks(&series, 360);

        let m = build_half(SessionHalf::Morning, &series, &causal, &depth, 600).unwrap();
        let mut last = 0usize;
        for row in m.rows() {
            let ix = implied_index(row);
            assert!(ix >= last, "as-of went backwards: {ix} < {last}");
            last = ix;
        }
    }

    #[test]
    fn test_close_fallback_compares_final_ask() {
        // Afternoon half with a 600 s horizon: seconds >= 24600 compare
        // the as-of bid against the day's final ask.
        let offsets = [0.0, 14_400.0, 24_599.0, 24_650.0, 25_100.0];
        let asks = [100.0, 100.0, 100.0, 100.0, 99.0];
        let bids = [99.0, 99.0, 99.5, 99.5, 98.0];
        let series = series_at(&offsets, &asks, &bids);
        let (causal, depth) = banks(&series, 360);

        let m = build_half(SessionHalf::Afternoon, &series, &causal, &depth, 600).unwrap();
        assert_eq!(m.n_rows(), 10_800);
        // Second 24650 (row 10250): bid 99.5 > final ask 99 -> 1.
        assert_eq!(m.row(10_250)[0], 1.0);
        // Second 24599 (row 10199) still uses the forward-window rule:
        // window [2, 4) holds asks {100, 100}; bid 99.5 is below.
        assert_eq!(m.row(10_199)[0], 0.0);
    }

    #[test]
    fn test_horizon_past_close_uses_fallback_everywhere() {
        // A horizon longer than the whole session leaves no second with
        // a full forward window; every row must take the final-ask
        // fallback instead of underflowing the cutoff.
        let series = series_at(&[0.0, 100.0], &[100.0, 99.0], &[99.5, 98.0]);
        let (causal, depth) = banks(&series, 360);

        let m = build_half(SessionHalf::Morning, &series, &causal, &depth, 30_000).unwrap();
        assert_eq!(m.n_rows(), 9_000);
        // Second 0: as-of bid 99.5 against the final ask 99.
        assert_eq!(m.row(0)[0], 1.0);
        // Second 200: as-of bid 98 against the final ask 99.
        assert_eq!(m.row(200)[0], 0.0);
    }

    #[test]
    fn test_afternoon_anchor_uses_closed_rule() {
        // No snapshot inside [14400, 14401), but one at 14000 s: the
        // anchor second still resolves via the closed <= rule.
        let offsets = [0.0, 14_000.0, 15_000.0];
        let asks = [100.0, 101.0, 102.0];
        let bids = [99.0, 100.0, 101.0];
        let series = series_at(&offsets, &asks, &bids);
        let (causal, depth) = banks(&series, 360);

        let m = build_half(SessionHalf::Afternoon, &series, &causal, &depth, 600).unwrap();
        assert_eq!(m.start_index(), 1);
        assert_eq!(implied_index(m.row(0)), 1);
        // Second 14401 has no snapshot: carried from the anchor row.
        assert_eq!(implied_index(m.row(1)), 1);
    }

    #[test]
    fn test_no_anchor_snapshot_is_error() {
        let series = series_at(&[3.0, 7.0], &[100.0, 101.0], &[99.0, 100.0]);
        let (causal, depth) = banks(&series, 360);

        let err =
            build_half(SessionHalf::Morning, &series, &causal, &depth, 600).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::NoAnchorSnapshot {
                half: SessionHalf::Morning,
                second: 0
            }
        ));
    }

    #[test]
    fn test_end_index_recorded_when_last_second_has_data() {
        let offsets = [0.0, 8_999.0];
        let series = series_at(&offsets, &[100.0, 101.0], &[99.0, 100.0]);
        let (causal, depth) = banks(&series, 360);

        let m = build_half(SessionHalf::Morning, &series, &causal, &depth, 600).unwrap();
        assert_eq!(m.end_index(), Some(1));
    }
}
