//! Day-level assembly: parse, compute both feature banks, and build the
//! two session-half matrices.

use std::path::Path;

use tracing::{debug, info};

use lob_core::types::specs::{lookback_windows, weight_triples, TOTAL_COLUMNS};
use lob_core::types::{SessionHalf, SnapshotSeries};

use crate::error::{DatasetError, Result};
use crate::features::{CausalFeatureBank, DepthImbalanceBank};
use crate::grid::{build_half, HalfMatrix};
use crate::parser;

/// Knobs for one day's build, lifted from the feature configuration.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Forward labeling window in seconds.
    pub horizon_secs: u32,
    /// Replace zero ask prices with the day mean (see the causal bank).
    pub substitute_zero_prices: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            horizon_secs: 600,
            substitute_zero_prices: true,
        }
    }
}

/// Both finished matrices of one trading day.
#[derive(Debug, Clone)]
pub struct DayDataset {
    /// Morning (`UP`) matrix, 9000 rows.
    pub morning: HalfMatrix,
    /// Afternoon (`DOWN`) matrix, 10800 rows.
    pub afternoon: HalfMatrix,
    /// Number of snapshots the day file decoded to.
    pub snapshot_count: usize,
}

/// Build one day's dataset from a raw tick file.
pub fn build_day(path: &Path, opts: &BuildOptions) -> Result<DayDataset> {
    let series = parser::read_order_book(path)?;
    info!(
        path = %path.display(),
        snapshots = series.len(),
        "decoded day file"
    );
    build_day_from_series(&series, opts)
}

/// Build one day's dataset from an already-decoded snapshot series.
pub fn build_day_from_series(
    series: &SnapshotSeries,
    opts: &BuildOptions,
) -> Result<DayDataset> {
    // The causal bank runs over the portion of the ask series at/after
    // session open: from the last snapshot with offset <= 0.
    let open_count = series.offset_secs.partition_point(|&t| t <= 0.0);
    if open_count == 0 {
        return Err(DatasetError::NoAnchorSnapshot {
            half: SessionHalf::Morning,
            second: 0,
        });
    }
    let open_index = open_count - 1;

    let windows = lookback_windows();
    let triples = weight_triples();

    // The two banks are independent single passes; compute them
    // side by side.
    let (causal, depth) = rayon::join(
        || {
            CausalFeatureBank::compute(
                &series.ask_price[0][open_index..],
                &series.offset_secs[open_index..],
                &windows,
                opts.substitute_zero_prices,
            )
        },
        || DepthImbalanceBank::compute(series, &triples),
    );
    let causal = causal?;

    let morning = build_half(
        SessionHalf::Morning,
        series,
        &causal,
        &depth,
        opts.horizon_secs,
    )?;
    let afternoon = build_half(
        SessionHalf::Afternoon,
        series,
        &causal,
        &depth,
        opts.horizon_secs,
    )?;

    for half in [&morning, &afternoon] {
        check_shape(half)?;
        debug!(
            half = %half.half(),
            rows = half.n_rows(),
            start_index = half.start_index(),
            end_index = ?half.end_index(),
            "assembled half matrix"
        );
    }

    Ok(DayDataset {
        morning,
        afternoon,
        snapshot_count: series.len(),
    })
}

/// Verify a finished half against its fixed shape (9000/10800 × 65).
fn check_shape(matrix: &HalfMatrix) -> Result<()> {
    let expected = matrix.half().expected_rows();
    if matrix.n_rows() != expected || matrix.n_cols() != TOTAL_COLUMNS {
        return Err(DatasetError::RowCountMismatch {
            half: matrix.half(),
            expected,
            actual: matrix.n_rows(),
        });
    }
    Ok(())
}
