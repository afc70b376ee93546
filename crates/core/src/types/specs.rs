//! Fixed feature-configuration tables.
//!
//! The output column layout is derived entirely from these tables:
//! column 0 is the label, columns 1–30 are the rise-ratio features in
//! ascending window order, and columns 31–64 are the depth features as
//! `(ratio, diff)` pairs in [`weight_triples`] order.

/// Number of rise-ratio feature columns.
pub const RISE_FEATURE_COLUMNS: usize = 30;

/// Number of depth feature columns (ratio + diff per weight triple).
pub const DEPTH_FEATURE_COLUMNS: usize = 34;

/// Total output columns: label + rise ratios + depth features.
pub const TOTAL_COLUMNS: usize = 1 + RISE_FEATURE_COLUMNS + DEPTH_FEATURE_COLUMNS;

/// One backward-looking window for the rise-ratio features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackSpec {
    /// Window length in seconds.
    pub window_secs: u32,
}

/// The 30 fixed lookback windows: 360 s through 1230 s in 30 s steps.
pub fn lookback_windows() -> Vec<LookbackSpec> {
    (0..RISE_FEATURE_COLUMNS as u32)
        .map(|k| LookbackSpec {
            window_secs: 360 + 30 * k,
        })
        .collect()
}

/// One `(w1, w2, w3)` weighting of the three book depth levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTriple {
    /// Short tag used in output column names (e.g. `910`).
    pub tag: &'static str,
    /// Level-1 weight.
    pub w1: f64,
    /// Level-2 weight.
    pub w2: f64,
    /// Level-3 weight.
    pub w3: f64,
}

/// The 17 fixed depth weightings, in output column order.
///
/// Most tags read as the three weights divided by ten; the exceptions
/// (`111`, `190`, `127`, `235`) carry the weights verbatim from the
/// original feature catalogue.
pub const fn weight_triples() -> [WeightTriple; 17] {
    const fn t(tag: &'static str, w1: f64, w2: f64, w3: f64) -> WeightTriple {
        WeightTriple { tag, w1, w2, w3 }
    }
    [
        t("100", 100.0, 0.0, 0.0),
        t("010", 0.0, 100.0, 0.0),
        t("001", 0.0, 0.0, 100.0),
        t("910", 90.0, 10.0, 0.0),
        t("820", 80.0, 20.0, 0.0),
        t("730", 70.0, 30.0, 0.0),
        t("640", 60.0, 40.0, 0.0),
        t("550", 50.0, 50.0, 0.0),
        t("721", 70.0, 20.0, 10.0),
        t("532", 50.0, 30.0, 20.0),
        t("111", 1.0, 1.0, 1.0),
        t("190", 10.0, 90.0, 1.0),
        t("280", 20.0, 80.0, 0.0),
        t("370", 30.0, 70.0, 0.0),
        t("460", 40.0, 60.0, 0.0),
        t("127", 10.0, 20.0, 70.0),
        t("235", 20.0, 30.0, 50.0),
    ]
}
