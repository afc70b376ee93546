//! Core types for the LOB dataset builder.
//!
//! The snapshot series is laid out as parallel arrays so the feature
//! banks and the grid walk can run as tight forward passes over plain
//! `f64` slices.

pub mod session;
pub mod snapshot;
pub mod specs;

// Re-export primary types for convenient access via `lob_core::types::*`.
pub use session::{SessionHalf, SESSION_CLOSE_SECOND, SESSION_OPEN_SECS};
pub use snapshot::SnapshotSeries;
pub use specs::{
    lookback_windows, weight_triples, LookbackSpec, WeightTriple, DEPTH_FEATURE_COLUMNS,
    RISE_FEATURE_COLUMNS, TOTAL_COLUMNS,
};
