//! Snapshot-indexed feature banks.
//!
//! Both banks are single forward passes over the snapshot series and
//! are independent of the one-second grid; the grid walk reads their
//! output by snapshot index.

pub mod causal;
pub mod depth;

pub use causal::{CausalFeatureBank, RiseRatioSeries};
pub use depth::{DepthFeature, DepthImbalanceBank};
