//! Conversion of irregular limit-order-book snapshot streams into
//! fixed one-second supervised-learning matrices.
//!
//! One raw day file (four CSV rows per snapshot, three depth levels per
//! side) becomes two dense matrices, one per session half: a label
//! column, thirty backward-looking rise-ratio features, and seventeen
//! weighted depth-imbalance pairs, one row per grid second.
//!
//! The pipeline is [`parser`] (decode and group the raw rows),
//! [`features`] (snapshot-indexed feature banks), [`grid`] (the
//! per-second as-of walk and forward labeling), [`assemble`] (one day
//! end to end), and [`writer`] (atomic CSV output).

pub mod anchor;
pub mod assemble;
pub mod error;
pub mod features;
pub mod grid;
pub mod parser;
pub mod writer;

pub use assemble::{build_day, BuildOptions, DayDataset};
pub use error::{DatasetError, Result};
pub use grid::HalfMatrix;
pub use writer::DatasetWriter;
