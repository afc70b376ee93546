//! Error type for the dataset build pipeline.

use std::path::PathBuf;

use lob_core::types::SessionHalf;

/// Errors that can occur while building a day's matrices.
///
/// Any error aborts the whole day: no partial matrix is ever written.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The day's input file does not exist. The batch runner skips the
    /// day and continues with the rest.
    #[error("input file not found: {path}")]
    MissingFile { path: PathBuf },

    /// A timestamp string did not match the fixed `..DHH:MM:SS..` layout.
    #[error("malformed timestamp in event {event}: {value:?}")]
    MalformedTimestamp { event: usize, value: String },

    /// A price field could not be parsed as a number.
    #[error("unparseable price {value:?} in record {record}")]
    BadPrice { record: usize, value: String },

    /// A rise-ratio baseline price was zero with substitution disabled.
    #[error("undefined rise ratio: zero baseline price at snapshot {index}")]
    UndefinedRiseRatio { index: usize },

    /// No snapshot exists at or before a session half's anchor second.
    #[error("no snapshot at or before second {second} ({half} anchor)")]
    NoAnchorSnapshot { half: SessionHalf, second: u32 },

    /// A finished half matrix did not have its expected row count.
    #[error("{half} matrix has {actual} rows, expected {expected}")]
    RowCountMismatch {
        half: SessionHalf,
        expected: usize,
        actual: usize,
    },

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV read/write failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DatasetError>;
