//! Raw tick-file decoding into a [`SnapshotSeries`].
//!
//! One logical event spans four consecutive CSV rows: row offset 0
//! carries the event timestamp (in the `Bid_Quantity` column), row
//! offsets 1–3 carry the level-1/2/3 bid and ask price/quantity. Raw
//! prices are scaled by 100 in the feed and divided back out here.
//! A trailing partial group (row count not divisible by four) is
//! dropped without complaint, matching the feed's historical consumers.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use lob_core::types::SnapshotSeries;

use crate::anchor;
use crate::error::{DatasetError, Result};

/// Divisor applied to raw feed prices.
const PRICE_SCALE: f64 = 100.0;

/// One raw CSV row of the tick file.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Bid")]
    bid: String,
    #[serde(rename = "Bid_Quantity")]
    bid_quantity: String,
    #[serde(rename = "Ask")]
    ask: String,
    #[serde(rename = "Ask_Quantity")]
    ask_quantity: String,
}

/// Input file name for one trading day, e.g. `order_book_3_2014_1_2.csv`.
///
/// Month and day are not zero-padded; that is the upstream convention.
pub fn day_file_name(year: u32, month: u32, day: u32) -> String {
    format!("order_book_3_{year}_{month}_{day}.csv")
}

/// Read a day file from disk into a [`SnapshotSeries`].
///
/// A nonexistent file maps to [`DatasetError::MissingFile`] so the
/// batch runner can skip the day and keep going.
pub fn read_order_book(path: &Path) -> Result<SnapshotSeries> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DatasetError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            DatasetError::Io(e)
        }
    })?;
    read_order_book_from(file)
}

/// Decode the tick stream from any reader.
pub fn read_order_book_from<R: Read>(reader: R) -> Result<SnapshotSeries> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut rows: Vec<RawRow> = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }

    let events = rows.len() / 4;
    let mut series = SnapshotSeries::with_capacity(events);

    for (event, group) in rows.chunks_exact(4).enumerate() {
        let offset = anchor::session_offset(&group[0].bid_quantity, event)?;

        let mut bid_price = [0.0; 3];
        let mut bid_qty = [0.0; 3];
        let mut ask_price = [0.0; 3];
        let mut ask_qty = [0.0; 3];
        for level in 0..3 {
            let row = &group[level + 1];
            let record = event * 4 + level + 1;
            bid_price[level] = parse_price(&row.bid, record)? / PRICE_SCALE;
            ask_price[level] = parse_price(&row.ask, record)? / PRICE_SCALE;
            bid_qty[level] = parse_quantity(&row.bid_quantity);
            ask_qty[level] = parse_quantity(&row.ask_quantity);
        }

        series.push(offset, bid_price, bid_qty, ask_price, ask_qty);
    }

    Ok(series)
}

/// Parse a price field. Unparseable values are a hard error.
fn parse_price(value: &str, record: usize) -> Result<f64> {
    value.trim().parse().map_err(|_| DatasetError::BadPrice {
        record,
        value: value.to_string(),
    })
}

/// Parse a quantity field. Missing quantities are treated as zero:
/// empty cells, `NaN`, and unparseable values all map to `0.0`.
fn parse_quantity(value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(q) if q.is_finite() => q,
        _ => 0.0,
    }
}
