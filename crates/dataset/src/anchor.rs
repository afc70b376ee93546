//! Session-relative time anchoring.
//!
//! The raw feed stamps each event with a string of fixed character
//! layout, e.g. `2014-01-02D09:13:27.482119`: the hour, minute, and
//! second digits always sit at character positions 11/12, 14/15, and
//! 17/18. The anchor reads exactly those six digits (fractional seconds
//! are ignored) and converts to seconds relative to the 09:00:00
//! session open.
//!
//! Unlike the feed's original consumers, the parse is validated: a
//! non-digit at any of the six positions is rejected instead of
//! silently corrupting every downstream offset.

use lob_core::types::SESSION_OPEN_SECS;

use crate::error::{DatasetError, Result};

/// Character positions of the six time digits within the timestamp.
const DIGIT_POSITIONS: [usize; 6] = [11, 12, 14, 15, 17, 18];

/// Place value of each digit, in [`DIGIT_POSITIONS`] order:
/// hour-tens, hour-units, minute-tens, minute-units, second-tens,
/// second-units.
const DIGIT_WEIGHTS: [f64; 6] = [36_000.0, 3_600.0, 600.0, 60.0, 10.0, 1.0];

/// Parse a fixed-layout timestamp into absolute seconds-of-day.
///
/// `event` is the logical event index, carried into the error for
/// diagnostics.
pub fn seconds_of_day(timestamp: &str, event: usize) -> Result<f64> {
    let bytes = timestamp.as_bytes();
    let mut total = 0.0;
    for (pos, weight) in DIGIT_POSITIONS.iter().zip(DIGIT_WEIGHTS) {
        let digit = bytes
            .get(*pos)
            .filter(|b| b.is_ascii_digit())
            .map(|b| (b - b'0') as f64)
            .ok_or_else(|| DatasetError::MalformedTimestamp {
                event,
                value: timestamp.to_string(),
            })?;
        total += digit * weight;
    }
    Ok(total)
}

/// Parse a timestamp into seconds relative to the 09:00:00 session open.
pub fn session_offset(timestamp: &str, event: usize) -> Result<f64> {
    Ok(seconds_of_day(timestamp, event)? - SESSION_OPEN_SECS)
}
