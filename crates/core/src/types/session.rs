//! Trading-session constants and the two session halves.
//!
//! The trading day runs 09:00–11:30 and 13:00–16:00. All grid seconds
//! are expressed relative to the 09:00:00 session open, so the morning
//! half covers `[0, 9000)` and the afternoon half `[14400, 25200)`.

use std::fmt;

/// Seconds-of-day of the session open (09:00:00).
pub const SESSION_OPEN_SECS: f64 = 32_400.0;

/// Grid second of the session close (16:00:00 relative to open).
pub const SESSION_CLOSE_SECOND: u32 = 25_200;

/// One half of the trading session, each with its own one-second grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionHalf {
    /// 09:00–11:30, grid seconds `[0, 9000)`.
    Morning,
    /// 13:00–16:00, grid seconds `[14400, 25200)`.
    Afternoon,
}

impl SessionHalf {
    /// First grid second of the half. Also its anchor second: the one
    /// second where the as-of lookup uses the closed `<= i` rule.
    pub const fn start_second(self) -> u32 {
        match self {
            SessionHalf::Morning => 0,
            SessionHalf::Afternoon => 14_400,
        }
    }

    /// One past the last grid second of the half.
    pub const fn end_second(self) -> u32 {
        match self {
            SessionHalf::Morning => 9_000,
            SessionHalf::Afternoon => SESSION_CLOSE_SECOND,
        }
    }

    /// Number of grid rows the half must produce.
    pub const fn expected_rows(self) -> usize {
        (self.end_second() - self.start_second()) as usize
    }

    /// Suffix used in the output file name (`_UP` / `_DOWN`).
    pub const fn output_suffix(self) -> &'static str {
        match self {
            SessionHalf::Morning => "UP",
            SessionHalf::Afternoon => "DOWN",
        }
    }
}

impl fmt::Display for SessionHalf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionHalf::Morning => write!(f, "morning"),
            SessionHalf::Afternoon => write!(f, "afternoon"),
        }
    }
}
