//! Error types for itinerary mutation and polyline decoding.

use thiserror::Error;

/// Rejected itinerary mutation. The current trip is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItineraryError {
    #[error("day index {index} out of range (trip has {len} days)")]
    DayOutOfRange { index: usize, len: usize },

    #[error("activity index {index} out of range (day index {day_index} has {len} activities)")]
    ActivityOutOfRange {
        day_index: usize,
        index: usize,
        len: usize,
    },

    #[error("day numbers must run 1..N without gaps: expected day {expected}, found {found}")]
    NonContiguousDays { expected: u32, found: u32 },

    #[error("invalid move direction {0} (expected -1 or +1)")]
    InvalidDirection(i32),
}

/// Malformed polyline input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("invalid polyline character {byte:#04x} at offset {offset}")]
    InvalidCharacter { byte: u8, offset: usize },

    #[error("polyline truncated inside a value starting at offset {offset}")]
    Truncated { offset: usize },

    #[error("polyline ends with a latitude but no longitude")]
    DanglingLatitude,

    #[error("polyline value at offset {offset} overflows")]
    Overflow { offset: usize },
}
