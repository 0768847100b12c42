//! Hour-of-day values.
//!
//! Throttling decisions that depend on the wall clock only ever look at the
//! local hour. `Hour` carries that value with its range already checked, so
//! nothing downstream has to re-validate it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors produced when constructing hour-based values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourError {
    /// Hour value outside `0..=23`
    OutOfRange(u32),
    /// Window start is after its end (windows do not wrap midnight)
    InvertedWindow {
        /// First hour of the window
        start: u8,
        /// Last hour of the window
        end: u8,
    },
}

impl fmt::Display for HourError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HourError::OutOfRange(value) => {
                write!(f, "hour must be between 0 and 23, got {}", value)
            }
            HourError::InvertedWindow { start, end } => {
                write!(
                    f,
                    "window start ({}) must not be after window end ({})",
                    start, end
                )
            }
        }
    }
}

impl std::error::Error for HourError {}

/// A local hour of day in `0..=23`.
///
/// # Example
/// ```
/// use working_hours_throttle::Hour;
///
/// let hour = Hour::new(4).unwrap();
/// assert_eq!(hour.get(), 4);
/// assert!(Hour::new(24).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hour(pub(crate) u8);

impl Hour {
    /// Midnight.
    pub const MIDNIGHT: Hour = Hour(0);

    /// The last hour of the day.
    pub const LAST: Hour = Hour(23);

    /// Create an hour, rejecting values outside `0..=23`.
    pub fn new(value: u8) -> Result<Self, HourError> {
        if value <= 23 {
            Ok(Hour(value))
        } else {
            Err(HourError::OutOfRange(value.into()))
        }
    }

    /// The raw hour value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Iterate over every hour of the day, from midnight.
    pub fn all() -> impl Iterator<Item = Hour> {
        (0..=23).map(Hour)
    }
}

impl TryFrom<u8> for Hour {
    type Error = HourError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Hour::new(value)
    }
}

impl TryFrom<u32> for Hour {
    type Error = HourError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        let narrowed = u8::try_from(value).map_err(|_| HourError::OutOfRange(value))?;
        Hour::new(narrowed)
    }
}

impl From<Hour> for u8 {
    fn from(hour: Hour) -> Self {
        hour.0
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}
