//! Clock adapters for time operations.
//!
//! Provides SystemClock implementation for production use.
//!
//! # Testing
//!
//! See `MockClock` (in `crate::infrastructure::mocks`) for a controllable test clock.
//! Available with the `test-helpers` feature or in test builds:
//!
//! ```toml
//! [dev-dependencies]
//! working-hours-throttle = { version = "*", features = ["test-helpers"] }
//! ```

use crate::application::ports::Clock;
use crate::domain::hour::Hour;
use chrono::Timelike;
use std::time::Instant;

/// System clock: `Instant::now()` for rate windows and `chrono::Local` for
/// the hour of day.
///
/// The hour follows the time zone of the running process. Instances in
/// different zones close at different real-world moments.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_hour(&self) -> Hour {
        // chrono guarantees 0..=23
        Hour(chrono::Local::now().hour() as u8)
    }
}
