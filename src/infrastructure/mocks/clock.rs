//! Mock clock for testing.

use crate::application::ports::Clock;
use crate::domain::hour::Hour;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct MockTime {
    instant: Instant,
    hour: Hour,
}

/// Mock clock for testing.
///
/// Tests control both readings explicitly: the monotonic instant used by
/// rate windows and the local hour used by the working-hours gate. They move
/// independently, so a test can park the hour inside the closed window while
/// advancing the instant past a rate period.
///
/// # Examples
///
/// ```
/// use working_hours_throttle::infrastructure::mocks::MockClock;
/// use working_hours_throttle::application::ports::Clock;
/// use working_hours_throttle::Hour;
/// use std::time::{Duration, Instant};
///
/// let start = Instant::now();
/// let clock = MockClock::new(start, Hour::new(9).unwrap());
///
/// assert_eq!(clock.now(), start);
/// assert_eq!(clock.local_hour().get(), 9);
///
/// clock.advance(Duration::from_secs(10));
/// assert_eq!(clock.now(), start + Duration::from_secs(10));
///
/// clock.set_hour(Hour::new(4).unwrap());
/// assert_eq!(clock.local_hour().get(), 4);
/// ```
///
/// # Thread Safety
///
/// `MockClock` is thread-safe and can be cloned to share across threads.
/// All clones share the same underlying time value.
#[derive(Debug, Clone)]
pub struct MockClock {
    current: Arc<Mutex<MockTime>>,
}

impl MockClock {
    /// Create a mock clock at a specific instant and local hour.
    pub fn new(start: Instant, hour: Hour) -> Self {
        Self {
            current: Arc::new(Mutex::new(MockTime {
                instant: start,
                hour,
            })),
        }
    }

    /// Create a mock clock at the current instant and a given local hour.
    pub fn at_hour(hour: Hour) -> Self {
        Self::new(Instant::now(), hour)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockTime> {
        self.current
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
    }

    /// Advance the instant by a duration. The hour is left alone.
    pub fn advance(&self, duration: Duration) {
        self.lock().instant += duration;
    }

    /// Set the instant.
    pub fn set(&self, instant: Instant) {
        self.lock().instant = instant;
    }

    /// Set the local hour.
    pub fn set_hour(&self, hour: Hour) {
        self.lock().hour = hour;
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.lock().instant
    }

    fn local_hour(&self) -> Hour {
        self.lock().hour
    }
}
