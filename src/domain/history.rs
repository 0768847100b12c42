//! Sliding-window request history.
//!
//! One history is kept per throttle key. It remembers when admitted requests
//! arrived and answers whether another request fits in the rate's window.

use crate::domain::policy::ThrottleDecision;
use crate::domain::rate::Rate;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Arrival times of admitted requests, oldest first.
///
/// # Example
/// ```
/// use working_hours_throttle::{Rate, RequestHistory};
/// use std::time::{Duration, Instant};
///
/// let rate = Rate::new(2, Duration::from_secs(60));
/// let mut history = RequestHistory::new();
/// let now = Instant::now();
///
/// assert!(history.record_or_reject(now, rate).is_allow());
/// assert!(history.record_or_reject(now, rate).is_allow());
/// assert!(history.record_or_reject(now, rate).is_reject());
///
/// // Once the window has passed, requests fit again
/// let later = now + Duration::from_secs(60);
/// assert!(history.record_or_reject(later, rate).is_allow());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestHistory {
    timestamps: VecDeque<Instant>,
}

impl RequestHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop arrivals that are at least one period old.
    fn expire(&mut self, now: Instant, period: Duration) {
        while let Some(&oldest) = self.timestamps.front() {
            if now.saturating_duration_since(oldest) >= period {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    /// Admit and record a request arriving at `now`, or reject it when the
    /// window already holds `rate.num_requests()` arrivals.
    pub fn record_or_reject(&mut self, now: Instant, rate: Rate) -> ThrottleDecision {
        self.expire(now, rate.period());

        if self.timestamps.len() < rate.num_requests() as usize {
            self.timestamps.push_back(now);
            ThrottleDecision::Allow
        } else {
            ThrottleDecision::Reject
        }
    }

    /// Time until the oldest arrival leaves the window.
    ///
    /// Zero when the window still has room.
    pub fn wait(&self, now: Instant, rate: Rate) -> Duration {
        let live = self
            .timestamps
            .iter()
            .filter(|&&t| now.saturating_duration_since(t) < rate.period())
            .count();
        if live < rate.num_requests() as usize {
            return Duration::ZERO;
        }

        match self
            .timestamps
            .iter()
            .find(|&&t| now.saturating_duration_since(t) < rate.period())
        {
            Some(&oldest) => rate
                .period()
                .saturating_sub(now.saturating_duration_since(oldest)),
            // Zero-request rate: nothing will ever fit, wait a full period
            None => rate.period(),
        }
    }

    /// Whether every recorded arrival is older than `period`.
    pub fn is_stale(&self, now: Instant, period: Duration) -> bool {
        self.timestamps
            .back()
            .map_or(true, |&newest| now.saturating_duration_since(newest) >= period)
    }

    /// Number of recorded arrivals (expired ones included until the next check).
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether no arrivals are recorded.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Forget all arrivals.
    pub fn clear(&mut self) {
        self.timestamps.clear();
    }
}
