//! Admission policies based on the local hour of day.
//!
//! This module defines the decision type shared by every throttle and the
//! working-hours gate, which rejects requests during a fixed local hour window.

use crate::domain::hour::{Hour, HourError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision made by a throttle for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Let the request through
    Allow,
    /// Reject the request before it reaches the handler
    Reject,
}

impl ThrottleDecision {
    /// Check if this decision is Allow.
    pub fn is_allow(&self) -> bool {
        matches!(self, ThrottleDecision::Allow)
    }

    /// Check if this decision is Reject.
    pub fn is_reject(&self) -> bool {
        matches!(self, ThrottleDecision::Reject)
    }
}

impl From<bool> for ThrottleDecision {
    fn from(allowed: bool) -> Self {
        if allowed {
            ThrottleDecision::Allow
        } else {
            ThrottleDecision::Reject
        }
    }
}

/// Inclusive range of local hours. Never wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow", into = "RawWindow")]
pub struct HourWindow {
    start: Hour,
    end: Hour,
}

#[derive(Serialize, Deserialize)]
struct RawWindow {
    start: u8,
    end: u8,
}

impl HourWindow {
    /// Create a window covering `start..=end`.
    pub fn new(start: Hour, end: Hour) -> Result<Self, HourError> {
        if start > end {
            return Err(HourError::InvertedWindow {
                start: start.get(),
                end: end.get(),
            });
        }
        Ok(Self { start, end })
    }

    /// Create a window from raw hour values.
    pub fn from_hours(start: u8, end: u8) -> Result<Self, HourError> {
        Self::new(Hour::new(start)?, Hour::new(end)?)
    }

    /// First hour in the window.
    pub fn start(&self) -> Hour {
        self.start
    }

    /// Last hour in the window.
    pub fn end(&self) -> Hour {
        self.end
    }

    /// Whether `hour` falls inside the window, boundaries included.
    pub fn contains(&self, hour: Hour) -> bool {
        self.start <= hour && hour <= self.end
    }
}

impl Default for HourWindow {
    /// Local 03:00 through 05:59.
    fn default() -> Self {
        Self {
            start: Hour(3),
            end: Hour(5),
        }
    }
}

impl TryFrom<RawWindow> for HourWindow {
    type Error = HourError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        HourWindow::from_hours(raw.start, raw.end)
    }
}

impl From<HourWindow> for RawWindow {
    fn from(window: HourWindow) -> Self {
        RawWindow {
            start: window.start.get(),
            end: window.end.get(),
        }
    }
}

impl fmt::Display for HourWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00-{:02}:59", self.start.get(), self.end.get())
    }
}

/// Working-hours gate.
///
/// Admits every request unless the current local hour is inside the reject
/// window (by default 3, 4 and 5). The gate holds no mutable state, so a
/// single instance can be shared by any number of request handlers.
///
/// # Example
/// ```
/// use working_hours_throttle::{Hour, HourWindowGate};
///
/// let gate = HourWindowGate::new();
/// assert!(gate.allow(Hour::new(2).unwrap()));
/// assert!(!gate.allow(Hour::new(3).unwrap()));
/// assert!(!gate.allow(Hour::new(5).unwrap()));
/// assert!(gate.allow(Hour::new(6).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HourWindowGate {
    window: HourWindow,
}

impl HourWindowGate {
    /// Create a gate with the default reject window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gate rejecting requests during `window`.
    pub fn with_window(window: HourWindow) -> Self {
        Self { window }
    }

    /// The reject window.
    pub fn window(&self) -> HourWindow {
        self.window
    }

    /// Decide whether a request arriving at `current_hour` may proceed.
    pub fn allow(&self, current_hour: Hour) -> bool {
        !self.window.contains(current_hour)
    }

    /// Same as [`allow`](Self::allow), as a decision.
    pub fn decide(&self, current_hour: Hour) -> ThrottleDecision {
        self.allow(current_hour).into()
    }
}

/// Default working-hours check: `false` for local hours 3 through 5.
pub fn allow(current_hour: Hour) -> bool {
    HourWindowGate::new().allow(current_hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(value: u8) -> Hour {
        Hour::new(value).unwrap()
    }

    #[test]
    fn test_rejects_inside_window() {
        for h in 3..=5 {
            assert!(!allow(hour(h)), "hour {} should be rejected", h);
        }
    }

    #[test]
    fn test_allows_outside_window() {
        for h in (0..=2).chain(6..=23) {
            assert!(allow(hour(h)), "hour {} should be allowed", h);
        }
    }

    #[test]
    fn test_boundaries() {
        assert!(allow(hour(2)));
        assert!(!allow(hour(3)));
        assert!(!allow(hour(5)));
        assert!(allow(hour(6)));
        assert!(allow(hour(0)));
        assert!(allow(hour(23)));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let gate = HourWindowGate::new();
        for h in Hour::all() {
            let first = gate.allow(h);
            for _ in 0..10 {
                assert_eq!(gate.allow(h), first);
            }
        }
    }

    #[test]
    fn test_decide_matches_allow() {
        let gate = HourWindowGate::new();
        for h in Hour::all() {
            assert_eq!(gate.decide(h).is_allow(), gate.allow(h));
        }
        assert_eq!(gate.decide(hour(4)), ThrottleDecision::Reject);
    }

    #[test]
    fn test_custom_window() {
        let gate = HourWindowGate::with_window(HourWindow::from_hours(22, 23).unwrap());
        assert!(gate.allow(hour(0)));
        assert!(gate.allow(hour(4)));
        assert!(gate.allow(hour(21)));
        assert!(!gate.allow(hour(22)));
        assert!(!gate.allow(hour(23)));
    }

    #[test]
    fn test_single_hour_window() {
        let window = HourWindow::from_hours(12, 12).unwrap();
        assert!(window.contains(hour(12)));
        assert!(!window.contains(hour(11)));
        assert!(!window.contains(hour(13)));
    }

    #[test]
    fn test_inverted_window_rejected() {
        assert_eq!(
            HourWindow::from_hours(23, 1),
            Err(HourError::InvertedWindow { start: 23, end: 1 })
        );
    }

    #[test]
    fn test_window_display() {
        assert_eq!(HourWindow::default().to_string(), "03:00-05:59");
    }

    #[test]
    fn test_window_deserialize_validates() {
        let window: HourWindow = serde_json::from_str(r#"{"start": 1, "end": 2}"#).unwrap();
        assert_eq!(window, HourWindow::from_hours(1, 2).unwrap());

        assert!(serde_json::from_str::<HourWindow>(r#"{"start": 5, "end": 2}"#).is_err());
        assert!(serde_json::from_str::<HourWindow>(r#"{"start": 1, "end": 24}"#).is_err());
    }
}
