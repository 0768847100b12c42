//! The throttle seam.
//!
//! Every check in a [`ThrottleChain`](crate::ThrottleChain) implements
//! [`Throttle`]. Throttles never read the clock themselves: the caller samples
//! it once per request and hands the readings over in a [`RequestContext`].

use crate::domain::hour::Hour;
use crate::domain::policy::{HourWindowGate, ThrottleDecision};
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// What a throttle gets to see about one request.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    hour: Hour,
    now: Instant,
    scope: Option<&'a str>,
    client_ident: &'a str,
}

impl<'a> RequestContext<'a> {
    /// Create a context from clock readings and request identity.
    pub fn new(hour: Hour, now: Instant, client_ident: &'a str) -> Self {
        Self {
            hour,
            now,
            scope: None,
            client_ident,
        }
    }

    /// Set the throttle scope the endpoint belongs to.
    pub fn with_scope(mut self, scope: &'a str) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Local hour when the request arrived.
    pub fn hour(&self) -> Hour {
        self.hour
    }

    /// Monotonic arrival time.
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Scope of the endpoint, if it opted into one.
    pub fn scope(&self) -> Option<&'a str> {
        self.scope
    }

    /// Identity the request is counted against.
    pub fn client_ident(&self) -> &'a str {
        self.client_ident
    }
}

/// Outcome of a single throttle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleVerdict {
    /// Allow or reject
    pub decision: ThrottleDecision,
    /// Suggested wait before retrying, when the throttle knows one
    pub wait: Option<Duration>,
}

impl ThrottleVerdict {
    /// An allowing verdict.
    pub fn allow() -> Self {
        Self {
            decision: ThrottleDecision::Allow,
            wait: None,
        }
    }

    /// A rejecting verdict with an optional wait.
    pub fn reject(wait: Option<Duration>) -> Self {
        Self {
            decision: ThrottleDecision::Reject,
            wait,
        }
    }
}

impl From<ThrottleDecision> for ThrottleVerdict {
    fn from(decision: ThrottleDecision) -> Self {
        Self {
            decision,
            wait: None,
        }
    }
}

/// A request throttle.
pub trait Throttle: Send + Sync + Debug {
    /// Short name used in logs and rejections.
    fn name(&self) -> &str;

    /// Decide on one request.
    fn check(&self, request: &RequestContext<'_>) -> ThrottleVerdict;
}

impl Throttle for HourWindowGate {
    fn name(&self) -> &str {
        "working_hours"
    }

    /// No retry guidance: the caller is simply told no.
    fn check(&self, request: &RequestContext<'_>) -> ThrottleVerdict {
        self.decide(request.hour()).into()
    }
}
