//! Throttle chain coordination.
//!
//! The chain consults every configured throttle for each request. A single
//! rejection rejects the request; the suggested wait is the longest wait any
//! rejecting throttle reported.

use crate::application::throttle::{RequestContext, Throttle};
use http::StatusCode;
use std::fmt;
use std::time::Duration;

/// Final decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Hand the request to the handler
    Admitted,
    /// Refuse the request
    Rejected {
        /// Name of the first throttle that rejected
        throttle: String,
        /// Longest wait reported by the rejecting throttles
        wait: Option<Duration>,
    },
    /// The request names a scope no rate is configured for
    UnknownScope {
        /// Scope the request carried
        scope: String,
    },
}

impl Admission {
    /// Check if the request was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }

    /// Check if the request was refused, for any reason.
    pub fn is_rejected(&self) -> bool {
        !self.is_admitted()
    }

    /// Status code for the response, `None` when the request was admitted.
    ///
    /// Throttled requests get `429 Too Many Requests`. A request for an
    /// unconfigured scope is a server-side mistake and gets `500`.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Admission::Admitted => None,
            Admission::Rejected { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            Admission::UnknownScope { .. } => Some(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    /// Wait rounded up to whole seconds, the value for
    /// [`RETRY_AFTER`](http::header::RETRY_AFTER).
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Admission::Rejected {
                wait: Some(wait), ..
            } => {
                let secs = wait.as_secs();
                Some(if wait.subsec_nanos() > 0 { secs + 1 } else { secs })
            }
            _ => None,
        }
    }
}

impl fmt::Display for Admission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Admission::Admitted => write!(f, "admitted"),
            Admission::Rejected {
                throttle,
                wait: Some(wait),
            } => write!(
                f,
                "rejected by {} (retry in {} ms)",
                throttle,
                wait.as_millis()
            ),
            Admission::Rejected {
                throttle,
                wait: None,
            } => write!(f, "rejected by {}", throttle),
            Admission::UnknownScope { scope } => {
                write!(f, "no rate configured for scope {:?}", scope)
            }
        }
    }
}

/// Ordered list of throttles evaluated for every request.
#[derive(Debug, Default)]
pub struct ThrottleChain {
    throttles: Vec<Box<dyn Throttle>>,
}

impl ThrottleChain {
    /// Create an empty chain, which admits everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a throttle.
    pub fn push(&mut self, throttle: Box<dyn Throttle>) {
        self.throttles.push(throttle);
    }

    /// Append a throttle, builder style.
    pub fn with(mut self, throttle: impl Throttle + 'static) -> Self {
        self.push(Box::new(throttle));
        self
    }

    /// Names of the configured throttles, in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.throttles.iter().map(|t| t.name()).collect()
    }

    /// Number of throttles.
    pub fn len(&self) -> usize {
        self.throttles.len()
    }

    /// Check if the chain has no throttles.
    pub fn is_empty(&self) -> bool {
        self.throttles.is_empty()
    }

    /// Evaluate every throttle against `request`.
    pub fn check(&self, request: &RequestContext<'_>) -> Admission {
        let mut rejected_by: Option<&str> = None;
        let mut longest_wait: Option<Duration> = None;

        for throttle in &self.throttles {
            let verdict = throttle.check(request);
            if verdict.decision.is_allow() {
                continue;
            }

            rejected_by.get_or_insert(throttle.name());
            if let Some(wait) = verdict.wait {
                longest_wait = Some(longest_wait.map_or(wait, |w| w.max(wait)));
            }
        }

        match rejected_by {
            None => Admission::Admitted,
            Some(name) => Admission::Rejected {
                throttle: name.to_string(),
                wait: longest_wait,
            },
        }
    }
}
