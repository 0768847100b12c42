//! # working-hours-throttle
//!
//! Request throttling for web APIs. The core is a working-hours gate that
//! refuses every request while the local clock reads 03:00 through 05:59.
//! Around it sit per-client scoped rate limits and a [`RequestGate`] that a
//! web framework calls before each handler.
//!
//! ## Quick Start
//!
//! ```rust
//! use working_hours_throttle::{Admission, Rate, RequestGate};
//! use std::time::Duration;
//!
//! // Closed 03:00-05:59 local time, plus one request per minute per client
//! // for endpoints in the "low_request" scope.
//! let gate = RequestGate::builder()
//!     .with_scope_rate("low_request", Rate::new(1, Duration::from_secs(60)))
//!     .build()
//!     .unwrap();
//!
//! match gate.check(Some("low_request"), "user:42") {
//!     Admission::Admitted => { /* run the handler */ }
//!     rejected => {
//!         let status = rejected.status_code();        // Some(TOO_MANY_REQUESTS)
//!         let retry_after = rejected.retry_after_secs();
//!         # let _ = (status, retry_after);
//!     }
//! }
//! ```
//!
//! ## The Gate On Its Own
//!
//! The working-hours check is a pure function of the hour. Callers sample the
//! clock and pass the hour in:
//!
//! ```rust
//! use working_hours_throttle::{allow, Hour};
//!
//! assert!(allow(Hour::new(2).unwrap()));
//! assert!(!allow(Hour::new(3).unwrap()));
//! assert!(!allow(Hour::new(5).unwrap()));
//! assert!(allow(Hour::new(6).unwrap()));
//! ```
//!
//! ## Configuration From Settings
//!
//! ```rust
//! use working_hours_throttle::{RequestGate, ThrottleSettings};
//!
//! let settings: ThrottleSettings = serde_json::from_str(r#"{
//!     "reject_window": { "start": 3, "end": 5 },
//!     "rates": { "low_request": "1/minute" }
//! }"#).unwrap();
//!
//! let gate = RequestGate::builder().with_settings(settings).build().unwrap();
//! assert_eq!(gate.throttle_names(), vec!["working_hours", "low_request"]);
//! ```
//!
//! ## Time Zones
//!
//! The hour comes from the local time zone of the running process. Replicas
//! deployed in different zones close at different real-world moments.
//!
//! ## Observability
//!
//! Rejections are logged at `DEBUG` through `tracing` and counted in
//! [`Metrics`]. A request naming a scope that has no configured rate is
//! refused with [`Admission::UnknownScope`] and logged at `WARN`:
//!
//! ```rust
//! # use working_hours_throttle::RequestGate;
//! let gate = RequestGate::new();
//! gate.check(None, "10.0.0.7");
//! let snapshot = gate.metrics().snapshot();
//! assert_eq!(snapshot.total_requests(), 1);
//! ```

// Domain layer - pure throttling rules
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    history::RequestHistory,
    hour::{Hour, HourError},
    key::ThrottleKey,
    policy::{allow, HourWindow, HourWindowGate, ThrottleDecision},
    rate::{Rate, RateError},
};

pub use application::{
    chain::{Admission, ThrottleChain},
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, Storage},
    scoped::{HistoryRegistry, ScopedRateThrottle},
    throttle::{RequestContext, Throttle, ThrottleVerdict},
};

pub use infrastructure::{
    clock::SystemClock,
    gate::{BuildError, RequestGate, RequestGateBuilder},
    settings::ThrottleSettings,
    storage::ShardedStorage,
};
