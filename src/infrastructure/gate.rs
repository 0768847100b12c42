//! Request gate: the framework-facing front door.
//!
//! A web framework calls [`RequestGate::check`] once per request, before the
//! handler runs. The gate samples the clock, runs the throttle chain, records
//! metrics and logs rejections. Building the HTTP response is left to the
//! framework; [`Admission`] carries the status code and retry hint it needs.

use crate::application::{
    chain::{Admission, ThrottleChain},
    metrics::Metrics,
    ports::Clock,
    scoped::{HistoryRegistry, ScopedRateThrottle},
    throttle::RequestContext,
};
use crate::domain::{
    history::RequestHistory,
    hour::HourError,
    key::ThrottleKey,
    policy::{HourWindow, HourWindowGate},
    rate::{Rate, RateError},
};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::settings::ThrottleSettings;
use crate::infrastructure::storage::ShardedStorage;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

type Histories = Arc<ShardedStorage<ThrottleKey, RequestHistory>>;

/// Error returned when building a RequestGate fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Reject window hours are invalid
    Window(HourError),
    /// A scope's rate string could not be parsed
    Rate {
        /// Scope the rate was configured for
        scope: String,
        /// Parse failure
        source: RateError,
    },
    /// Scope names must not be empty
    EmptyScope,
    /// The same scope was configured twice
    DuplicateScope(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Window(e) => write!(f, "invalid reject window: {}", e),
            BuildError::Rate { scope, source } => {
                write!(f, "invalid rate for scope {:?}: {}", scope, source)
            }
            BuildError::EmptyScope => write!(f, "scope name must not be empty"),
            BuildError::DuplicateScope(scope) => {
                write!(f, "scope {:?} is configured more than once", scope)
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Window(e) => Some(e),
            BuildError::Rate { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<HourError> for BuildError {
    fn from(e: HourError) -> Self {
        BuildError::Window(e)
    }
}

/// Rate as handed to the builder, parsed in `build()`.
#[derive(Debug, Clone)]
enum PendingRate {
    Parsed(Rate),
    Raw(String),
}

/// Builder for constructing a `RequestGate`.
#[derive(Debug)]
pub struct RequestGateBuilder {
    working_hours: bool,
    reject_window: Option<HourWindow>,
    reject_hours: Option<(u8, u8)>,
    scope_rates: Vec<(String, PendingRate)>,
    clock: Option<Arc<dyn Clock>>,
}

impl RequestGateBuilder {
    /// Reject requests during the closed hours (enabled by default).
    pub fn with_working_hours(mut self) -> Self {
        self.working_hours = true;
        self
    }

    /// Admit requests at any hour.
    pub fn without_working_hours(mut self) -> Self {
        self.working_hours = false;
        self
    }

    /// Replace the default `[3, 5]` closed window.
    pub fn with_reject_window(mut self, window: HourWindow) -> Self {
        self.reject_window = Some(window);
        self.reject_hours = None;
        self
    }

    /// Replace the closed window with raw hours.
    ///
    /// The hours will be validated when `build()` is called.
    pub fn with_reject_hours(mut self, start: u8, end: u8) -> Self {
        self.reject_hours = Some((start, end));
        self.reject_window = None;
        self
    }

    /// Limit requests tagged with `scope` to `rate` per client.
    pub fn with_scope_rate(mut self, scope: impl Into<String>, rate: Rate) -> Self {
        self.scope_rates
            .push((scope.into(), PendingRate::Parsed(rate)));
        self
    }

    /// Apply declarative settings on top of the current configuration.
    ///
    /// A scope already given a rate is overridden by the settings' rate.
    /// Rate strings will be validated when `build()` is called.
    pub fn with_settings(mut self, settings: ThrottleSettings) -> Self {
        self.working_hours = settings.working_hours;
        if let Some(window) = settings.reject_window {
            self = self.with_reject_window(window);
        }
        for (scope, rate) in settings.rates {
            self.scope_rates.retain(|(existing, _)| *existing != scope);
            self.scope_rates.push((scope, PendingRate::Raw(rate)));
        }
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the gate.
    ///
    /// # Errors
    /// Returns `BuildError` if the configuration is invalid.
    pub fn build(self) -> Result<RequestGate, BuildError> {
        let window = match (self.reject_window, self.reject_hours) {
            (Some(window), _) => window,
            (None, Some((start, end))) => HourWindow::from_hours(start, end)?,
            (None, None) => HourWindow::default(),
        };
        let hour_gate = self
            .working_hours
            .then(|| HourWindowGate::with_window(window));

        let mut seen = BTreeSet::new();
        let mut rates = Vec::with_capacity(self.scope_rates.len());
        for (scope, pending) in self.scope_rates {
            if scope.is_empty() {
                return Err(BuildError::EmptyScope);
            }
            if !seen.insert(scope.clone()) {
                return Err(BuildError::DuplicateScope(scope));
            }
            let rate = match pending {
                PendingRate::Parsed(rate) => rate,
                PendingRate::Raw(raw) => match raw.parse::<Rate>() {
                    Ok(rate) => rate,
                    Err(source) => return Err(BuildError::Rate { scope, source }),
                },
            };
            rates.push((scope, rate));
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let histories: Histories = Arc::new(ShardedStorage::new());
        let registry = HistoryRegistry::new(histories);

        let mut chain = ThrottleChain::new();
        if let Some(gate) = hour_gate {
            chain.push(Box::new(gate));
        }
        let scopes: BTreeSet<String> = rates.iter().map(|(scope, _)| scope.clone()).collect();
        let mut longest_period = None;
        for (scope, rate) in rates {
            longest_period = longest_period.max(Some(rate.period()));
            chain.push(Box::new(ScopedRateThrottle::new(
                scope,
                rate,
                registry.clone(),
            )));
        }

        tracing::info!(
            throttles = ?chain.names(),
            reject_window = %window,
            working_hours = hour_gate.is_some(),
            "request gate configured"
        );

        Ok(RequestGate {
            inner: Arc::new(GateInner {
                chain,
                hour_gate,
                clock,
                registry,
                scopes,
                longest_period,
                metrics: Metrics::new(),
            }),
        })
    }
}

#[derive(Debug)]
struct GateInner {
    chain: ThrottleChain,
    hour_gate: Option<HourWindowGate>,
    clock: Arc<dyn Clock>,
    registry: HistoryRegistry<Histories>,
    scopes: BTreeSet<String>,
    longest_period: Option<Duration>,
    metrics: Metrics,
}

/// Admission check run before each request reaches its handler.
///
/// Cheap to clone; clones share throttle state and metrics.
///
/// # Example
/// ```
/// use http::{header::RETRY_AFTER, HeaderMap, HeaderValue, StatusCode};
/// use working_hours_throttle::{Rate, RequestGate};
/// use std::time::Duration;
///
/// let gate = RequestGate::builder()
///     .with_scope_rate("low_request", Rate::new(10, Duration::from_secs(60)))
///     .build()
///     .unwrap();
///
/// let admission = gate.check(Some("low_request"), "user:42");
/// if let Some(status) = admission.status_code() {
///     let mut headers = HeaderMap::new();
///     if let Some(secs) = admission.retry_after_secs() {
///         headers.insert(RETRY_AFTER, HeaderValue::from(secs));
///     }
///     assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequestGate {
    inner: Arc<GateInner>,
}

impl RequestGate {
    /// Create a gate with only the default working-hours check.
    pub fn new() -> Self {
        Self::builder()
            .build()
            .expect("default configuration is always valid")
    }

    /// Create a builder.
    pub fn builder() -> RequestGateBuilder {
        RequestGateBuilder {
            working_hours: true,
            reject_window: None,
            reject_hours: None,
            scope_rates: Vec::new(),
            clock: None,
        }
    }

    /// Decide on a request for an endpoint in `scope`, counted against
    /// `client_ident`.
    ///
    /// Reads the clock once; every throttle sees the same readings.
    pub fn check(&self, scope: Option<&str>, client_ident: &str) -> Admission {
        let hour = self.inner.clock.local_hour();
        let now = self.inner.clock.now();

        let mut request = RequestContext::new(hour, now, client_ident);
        if let Some(scope) = scope {
            request = request.with_scope(scope);
        }
        self.check_context(&request)
    }

    /// Decide on a request whose clock readings the caller already took.
    ///
    /// A request tagged with a scope that has no configured rate is refused
    /// with [`Admission::UnknownScope`] instead of going unlimited.
    pub fn check_context(&self, request: &RequestContext<'_>) -> Admission {
        if let Some(scope) = request.scope() {
            if !self.inner.scopes.contains(scope) {
                self.inner.metrics.record_rejected();
                tracing::warn!(scope, "no rate configured for scope");
                return Admission::UnknownScope {
                    scope: scope.to_string(),
                };
            }
        }

        let admission = self.inner.chain.check(request);

        match &admission {
            Admission::Admitted => self.inner.metrics.record_admitted(),
            Admission::Rejected { throttle, wait } => {
                self.inner.metrics.record_rejected();
                if self
                    .inner
                    .hour_gate
                    .is_some_and(|gate| !gate.allow(request.hour()))
                {
                    self.inner.metrics.record_closed_hours_rejection();
                }
                tracing::debug!(
                    throttle = %throttle,
                    hour = request.hour().get(),
                    scope = request.scope().unwrap_or(""),
                    wait_ms = wait.map(|w| w.as_millis() as u64),
                    "request rejected"
                );
            }
            Admission::UnknownScope { .. } => {}
        }

        admission
    }

    /// Drop rate histories that can no longer affect a decision.
    ///
    /// Call periodically from a housekeeping task to bound memory when many
    /// distinct clients come and go.
    pub fn purge_stale(&self) {
        if let Some(period) = self.inner.longest_period {
            self.inner
                .registry
                .purge_stale(self.inner.clock.now(), period);
        }
    }

    /// Number of clients with a tracked rate history.
    pub fn tracked_clients(&self) -> usize {
        self.inner.registry.len()
    }

    /// Names of the configured throttles, in evaluation order.
    pub fn throttle_names(&self) -> Vec<&str> {
        self.inner.chain.names()
    }

    /// Admission metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }
}

impl Default for RequestGate {
    fn default() -> Self {
        Self::new()
    }
}
