//! Scoped rate throttling.
//!
//! Endpoints opt into a named scope (for example `low_request`); every client
//! then gets its own sliding-window budget within that scope.

use crate::application::ports::Storage;
use crate::application::throttle::{RequestContext, Throttle, ThrottleVerdict};
use crate::domain::{
    history::RequestHistory, key::ThrottleKey, policy::ThrottleDecision, rate::Rate,
};
use std::fmt;
use std::time::{Duration, Instant};

/// Registry of request histories keyed by throttle key.
///
/// Uses the Storage port for concurrent access. In production, use
/// `Arc<ShardedStorage>`.
#[derive(Clone)]
pub struct HistoryRegistry<S>
where
    S: Storage<ThrottleKey, RequestHistory> + Clone,
{
    storage: S,
}

impl<S> HistoryRegistry<S>
where
    S: Storage<ThrottleKey, RequestHistory> + Clone,
{
    /// Create a registry over `storage`.
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Access or create the history for `key` with a callback.
    pub fn with_history<F, R>(&self, key: ThrottleKey, f: F) -> R
    where
        F: FnOnce(&mut RequestHistory) -> R,
    {
        self.storage.with_entry_mut(key, RequestHistory::new, f)
    }

    /// Get the number of tracked keys.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Clear all tracked histories.
    pub fn clear(&self) {
        self.storage.clear();
    }

    /// Drop histories with no arrival inside the last `period`.
    pub fn purge_stale(&self, now: Instant, period: Duration) {
        self.storage
            .retain(|_, history| !history.is_stale(now, period));
    }
}

impl<S> fmt::Debug for HistoryRegistry<S>
where
    S: Storage<ThrottleKey, RequestHistory> + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryRegistry")
            .field("keys", &self.storage.len())
            .finish()
    }
}

/// Per-client rate limit for one scope.
///
/// Only requests tagged with this throttle's scope are counted. Everything
/// else passes untouched.
#[derive(Debug, Clone)]
pub struct ScopedRateThrottle<S>
where
    S: Storage<ThrottleKey, RequestHistory> + Clone,
{
    scope: String,
    rate: Rate,
    registry: HistoryRegistry<S>,
}

impl<S> ScopedRateThrottle<S>
where
    S: Storage<ThrottleKey, RequestHistory> + Clone,
{
    /// Create a throttle for `scope` limited to `rate`.
    pub fn new(scope: impl Into<String>, rate: Rate, registry: HistoryRegistry<S>) -> Self {
        Self {
            scope: scope.into(),
            rate,
            registry,
        }
    }

    /// The scope this throttle covers.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The configured rate.
    pub fn rate(&self) -> Rate {
        self.rate
    }

    /// The backing registry.
    pub fn registry(&self) -> &HistoryRegistry<S> {
        &self.registry
    }

    fn applies_to(&self, request: &RequestContext<'_>) -> bool {
        request.scope() == Some(self.scope.as_str())
    }
}

impl<S> Throttle for ScopedRateThrottle<S>
where
    S: Storage<ThrottleKey, RequestHistory> + Clone,
{
    fn name(&self) -> &str {
        &self.scope
    }

    fn check(&self, request: &RequestContext<'_>) -> ThrottleVerdict {
        if !self.applies_to(request) {
            return ThrottleVerdict::allow();
        }

        let key = ThrottleKey::new(&self.scope, request.client_ident());
        let now = request.now();
        let rate = self.rate;

        self.registry.with_history(key, |history| {
            match history.record_or_reject(now, rate) {
                ThrottleDecision::Allow => ThrottleVerdict::allow(),
                ThrottleDecision::Reject => ThrottleVerdict::reject(Some(history.wait(now, rate))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hour::Hour;
    use crate::infrastructure::storage::ShardedStorage;
    use std::sync::Arc;

    type Histories = Arc<ShardedStorage<ThrottleKey, RequestHistory>>;

    fn throttle(scope: &str, rate: &str) -> ScopedRateThrottle<Histories> {
        let registry = HistoryRegistry::new(Arc::new(ShardedStorage::new()));
        ScopedRateThrottle::new(scope, rate.parse().unwrap(), registry)
    }

    fn ctx<'a>(now: Instant, scope: &'a str, client: &'a str) -> RequestContext<'a> {
        RequestContext::new(Hour::new(12).unwrap(), now, client).with_scope(scope)
    }

    #[test]
    fn test_one_per_minute() {
        let throttle = throttle("low_request", "1/minute");
        let start = Instant::now();

        assert_eq!(
            throttle.check(&ctx(start, "low_request", "alice")),
            ThrottleVerdict::allow()
        );

        let t10 = start + Duration::from_secs(10);
        let verdict = throttle.check(&ctx(t10, "low_request", "alice"));
        assert!(verdict.decision.is_reject());
        assert_eq!(verdict.wait, Some(Duration::from_secs(50)));

        let t60 = start + Duration::from_secs(60);
        assert!(throttle
            .check(&ctx(t60, "low_request", "alice"))
            .decision
            .is_allow());
    }

    #[test]
    fn test_clients_have_separate_budgets() {
        let throttle = throttle("low_request", "1/minute");
        let now = Instant::now();

        assert!(throttle.check(&ctx(now, "low_request", "alice")).decision.is_allow());
        assert!(throttle.check(&ctx(now, "low_request", "bob")).decision.is_allow());
        assert!(throttle.check(&ctx(now, "low_request", "alice")).decision.is_reject());
        assert_eq!(throttle.registry().len(), 2);
    }

    #[test]
    fn test_other_scope_untouched() {
        let throttle = throttle("low_request", "1/minute");
        let now = Instant::now();

        for _ in 0..5 {
            assert!(throttle.check(&ctx(now, "burst", "alice")).decision.is_allow());
        }
        assert!(throttle.registry().is_empty());
    }

    #[test]
    fn test_unscoped_request_passes() {
        let throttle = throttle("low_request", "1/minute");
        let now = Instant::now();
        let unscoped = RequestContext::new(Hour::new(12).unwrap(), now, "alice");

        for _ in 0..3 {
            assert!(throttle.check(&unscoped).decision.is_allow());
        }
        assert!(throttle.registry().is_empty());
    }

    #[test]
    fn test_purge_stale() {
        let throttle = throttle("low_request", "5/minute");
        let start = Instant::now();
        throttle.check(&ctx(start, "low_request", "alice"));
        throttle.check(&ctx(start + Duration::from_secs(30), "low_request", "bob"));
        assert_eq!(throttle.registry().len(), 2);

        let later = start + Duration::from_secs(70);
        throttle
            .registry()
            .purge_stale(later, throttle.rate().period());
        assert_eq!(throttle.registry().len(), 1);

        throttle.registry().clear();
        assert!(throttle.registry().is_empty());
    }

    #[test]
    fn test_concurrent_checks_respect_budget() {
        use std::thread;

        let throttle = Arc::new(throttle("low_request", "100/hour"));
        let now = Instant::now();
        let mut handles = vec![];

        for _ in 0..8 {
            let t = Arc::clone(&throttle);
            handles.push(thread::spawn(move || {
                (0..50)
                    .filter(|_| t.check(&ctx(now, "low_request", "shared")).decision.is_allow())
                    .count()
            }));
        }

        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 100);
    }
}
