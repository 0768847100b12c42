//! Throttle keys.
//!
//! A throttle key identifies one rate budget: a scope shared by a group of
//! endpoints combined with the client the requests are counted against
//! (authenticated user id or remote address).

use std::fmt;

/// Exact `(scope, client ident)` pair.
///
/// Two keys are equal only when both parts are equal, so distinct clients
/// can never end up sharing a budget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThrottleKey {
    scope: String,
    client_ident: String,
}

impl ThrottleKey {
    /// Build the key for `client_ident` within `scope`.
    pub fn new(scope: &str, client_ident: &str) -> Self {
        Self {
            scope: scope.to_string(),
            client_ident: client_ident.to_string(),
        }
    }

    /// The scope part.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The client part.
    pub fn client_ident(&self) -> &str {
        &self.client_ident
    }
}

impl fmt::Display for ThrottleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.client_ident)
    }
}
