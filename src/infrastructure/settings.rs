//! Declarative throttle settings.
//!
//! Hosts that keep configuration in files can deserialize
//! [`ThrottleSettings`] with any serde format and hand it to
//! [`RequestGateBuilder::with_settings`](crate::RequestGateBuilder::with_settings).
//! Rate strings are validated when the gate is built, not while parsing, so
//! a bad rate reports which scope it belongs to.

use crate::domain::policy::HourWindow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Throttle configuration.
///
/// ```
/// use working_hours_throttle::ThrottleSettings;
///
/// let settings: ThrottleSettings = serde_json::from_str(
///     r#"{ "rates": { "low_request": "1/minute" } }"#,
/// ).unwrap();
/// assert!(settings.working_hours);
/// assert_eq!(settings.rates["low_request"], "1/minute");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThrottleSettings {
    /// Reject requests during the closed hours
    pub working_hours: bool,
    /// Closed hours, `[3, 5]` when unset
    pub reject_window: Option<HourWindow>,
    /// Rate per scope, e.g. `"low_request" => "1/minute"`
    pub rates: BTreeMap<String, String>,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            working_hours: true,
            reject_window: None,
            rates: BTreeMap::new(),
        }
    }
}
