//! Domain layer - pure throttling rules with no I/O.
//!
//! This layer contains the core concepts and invariants:
//! - Validated local hours and the working-hours gate
//! - Request rates and sliding-window histories
//! - Throttle keys identifying a rate budget
//!
//! All types in this layer are pure and easily testable.

pub mod history;
pub mod hour;
pub mod key;
pub mod policy;
pub mod rate;
