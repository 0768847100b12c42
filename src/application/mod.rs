//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain rules for each request:
//! - The throttle seam and request context
//! - Scoped rate throttles and their history registry
//! - The throttle chain (admission decision)
//! - Admission metrics
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod chain;
pub mod metrics;
pub mod ports;
pub mod scoped;
pub mod throttle;
