//! A gate configured from settings, driven through a simulated day.
//!
//! The clock is a `MockClock`, so the example runs instantly: it walks the
//! hours from midnight to 23:00 and fires a few requests at each one.

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::prelude::*;
use working_hours_throttle::infrastructure::mocks::MockClock;
use working_hours_throttle::{Admission, Hour, RequestGate, ThrottleSettings};

fn main() {
    // Rejections are logged at DEBUG, unknown scopes at WARN
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(
            tracing_subscriber::filter::LevelFilter::DEBUG,
        ))
        .init();

    let settings: ThrottleSettings = serde_json::from_str(
        r#"{
            "working_hours": true,
            "reject_window": { "start": 3, "end": 5 },
            "rates": { "low_request": "2/minute" }
        }"#,
    )
    .expect("settings are valid JSON");

    let clock = Arc::new(MockClock::at_hour(Hour::MIDNIGHT));
    let gate = RequestGate::builder()
        .with_settings(settings)
        .with_clock(clock.clone())
        .build()
        .expect("settings are valid");

    println!("=== Working Day Example ===\n");
    println!("Closed 03:00-05:59, low_request limited to 2/minute per client\n");

    for hour in Hour::all() {
        clock.set_hour(hour);

        let outcomes: Vec<String> = (0..3)
            .map(|_| describe(&gate.check(Some("low_request"), "user:42")))
            .collect();
        println!("{}  {}", hour, outcomes.join(", "));

        // A fresh budget for the next hour
        clock.advance(Duration::from_secs(3_600));
    }

    println!("\nA typo'd scope is refused rather than left unlimited:");
    println!("  {}", gate.check(Some("low_requets"), "user:42"));

    let snapshot = gate.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "admitted {}, rejected {} ({} during closed hours)",
        snapshot.requests_admitted, snapshot.requests_rejected, snapshot.closed_hours_rejections
    );
}

fn describe(admission: &Admission) -> String {
    match admission.retry_after_secs() {
        Some(secs) => format!("{} (Retry-After {}s)", admission, secs),
        None => admission.to_string(),
    }
}
