//! Integration tests for the working-hours gate.

use working_hours_throttle::{allow, Hour, HourWindow, HourWindowGate, ThrottleDecision};

fn hour(value: u8) -> Hour {
    Hour::new(value).unwrap()
}

#[test]
fn test_closed_hours_rejected() {
    for h in 3..=5 {
        assert!(!allow(hour(h)), "hour {} should be rejected", h);
    }
}

#[test]
fn test_open_hours_admitted() {
    for h in (0..=2).chain(6..=23) {
        assert!(allow(hour(h)), "hour {} should be admitted", h);
    }
}

#[test]
fn test_boundary_scenarios() {
    assert!(allow(hour(2)));
    assert!(!allow(hour(3)));
    assert!(!allow(hour(5)));
    assert!(allow(hour(6)));
    assert!(allow(hour(0)));
    assert!(allow(hour(23)));
}

#[test]
fn test_exactly_three_closed_hours() {
    let closed: Vec<u8> = Hour::all()
        .filter(|&h| !allow(h))
        .map(Hour::get)
        .collect();
    assert_eq!(closed, vec![3, 4, 5]);
}

#[test]
fn test_same_hour_same_answer() {
    let gate = HourWindowGate::new();
    let first: Vec<bool> = Hour::all().map(|h| gate.allow(h)).collect();
    for _ in 0..100 {
        let again: Vec<bool> = Hour::all().map(|h| gate.allow(h)).collect();
        assert_eq!(again, first);
    }
}

#[test]
fn test_default_gate_matches_free_function() {
    let gate = HourWindowGate::default();
    assert_eq!(gate.window(), HourWindow::default());
    for h in Hour::all() {
        assert_eq!(gate.allow(h), allow(h));
        assert_eq!(gate.decide(h), ThrottleDecision::from(allow(h)));
    }
}

#[test]
fn test_shared_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let gate = Arc::new(HourWindowGate::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = Arc::clone(&gate);
            thread::spawn(move || Hour::all().filter(|&h| gate.allow(h)).count())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 21);
    }
}

#[test]
fn test_invalid_hours_never_reach_the_gate() {
    assert!(Hour::new(24).is_err());
    assert!(Hour::try_from(99u32).is_err());
}
