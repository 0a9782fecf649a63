//! Tutorial notifier thread lifecycle and liveness-skip behaviour.
//!
//! Verifies that:
//! - The runner publishes every step whose anchor is alive, in order
//! - Dead anchors are skipped silently (blank slot, no failure)
//! - Dropping the notifier cancels the remaining sequence promptly
//! - A clock-driven timeline can be run eagerly with a manual clock

use comparator_core::mocks::{AlwaysLive, DeadAnchors};
use comparator_core::{TutorialNotifier, TutorialSequence, TutorialStep};
use comparator_traits::clock::MonotonicClock;
use comparator_traits::clock::test_clock::ManualClock;
use std::time::Duration;

fn steps(names: &[&str]) -> Vec<TutorialStep> {
    names
        .iter()
        .map(|n| TutorialStep {
            message: format!("move {n}"),
            anchor: n.to_string(),
        })
        .collect()
}

fn wait_until_finished(notifier: &mut TutorialNotifier, budget: Duration) -> Vec<Option<String>> {
    // Record the sequence of observed active messages until the terminal
    // blank arrives or the budget runs out.
    let mut observed = Vec::new();
    let start = std::time::Instant::now();
    while start.elapsed() < budget {
        let active = notifier.active().map(|s| s.message.clone());
        if observed.last() != Some(&active) {
            observed.push(active);
        }
        if notifier.is_finished() {
            return observed;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    panic!("tutorial did not finish within {budget:?}");
}

#[test]
fn publishes_all_steps_in_order_then_goes_idle() {
    let seq = TutorialSequence::new(steps(&["left", "right", "up"]), 50).unwrap();
    let mut notifier = TutorialNotifier::spawn(seq, AlwaysLive, MonotonicClock::new());

    let observed = wait_until_finished(&mut notifier, Duration::from_secs(5));
    let shown: Vec<&str> = observed
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();
    assert_eq!(shown, ["move left", "move right", "move up"]);
    // Terminal state is "nothing active".
    assert_eq!(observed.last(), Some(&None));
    assert!(notifier.active().is_none());
}

#[test]
fn dead_anchors_are_skipped_silently() {
    let seq = TutorialSequence::new(steps(&["left", "right", "up"]), 50).unwrap();
    let probe = DeadAnchors(vec!["right".to_string()]);
    let mut notifier = TutorialNotifier::spawn(seq, probe, MonotonicClock::new());

    let observed = wait_until_finished(&mut notifier, Duration::from_secs(5));
    let shown: Vec<&str> = observed
        .iter()
        .flatten()
        .map(String::as_str)
        .collect();
    assert_eq!(shown, ["move left", "move up"]);
}

#[test]
fn drop_cancels_remaining_sequence_promptly() {
    // A dwell far longer than the join budget: cancellation must not wait
    // out the timer.
    let seq = TutorialSequence::new(steps(&["left", "right"]), 60_000).unwrap();
    let notifier = TutorialNotifier::spawn(seq, AlwaysLive, MonotonicClock::new());

    std::thread::sleep(Duration::from_millis(20));
    let start = std::time::Instant::now();
    drop(notifier);
    assert!(
        start.elapsed() < Duration::from_millis(500),
        "drop took {:?}, cancellation is not prompt",
        start.elapsed()
    );
}

#[test]
fn cancel_is_idempotent_and_stops_publication() {
    let seq = TutorialSequence::new(steps(&["left", "right", "up"]), 60_000).unwrap();
    let mut notifier = TutorialNotifier::spawn(seq, AlwaysLive, MonotonicClock::new());

    std::thread::sleep(Duration::from_millis(20));
    notifier.cancel();
    notifier.cancel();
    std::thread::sleep(Duration::from_millis(50));

    // At most the first step was published before the cancel landed.
    let active = notifier.active().map(|s| s.message.clone());
    assert!(active.is_none() || active.as_deref() == Some("move left"));
}

#[test]
fn manual_clock_runs_the_timeline_eagerly() {
    // With a manual clock, dwell sleeps advance simulated time instantly and
    // the whole sequence completes without wall-clock delay.
    let seq = TutorialSequence::new(steps(&["left", "right", "up", "down"]), 3_000).unwrap();
    let mut notifier = TutorialNotifier::spawn(seq, AlwaysLive, ManualClock::new());

    let start = std::time::Instant::now();
    let observed = wait_until_finished(&mut notifier, Duration::from_secs(5));
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(observed.iter().flatten().count() <= 4);
    assert!(notifier.is_finished());
}

#[test]
fn multiple_notifiers_dont_leak_threads() {
    for _ in 0..10 {
        let seq = TutorialSequence::new(steps(&["left"]), 10).unwrap();
        let mut notifier = TutorialNotifier::spawn(seq, AlwaysLive, MonotonicClock::new());
        std::thread::sleep(Duration::from_millis(5));
        let _ = notifier.active();
        drop(notifier);
    }
}
