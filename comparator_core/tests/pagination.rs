use comparator_core::ComparatorSession;

fn session_with_readings(n: usize) -> ComparatorSession {
    let mut s = ComparatorSession::builder().build().expect("session");
    for _ in 0..n {
        s.capture_reading();
    }
    s
}

#[test]
fn seven_readings_paginate_into_three_pages() {
    let mut s = session_with_readings(7);
    assert_eq!(s.total_pages(), 3);
    assert_eq!(s.page_no(), 1);
    assert_eq!(s.current_page().len(), 3);

    assert!(s.goto_page(3));
    // Last page holds exactly one reading: the oldest capture (id 1).
    assert_eq!(s.current_page().len(), 1);
    assert_eq!(s.current_page()[0].id, 1);
}

#[test]
fn page_moves_outside_range_are_refused() {
    let mut s = session_with_readings(7);

    assert!(!s.prev_page());
    assert_eq!(s.page_no(), 1);

    assert!(s.next_page());
    assert!(s.next_page());
    assert!(!s.next_page());
    assert_eq!(s.page_no(), 3);

    assert!(!s.goto_page(0));
    assert!(!s.goto_page(4));
    assert_eq!(s.page_no(), 3);
}

#[test]
fn empty_log_has_no_pages_and_refuses_all_moves() {
    let mut s = session_with_readings(0);
    assert_eq!(s.total_pages(), 0);
    assert!(s.current_page().is_empty());
    assert!(!s.next_page());
    assert!(!s.prev_page());
    assert!(!s.goto_page(1));
}

#[test]
fn pages_reflect_new_captures_immediately() {
    let mut s = session_with_readings(3);
    assert_eq!(s.total_pages(), 1);

    let newest = s.capture_reading();
    assert_eq!(s.total_pages(), 2);
    // Page 1 now starts with the fresh capture; no caching across mutations.
    assert_eq!(s.current_page()[0].id, newest.id);
}

#[test]
fn pages_partition_the_log_exactly() {
    let mut s = session_with_readings(11);
    let mut seen = Vec::new();
    for p in 1..=s.total_pages() {
        assert!(s.goto_page(p));
        seen.extend(s.current_page().iter().map(|r| r.id));
    }
    let expected: Vec<u64> = s.readings().iter().map(|r| r.id).collect();
    assert_eq!(seen, expected);
}
