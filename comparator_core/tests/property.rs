use comparator_core::{
    CalibrationSet, CalibrationTable, ComparatorSession, WorkpieceKind,
    pager,
};
use proptest::prelude::*;

prop_compose! {
    fn drag_sequence()(
        deltas in prop::collection::vec(-80.0f32..80.0, 1..60)
    ) -> Vec<f32> {
        deltas
    }
}

proptest! {
    #[test]
    fn stage_never_escapes_travel_band(deltas in drag_sequence()) {
        let mut s = ComparatorSession::builder().build().unwrap();
        for d in deltas {
            s.drag_stage(d);
            prop_assert!((-55.0..=55.0).contains(&s.stage_mm()));
        }
        // Re-applying a zero delta must not move an already-clamped value.
        let settled = s.stage_mm();
        s.drag_stage(0.0);
        prop_assert_eq!(s.stage_mm(), settled);
    }

    #[test]
    fn head_never_escapes_travel_band(deltas in drag_sequence()) {
        let mut s = ComparatorSession::builder().build().unwrap();
        for d in deltas {
            s.drag_head(d);
            prop_assert!((-150.0..=120.0).contains(&s.head_mm()));
        }
        let settled = s.head_mm();
        s.drag_head(0.0);
        prop_assert_eq!(s.head_mm(), settled);
    }

    #[test]
    fn lookup_always_returns_a_control_point_value(pos in -200.0f32..200.0) {
        let set = CalibrationSet::default();
        for kind in WorkpieceKind::ALL {
            let dev = set.deviation_um_at(kind, pos);
            let values: Vec<i32> = set
                .table(kind)
                .points()
                .iter()
                .map(|p| p.deviation_um)
                .collect();
            prop_assert!(values.contains(&dev));
        }
    }

    #[test]
    fn lookup_picks_a_point_at_minimal_distance(pos in -200.0f32..200.0) {
        let table = CalibrationSet::default();
        let points = table.table(WorkpieceKind::Wp3).points();
        let dev = table.deviation_um_at(WorkpieceKind::Wp3, pos);
        let min_dist = points
            .iter()
            .map(|p| (pos - p.position_mm).abs())
            .fold(f32::INFINITY, f32::min);
        let chosen_dist = points
            .iter()
            .filter(|p| p.deviation_um == dev)
            .map(|p| (pos - p.position_mm).abs())
            .fold(f32::INFINITY, f32::min);
        prop_assert_eq!(chosen_dist, min_dist);
    }

    #[test]
    fn captures_balance_exactly(positions in prop::collection::vec(-60.0f32..60.0, 1..20)) {
        let mut s = ComparatorSession::builder().build().unwrap();
        s.select_workpiece(WorkpieceKind::Wp3);
        for pos in positions {
            s.drag_stage(pos - s.stage_mm());
            let r = s.capture_reading();
            prop_assert_eq!(r.measured_um + r.deviation_um, r.standard_um);
        }
    }

    #[test]
    fn pager_partitions_any_log(len in 0usize..40, page_size in 1usize..7) {
        let items: Vec<usize> = (0..len).collect();
        let total = pager::total_pages(len, page_size);
        prop_assert_eq!(total, len.div_ceil(page_size));
        let mut seen = Vec::new();
        for p in 1..=total {
            let slice = pager::page(&items, page_size, p);
            prop_assert!(!slice.is_empty());
            prop_assert!(slice.len() <= page_size);
            seen.extend_from_slice(slice);
        }
        prop_assert_eq!(seen, items);
    }

    #[test]
    fn single_point_tables_are_constant_functions(
        point_pos in -100.0f32..100.0,
        dev_mm in -0.9f32..0.9,
        probe in -500.0f32..500.0,
    ) {
        let table = CalibrationTable::from_points_mm(&[(point_pos, dev_mm)]).unwrap();
        let expected = (dev_mm * 1000.0).round() as i32;
        prop_assert_eq!(table.deviation_um_at(probe), expected);
    }
}
