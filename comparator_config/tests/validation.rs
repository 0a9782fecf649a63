use comparator_config::load_toml;

#[test]
fn empty_config_uses_stock_rig_defaults() {
    let cfg = load_toml("").expect("parse empty TOML");
    cfg.validate().expect("defaults should validate");

    assert_eq!(cfg.stage.travel_mm, 55.0);
    assert_eq!(cfg.stage.step_mm, 10.0);
    assert_eq!(cfg.head.top_mm, -150.0);
    assert_eq!(cfg.head.clearance_mm, 120.0);
    assert_eq!(cfg.gauge.standard_mm, 50.0);
    assert_eq!(cfg.gauge.tolerance_mm, 0.5);
    assert_eq!(cfg.readings.page_size, 3);
    assert_eq!(cfg.tutorial.dwell_ms, 3_000);
    assert_eq!(cfg.tutorial.steps.len(), 5);
    assert_eq!(cfg.procedure.steps.len(), 9);
}

#[test]
fn rejects_zero_page_size() {
    let toml = r#"
[readings]
page_size = 0
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject page_size=0");
    assert!(format!("{err}").contains("page_size must be >= 1"));
}

#[test]
fn rejects_zero_tutorial_dwell() {
    let toml = r#"
[tutorial]
dwell_ms = 0
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject dwell_ms=0");
    assert!(format!("{err}").contains("dwell_ms must be >= 1"));
}

#[test]
fn rejects_inverted_head_band() {
    let toml = r#"
[head]
top_mm = 200.0
clearance_mm = 120.0
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject empty travel band");
    assert!(format!("{err}").contains("clearance_mm must be >= head.top_mm"));
}

#[test]
fn rejects_negative_tolerance() {
    let toml = r#"
[gauge]
tolerance_mm = -0.1
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject negative tolerance");
    assert!(format!("{err}").contains("tolerance_mm"));
}

#[test]
fn accepts_workpiece_override_as_pairs() {
    let toml = r#"
[[workpiece]]
kind = "wp2"
points = [[-30.0, 0.121], [0.0, 0.0], [10.0, 0.311], [30.0, 0.489]]
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("pair-style points should validate");
    assert_eq!(cfg.workpieces.len(), 1);
    assert_eq!(cfg.workpieces[0].points.len(), 4);
}

#[test]
fn accepts_workpiece_override_as_tables() {
    let toml = r#"
[[workpiece]]
kind = "wp3"
points = [
    { position_mm = -45.0, deviation_mm = 0.4 },
    { position_mm = 0.0, deviation_mm = 0.0 },
    { position_mm = 47.0, deviation_mm = 0.6 },
]
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("table-style points should validate");
    assert_eq!(cfg.workpieces[0].points[2], (47.0, 0.6));
}

#[test]
fn rejects_unsorted_workpiece_points() {
    let toml = r#"
[[workpiece]]
kind = "wp2"
points = [[10.0, 0.1], [-10.0, 0.2]]
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject unsorted points");
    assert!(format!("{err}").contains("strictly increasing"));
}

#[test]
fn rejects_nonzero_standard_override() {
    let toml = r#"
[[workpiece]]
kind = "standard"
points = [[0.0, 0.25]]
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("standard table must stay at zero");
    assert!(format!("{err}").contains("standard"));
}
