//! Bench assembly and the scripted simulation loop.

use comparator_config::{Config, ProfileRow};
use comparator_core::error::Result as CoreResult;
use comparator_core::mocks::AlwaysLive;
use comparator_core::{
    Assessment, CalibrationSet, CalibrationTable, ComparatorSession, InputEvent, ProcedureGuide,
    TutorialNotifier, TutorialSequence, WorkpieceKind, events,
};
use comparator_traits::clock::MonotonicClock;
use eyre::WrapErr;
use serde_json::json;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Assemble the full bench from config: session, walkthrough, tutorial.
/// An optional profile CSV replaces the WP 2 response curve.
pub fn build_bench(
    cfg: &Config,
    profile: Option<&[ProfileRow]>,
) -> CoreResult<(ComparatorSession, ProcedureGuide, TutorialSequence)> {
    let mut calibration = CalibrationSet::try_from(cfg)?;
    if let Some(rows) = profile {
        let points: Vec<(f32, f32)> = rows
            .iter()
            .map(|r| (r.position_mm, r.deviation_mm))
            .collect();
        calibration.set_table(WorkpieceKind::Wp2, CalibrationTable::from_points_mm(&points)?);
        tracing::info!(points = points.len(), "WP 2 profile loaded from CSV");
    }

    let session = ComparatorSession::builder()
        .with_calibration(calibration)
        .with_stage_travel((&cfg.stage).into())
        .with_head_travel((&cfg.head).into())
        .with_standard_mm(cfg.gauge.standard_mm)
        .with_tolerance_mm(cfg.gauge.tolerance_mm)
        .with_page_size(cfg.readings.page_size)
        .build()?;
    let guide = ProcedureGuide::try_from(&cfg.procedure)?;
    let tutorial = TutorialSequence::try_from(&cfg.tutorial)?;
    Ok((session, guide, tutorial))
}

/// Parse one script line into an input event. Lines are lowercase commands
/// with at most one argument.
pub fn parse_event(line: &str) -> Option<InputEvent> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next()?;
    let arg = parts.next();
    // A trailing token nobody consumes is a malformed command.
    if parts.next().is_some() {
        return None;
    }
    match (cmd, arg) {
        ("left", None) => Some(InputEvent::StageLeft),
        ("right", None) => Some(InputEvent::StageRight),
        ("up", None) => Some(InputEvent::HeadUp),
        ("down", None) => Some(InputEvent::HeadDown),
        ("drag-stage", Some(v)) => v.parse().ok().map(InputEvent::DragStage),
        ("drag-head", Some(v)) => v.parse().ok().map(InputEvent::DragHead),
        ("lock", None) => Some(InputEvent::LockHead),
        ("unlock", None) => Some(InputEvent::UnlockHead),
        ("select", Some("std" | "standard")) => {
            Some(InputEvent::SelectWorkpiece(WorkpieceKind::Standard))
        }
        ("select", Some("wp2")) => Some(InputEvent::SelectWorkpiece(WorkpieceKind::Wp2)),
        ("select", Some("wp3")) => Some(InputEvent::SelectWorkpiece(WorkpieceKind::Wp3)),
        ("capture", None) => Some(InputEvent::CaptureReading),
        ("clear", None) => Some(InputEvent::ClearReadings),
        ("reset", None) => Some(InputEvent::ResetDisplay),
        ("next-step", None) => Some(InputEvent::AdvanceStep),
        ("prev-step", None) => Some(InputEvent::RetreatStep),
        ("next-page", None) => Some(InputEvent::NextPage),
        ("prev-page", None) => Some(InputEvent::PrevPage),
        ("page", Some(n)) => n.parse().ok().map(InputEvent::GotoPage),
        _ => None,
    }
}

/// Run the event script against a fresh bench, printing a readout frame
/// after every applied event.
pub fn run_simulate(
    cfg: &Config,
    profile: Option<&[ProfileRow]>,
    script: Option<PathBuf>,
    tutorial: bool,
    json: bool,
    shutdown: Arc<AtomicBool>,
) -> CoreResult<()> {
    let (mut session, mut guide, sequence) = build_bench(cfg, profile)?;
    let mut notifier = tutorial
        .then(|| TutorialNotifier::spawn(sequence, AlwaysLive, MonotonicClock::new()));

    let reader: Box<dyn BufRead> = match &script {
        Some(path) => Box::new(std::io::BufReader::new(
            std::fs::File::open(path).wrap_err_with(|| format!("open script {path:?}"))?,
        )),
        None => Box::new(std::io::BufReader::new(std::io::stdin())),
    };

    tracing::info!(
        script = ?script,
        tutorial,
        "simulation start"
    );

    for line in reader.lines() {
        if shutdown.load(Ordering::SeqCst) {
            tracing::info!("interrupted, stopping simulation");
            break;
        }
        let line = line.wrap_err("read script line")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_event(line) {
            Some(event) => {
                events::apply(&mut session, &mut guide, event);
                print_frame(&session, &guide, notifier.as_mut(), json);
            }
            None => tracing::warn!(command = line, "unrecognized command, skipping"),
        }
    }

    print_summary(&session, json);
    Ok(())
}

fn print_frame(
    session: &ComparatorSession,
    guide: &ProcedureGuide,
    notifier: Option<&mut TutorialNotifier>,
    json: bool,
) {
    let hint = notifier.and_then(|n| n.active().map(|s| s.message.clone()));
    let (step_no, steps_total) = guide.position();
    if json {
        let readings: Vec<serde_json::Value> = session
            .current_page()
            .iter()
            .map(|r| {
                json!({
                    "standard": r.standard_display(),
                    "measured": r.measured_display(),
                    "deviation": r.deviation_display(),
                    "assessment": session.classify(r).label(),
                })
            })
            .collect();
        let frame = json!({
            "display": session.display_value(),
            "unit": "mm",
            "workpiece": session.workpiece().label(),
            "stage_mm": session.stage_mm(),
            "head_mm": session.head_mm(),
            "head_locked": session.head_locked(),
            "page": { "current": session.page_no(), "total": session.total_pages() },
            "readings": readings,
            "procedure": { "step": step_no, "total": steps_total, "text": guide.current() },
            "tutorial": hint,
        });
        println!("{frame}");
        return;
    }

    println!(
        "readout {} mm  {}  stage {:+.1}  head {:+.1}{}",
        session.display_value(),
        session.workpiece().label(),
        session.stage_mm(),
        session.head_mm(),
        if session.head_locked() { "  [locked]" } else { "" }
    );
    let page = session.current_page();
    if !page.is_empty() {
        for r in page {
            println!(
                "  #{:<4} std {}  meas {}  dev {}  {}",
                r.id,
                r.standard_display(),
                r.measured_display(),
                r.deviation_display(),
                session.classify(r).label()
            );
        }
        println!("  page {} of {}", session.page_no(), session.total_pages());
    }
    println!("  step {step_no} of {steps_total}: {}", guide.current());
    if let Some(msg) = hint {
        println!("  hint: {msg}");
    }
}

fn print_summary(session: &ComparatorSession, json: bool) {
    let total = session.readings().len();
    let rejected = session
        .readings()
        .iter()
        .filter(|r| session.classify(r) == Assessment::Rejected)
        .count();
    let accepted = total - rejected;
    if json {
        println!(
            "{}",
            json!({ "summary": { "readings": total, "accepted": accepted, "rejected": rejected } })
        );
    } else {
        println!("captured {total} readings: {accepted} accepted, {rejected} rejected");
    }
}

/// Exercise the engine against its stock behaviour; any mismatch is an error.
/// Runs on the stock bench regardless of config overrides so the expected
/// numbers are fixed.
pub fn run_self_check(json: bool) -> CoreResult<()> {
    let mut session = ComparatorSession::builder().build()?;

    // Non-linear workpiece snaps to the nearest control point.
    session.select_workpiece(WorkpieceKind::Wp2);
    session.drag_stage(31.0);
    eyre::ensure!(
        session.display_value() == "0.489",
        "wp2 lookup: expected 0.489, got {}",
        session.display_value()
    );

    // The standard block reads zero wherever the stage sits.
    session.select_workpiece(WorkpieceKind::Standard);
    session.drag_stage(-70.0);
    eyre::ensure!(
        session.display_value() == "0.000",
        "standard lookup: expected 0.000, got {}",
        session.display_value()
    );

    // Tolerance splits captures at |0.5| mm.
    session.select_workpiece(WorkpieceKind::Wp3);
    session.drag_stage(47.0 - session.stage_mm());
    let out_of_band = session.capture_reading();
    eyre::ensure!(
        session.classify(&out_of_band) == Assessment::Rejected,
        "0.600 deviation should be rejected"
    );
    session.drag_stage(-45.0 - session.stage_mm());
    let in_band = session.capture_reading();
    eyre::ensure!(
        session.classify(&in_band) == Assessment::Accepted,
        "0.400 deviation should be accepted"
    );

    // Pagination: 7 readings at page size 3 -> 3 pages, last page holds 1.
    session.clear_readings();
    for _ in 0..7 {
        session.capture_reading();
    }
    eyre::ensure!(session.total_pages() == 3, "expected 3 pages of readings");
    eyre::ensure!(session.goto_page(3), "page 3 should be reachable");
    eyre::ensure!(
        session.current_page().len() == 1,
        "last page should hold exactly one reading"
    );

    // Display reset is transient and leaves the physics alone.
    session.select_workpiece(WorkpieceKind::Wp2);
    session.drag_stage(31.0 - session.stage_mm());
    session.reset_display();
    eyre::ensure!(session.display_value() == "0.000", "reset should zero the readout");
    eyre::ensure!(session.stage_mm() == 31.0, "reset must not move the stage");
    session.drag_stage(0.0);
    eyre::ensure!(
        session.display_value() == "0.489",
        "recompute should restore the true deviation"
    );

    // Tutorial timeline: fixed dwell, one-shot, terminal idle.
    let sequence = TutorialSequence::try_from(&Config::default().tutorial)?;
    eyre::ensure!(
        sequence.active_at(0).is_some(),
        "first tutorial step should be active at t=0"
    );
    let end_ms = sequence.dwell_ms() * sequence.steps().len() as u64;
    eyre::ensure!(
        sequence.is_finished_at(end_ms),
        "tutorial should be idle after the last dwell"
    );

    if json {
        println!("{}", json!({ "self_check": "ok" }));
    } else {
        println!("self-check: ok");
    }
    Ok(())
}
