//! Discrete input signals from the presentation layer.
//!
//! The engine never sees pointers or widgets; hosts translate gestures and
//! button presses into these events and route them through `apply`.

use crate::calibration::WorkpieceKind;
use crate::session::ComparatorSession;
use crate::walkthrough::ProcedureGuide;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    StageLeft,
    StageRight,
    HeadUp,
    HeadDown,
    /// Continuous lateral drag delta, mm.
    DragStage(f32),
    /// Continuous vertical drag delta, mm.
    DragHead(f32),
    LockHead,
    UnlockHead,
    SelectWorkpiece(WorkpieceKind),
    CaptureReading,
    ClearReadings,
    ResetDisplay,
    AdvanceStep,
    RetreatStep,
    NextPage,
    PrevPage,
    GotoPage(usize),
}

/// Route one event to the session or the walkthrough. Page and walkthrough
/// moves outside their bounds are refused silently, like every other
/// saturating operation in the engine.
pub fn apply(session: &mut ComparatorSession, guide: &mut ProcedureGuide, event: InputEvent) {
    match event {
        InputEvent::StageLeft => session.stage_left(),
        InputEvent::StageRight => session.stage_right(),
        InputEvent::HeadUp => session.head_up(),
        InputEvent::HeadDown => session.head_down(),
        InputEvent::DragStage(delta_mm) => session.drag_stage(delta_mm),
        InputEvent::DragHead(delta_mm) => session.drag_head(delta_mm),
        InputEvent::LockHead => session.lock_head(),
        InputEvent::UnlockHead => session.unlock_head(),
        InputEvent::SelectWorkpiece(kind) => session.select_workpiece(kind),
        InputEvent::CaptureReading => {
            session.capture_reading();
        }
        InputEvent::ClearReadings => session.clear_readings(),
        InputEvent::ResetDisplay => session.reset_display(),
        InputEvent::AdvanceStep => guide.advance(),
        InputEvent::RetreatStep => guide.retreat(),
        InputEvent::NextPage => {
            session.next_page();
        }
        InputEvent::PrevPage => {
            session.prev_page();
        }
        InputEvent::GotoPage(n) => {
            session.goto_page(n);
        }
    }
}
