//! Measurement session: the single owner of all per-bench mutable state.
//!
//! Holds head/stage positions, the selected workpiece, the derived deviation,
//! the captured-reading log and its page cursor. Every mutation is a
//! synchronous response to one input event; the deviation is recomputed
//! before the call returns, so observers never see a stale readout.

use crate::calibration::{CalibrationSet, WorkpieceKind};
use crate::error::{BuildError, Result};
use crate::motion::{HeadState, HeadTravel, StageState, StageTravel};
use crate::pager;
use crate::readings::{Assessment, Reading, ReadingLog};
use crate::util::{format_um_as_mm, quantize_mm_to_um};

pub struct ComparatorSession {
    calibration: CalibrationSet,
    stage_travel: StageTravel,
    head_travel: HeadTravel,
    stage: StageState,
    head: HeadState,
    workpiece: WorkpieceKind,
    // Displayed deviation in µm; always the quantized table value except
    // right after a display reset.
    deviation_um: i32,
    standard_um: i32,
    tolerance_um: i32,
    log: ReadingLog,
    page_size: usize,
    // 1-based page cursor; stays at 1 while the log is empty.
    page_no: usize,
    next_reading_id: u64,
}

impl core::fmt::Debug for ComparatorSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComparatorSession")
            .field("workpiece", &self.workpiece)
            .field("stage_mm", &self.stage.lateral_mm())
            .field("head_mm", &self.head.vertical_mm())
            .field("deviation_um", &self.deviation_um)
            .field("readings", &self.log.len())
            .finish()
    }
}

impl ComparatorSession {
    /// Start building a session.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    // ── Input signals ───────────────────────────────────────────────────

    /// Select the workpiece on the stage; swaps the active calibration table.
    pub fn select_workpiece(&mut self, kind: WorkpieceKind) {
        self.workpiece = kind;
        self.recompute();
    }

    pub fn stage_left(&mut self) {
        self.stage.nudge_left(&self.stage_travel);
        self.recompute();
    }

    pub fn stage_right(&mut self) {
        self.stage.nudge_right(&self.stage_travel);
        self.recompute();
    }

    /// Continuous stage drag delta from the presentation layer.
    pub fn drag_stage(&mut self, delta_mm: f32) {
        self.stage.drag_by(delta_mm, &self.stage_travel);
        self.recompute();
    }

    pub fn head_up(&mut self) {
        self.head.nudge_up(&self.head_travel, self.stage.drop_mm());
        self.recompute();
    }

    pub fn head_down(&mut self) {
        self.head.nudge_down(&self.head_travel, self.stage.drop_mm());
        self.recompute();
    }

    /// Continuous head drag delta from the presentation layer.
    pub fn drag_head(&mut self, delta_mm: f32) {
        self.head.drag_by(delta_mm, &self.head_travel, self.stage.drop_mm());
        self.recompute();
    }

    /// Engage the locking screw: vertical head motion is rejected until
    /// `unlock_head`.
    pub fn lock_head(&mut self) {
        self.head.lock();
    }

    pub fn unlock_head(&mut self) {
        self.head.unlock();
    }

    /// Freeze the displayed deviation into the log.
    ///
    /// The captured values derive from the displayed (already rounded)
    /// deviation, not from a fresh table lookup: the student must be able to
    /// reproduce measured + deviation == standard from the readout digits.
    pub fn capture_reading(&mut self) -> Reading {
        let reading = Reading {
            id: self.next_reading_id,
            standard_um: self.standard_um,
            measured_um: self.standard_um - self.deviation_um,
            deviation_um: self.deviation_um,
        };
        self.next_reading_id += 1;
        self.log.prepend(reading);
        tracing::debug!(
            id = reading.id,
            deviation = %format_um_as_mm(reading.deviation_um),
            "reading captured"
        );
        reading
    }

    /// Drop the whole log and return the pager to the first page.
    pub fn clear_readings(&mut self) {
        self.log.clear();
        self.page_no = 1;
    }

    /// Check a reading against the tolerance limit.
    pub fn classify(&self, reading: &Reading) -> Assessment {
        reading.assess(self.tolerance_um)
    }

    /// Zero the readout without touching positions or the log. The next
    /// position- or selection-triggered recompute restores the true value;
    /// this mirrors the physical instrument's display-reset button, which
    /// does not move anything.
    pub fn reset_display(&mut self) {
        self.deviation_um = 0;
    }

    // ── Output signals ──────────────────────────────────────────────────

    /// Readout string, fixed 3-decimal millimetres.
    pub fn display_value(&self) -> String {
        format_um_as_mm(self.deviation_um)
    }

    pub fn deviation_um(&self) -> i32 {
        self.deviation_um
    }

    pub fn workpiece(&self) -> WorkpieceKind {
        self.workpiece
    }

    pub fn stage_mm(&self) -> f32 {
        self.stage.lateral_mm()
    }

    pub fn head_mm(&self) -> f32 {
        self.head.vertical_mm()
    }

    pub fn head_locked(&self) -> bool {
        self.head.is_locked()
    }

    pub fn standard_um(&self) -> i32 {
        self.standard_um
    }

    pub fn tolerance_um(&self) -> i32 {
        self.tolerance_um
    }

    pub fn readings(&self) -> &[Reading] {
        self.log.entries()
    }

    pub fn total_pages(&self) -> usize {
        pager::total_pages(self.log.len(), self.page_size)
    }

    pub fn page_no(&self) -> usize {
        self.page_no
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Readings on the current page, newest first.
    pub fn current_page(&self) -> &[Reading] {
        if self.log.is_empty() {
            return &[];
        }
        pager::page(self.log.entries(), self.page_size, self.page_no)
    }

    // ── Pagination cursor ───────────────────────────────────────────────

    /// Move to the next page; refused (returns false) past the last.
    pub fn next_page(&mut self) -> bool {
        if self.page_no < self.total_pages() {
            self.page_no += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous page; refused (returns false) before the first.
    pub fn prev_page(&mut self) -> bool {
        if self.page_no > 1 {
            self.page_no -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to page `n`; refused outside [1, total_pages].
    pub fn goto_page(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.total_pages() {
            self.page_no = n;
            true
        } else {
            false
        }
    }

    fn recompute(&mut self) {
        // The head height never enters the numeric lookup; only the stage's
        // lateral position selects a control point.
        self.deviation_um = self
            .calibration
            .deviation_um_at(self.workpiece, self.stage.lateral_mm());
        tracing::trace!(
            workpiece = self.workpiece.label(),
            stage_mm = self.stage.lateral_mm(),
            deviation_um = self.deviation_um,
            "deviation recomputed"
        );
    }
}

/// Builder for `ComparatorSession`. All fields are optional and validated on
/// `build()`; the defaults reproduce the stock trainer rig.
#[derive(Default)]
pub struct SessionBuilder {
    calibration: Option<CalibrationSet>,
    stage_travel: Option<StageTravel>,
    head_travel: Option<HeadTravel>,
    standard_mm: Option<f32>,
    tolerance_mm: Option<f32>,
    page_size: Option<usize>,
}

impl SessionBuilder {
    pub fn with_calibration(mut self, calibration: CalibrationSet) -> Self {
        self.calibration = Some(calibration);
        self
    }

    pub fn with_stage_travel(mut self, travel: StageTravel) -> Self {
        self.stage_travel = Some(travel);
        self
    }

    pub fn with_head_travel(mut self, travel: HeadTravel) -> Self {
        self.head_travel = Some(travel);
        self
    }

    /// Reference dimension of the standard workpiece, in mm.
    pub fn with_standard_mm(mut self, standard_mm: f32) -> Self {
        self.standard_mm = Some(standard_mm);
        self
    }

    /// Accept/reject threshold on |deviation|, in mm.
    pub fn with_tolerance_mm(mut self, tolerance_mm: f32) -> Self {
        self.tolerance_mm = Some(tolerance_mm);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn build(self) -> Result<ComparatorSession> {
        let calibration = self.calibration.unwrap_or_default();
        let stage_travel = self.stage_travel.unwrap_or_default();
        let head_travel = self.head_travel.unwrap_or_default();
        let standard_mm = self.standard_mm.unwrap_or(50.0);
        let tolerance_mm = self.tolerance_mm.unwrap_or(0.5);
        let page_size = self.page_size.unwrap_or(3);

        if !(stage_travel.travel_mm.is_finite() && stage_travel.travel_mm > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "stage travel must be > 0",
            )));
        }
        if !(stage_travel.step_mm.is_finite() && stage_travel.step_mm > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "stage step must be > 0",
            )));
        }
        if !head_travel.top_mm.is_finite() || !head_travel.clearance_mm.is_finite() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "head bounds must be finite",
            )));
        }
        if head_travel.bottom_mm(0.0) < head_travel.top_mm {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "head travel band is empty",
            )));
        }
        if !(head_travel.step_mm.is_finite() && head_travel.step_mm > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "head step must be > 0",
            )));
        }
        if !(standard_mm.is_finite() && standard_mm > 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "standard dimension must be > 0",
            )));
        }
        if !(tolerance_mm.is_finite() && tolerance_mm >= 0.0) {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "tolerance must be >= 0",
            )));
        }
        if page_size == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "page size must be >= 1",
            )));
        }

        let mut session = ComparatorSession {
            calibration,
            stage_travel,
            head_travel,
            stage: StageState::default(),
            head: HeadState::default(),
            workpiece: WorkpieceKind::Standard,
            deviation_um: 0,
            standard_um: quantize_mm_to_um(standard_mm),
            tolerance_um: quantize_mm_to_um(tolerance_mm),
            log: ReadingLog::default(),
            page_size,
            page_no: 1,
            next_reading_id: 1,
        };
        session.recompute();
        Ok(session)
    }
}
