//! Bounded-motion model for the stage and the measuring head.
//!
//! Two independent clamped accumulators. Both the discrete stepper buttons
//! and continuous drag deltas funnel into the same clamp, so equal net
//! displacement always converges to the same state. Out-of-range requests
//! saturate silently; there are no failure paths.

use crate::util::clamp_mm;

/// Lateral travel limits of the workpiece stage.
#[derive(Debug, Clone, Copy)]
pub struct StageTravel {
    /// Half-travel: lateral offset stays inside [-travel_mm, +travel_mm].
    pub travel_mm: f32,
    /// Displacement per stepper-button press.
    pub step_mm: f32,
}

impl Default for StageTravel {
    fn default() -> Self {
        Self {
            travel_mm: 55.0,
            step_mm: 10.0,
        }
    }
}

/// Vertical travel limits of the measuring head.
#[derive(Debug, Clone, Copy)]
pub struct HeadTravel {
    /// Uppermost position (negative = raised above the rest position).
    pub top_mm: f32,
    /// Fixed slack over the stage; the lower bound tracks the stage's
    /// vertical drop: bottom = clearance_mm - stage_drop_mm.
    pub clearance_mm: f32,
    /// Displacement per stepper-button press.
    pub step_mm: f32,
}

impl HeadTravel {
    #[inline]
    pub fn bottom_mm(&self, stage_drop_mm: f32) -> f32 {
        self.clearance_mm - stage_drop_mm
    }
}

impl Default for HeadTravel {
    fn default() -> Self {
        Self {
            top_mm: -150.0,
            clearance_mm: 120.0,
            step_mm: 10.0,
        }
    }
}

/// Workpiece stage position.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageState {
    lateral_mm: f32,
    /// Vertical drop of the stage. The drag axis is lateral only, so this
    /// stays 0 today, but the head's lower bound is still derived from it.
    drop_mm: f32,
}

impl StageState {
    pub fn lateral_mm(&self) -> f32 {
        self.lateral_mm
    }

    pub fn drop_mm(&self) -> f32 {
        self.drop_mm
    }

    pub fn nudge_left(&mut self, travel: &StageTravel) {
        self.drag_by(-travel.step_mm, travel);
    }

    pub fn nudge_right(&mut self, travel: &StageTravel) {
        self.drag_by(travel.step_mm, travel);
    }

    /// Apply a continuous lateral delta, then clamp.
    pub fn drag_by(&mut self, delta_mm: f32, travel: &StageTravel) {
        self.lateral_mm = clamp_mm(
            self.lateral_mm + delta_mm,
            -travel.travel_mm,
            travel.travel_mm,
        );
    }
}

/// Measuring-head position plus the locking-screw state.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadState {
    vertical_mm: f32,
    locked: bool,
}

impl HeadState {
    pub fn vertical_mm(&self) -> f32 {
        self.vertical_mm
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Engage the locking screw; vertical mutations are rejected until
    /// `unlock` is called.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn nudge_up(&mut self, travel: &HeadTravel, stage_drop_mm: f32) {
        self.drag_by(-travel.step_mm, travel, stage_drop_mm);
    }

    pub fn nudge_down(&mut self, travel: &HeadTravel, stage_drop_mm: f32) {
        self.drag_by(travel.step_mm, travel, stage_drop_mm);
    }

    /// Apply a continuous vertical delta, then clamp. A locked head ignores
    /// the delta but is still re-clamped: the lower bound may have moved with
    /// the stage since the lock was engaged.
    pub fn drag_by(&mut self, delta_mm: f32, travel: &HeadTravel, stage_drop_mm: f32) {
        let wanted = if self.locked {
            self.vertical_mm
        } else {
            self.vertical_mm + delta_mm
        };
        self.vertical_mm = clamp_mm(wanted, travel.top_mm, travel.bottom_mm(stage_drop_mm));
    }
}
