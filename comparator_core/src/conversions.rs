//! `From`/`TryFrom` implementations bridging `comparator_config` types to
//! `comparator_core` types.
//!
//! These keep the field-by-field mapping out of the CLI.

use crate::calibration::{CalibrationSet, CalibrationTable, WorkpieceKind};
use crate::motion::{HeadTravel, StageTravel};
use crate::notify::{TutorialSequence, TutorialStep};
use crate::walkthrough::ProcedureGuide;

// ── StageTravel ──────────────────────────────────────────────────────────────

impl From<&comparator_config::StageCfg> for StageTravel {
    fn from(c: &comparator_config::StageCfg) -> Self {
        Self {
            travel_mm: c.travel_mm,
            step_mm: c.step_mm,
        }
    }
}

// ── HeadTravel ───────────────────────────────────────────────────────────────

impl From<&comparator_config::HeadCfg> for HeadTravel {
    fn from(c: &comparator_config::HeadCfg) -> Self {
        Self {
            top_mm: c.top_mm,
            clearance_mm: c.clearance_mm,
            step_mm: c.step_mm,
        }
    }
}

// ── WorkpieceKind ────────────────────────────────────────────────────────────

impl From<comparator_config::WorkpieceId> for WorkpieceKind {
    fn from(id: comparator_config::WorkpieceId) -> Self {
        match id {
            comparator_config::WorkpieceId::Standard => WorkpieceKind::Standard,
            comparator_config::WorkpieceId::Wp2 => WorkpieceKind::Wp2,
            comparator_config::WorkpieceId::Wp3 => WorkpieceKind::Wp3,
        }
    }
}

// ── CalibrationSet ───────────────────────────────────────────────────────────

/// Stock tables overlaid with the config's `[[workpiece]]` blocks.
impl TryFrom<&comparator_config::Config> for CalibrationSet {
    type Error = eyre::Report;

    fn try_from(cfg: &comparator_config::Config) -> Result<Self, Self::Error> {
        let mut set = CalibrationSet::default();
        for wp in &cfg.workpieces {
            let table = CalibrationTable::from_points_mm(&wp.points)?;
            set.set_table(wp.kind.into(), table);
        }
        Ok(set)
    }
}

// ── TutorialSequence ─────────────────────────────────────────────────────────

impl From<&comparator_config::TutorialStepCfg> for TutorialStep {
    fn from(c: &comparator_config::TutorialStepCfg) -> Self {
        Self {
            message: c.message.clone(),
            anchor: c.anchor.clone(),
        }
    }
}

impl TryFrom<&comparator_config::TutorialCfg> for TutorialSequence {
    type Error = eyre::Report;

    fn try_from(c: &comparator_config::TutorialCfg) -> Result<Self, Self::Error> {
        TutorialSequence::new(c.steps.iter().map(TutorialStep::from).collect(), c.dwell_ms)
    }
}

// ── ProcedureGuide ───────────────────────────────────────────────────────────

impl TryFrom<&comparator_config::ProcedureCfg> for ProcedureGuide {
    type Error = eyre::Report;

    fn try_from(c: &comparator_config::ProcedureCfg) -> Result<Self, Self::Error> {
        ProcedureGuide::new(c.steps.clone())
    }
}
