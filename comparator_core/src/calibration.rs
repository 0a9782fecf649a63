//! Simulated instrument response: per-workpiece calibration tables.
//!
//! Each non-standard workpiece carries a fixed set of (position, deviation)
//! control points. The lookup is nearest-neighbour over those points and
//! deliberately a step function: precision improves only with more points,
//! never by interpolating between them.

use crate::error::{BuildError, Result};
use crate::util::quantize_mm_to_um;

/// Which workpiece sits on the stage. Selecting one swaps the active
/// calibration table and the display label/tint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkpieceKind {
    /// The standard reference block; the comparator is zeroed on it.
    #[default]
    Standard,
    Wp2,
    Wp3,
}

impl WorkpieceKind {
    pub const ALL: [WorkpieceKind; 3] =
        [WorkpieceKind::Standard, WorkpieceKind::Wp2, WorkpieceKind::Wp3];

    pub fn label(self) -> &'static str {
        match self {
            WorkpieceKind::Standard => "STD WP",
            WorkpieceKind::Wp2 => "WP 2",
            WorkpieceKind::Wp3 => "WP 3",
        }
    }

    /// Display tint used by the presentation layer.
    pub fn tint(self) -> &'static str {
        match self {
            WorkpieceKind::Standard => "#ccc",
            WorkpieceKind::Wp2 => "#a5d6a7",
            WorkpieceKind::Wp3 => "#90caf9",
        }
    }
}

/// One sample of a workpiece's simulated response curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub position_mm: f32,
    /// Deviation at this position, pre-quantized to micrometres so every
    /// lookup result is already in display precision.
    pub deviation_um: i32,
}

/// Ordered control points for one workpiece, sorted by position.
#[derive(Debug, Clone)]
pub struct CalibrationTable {
    points: Vec<ControlPoint>,
}

impl CalibrationTable {
    /// Build a table from (position_mm, deviation_mm) pairs. Positions must
    /// be finite and strictly increasing; at least one point is required so
    /// the lookup is total.
    pub fn from_points_mm(points: &[(f32, f32)]) -> Result<Self> {
        if points.is_empty() {
            return Err(eyre::Report::new(BuildError::EmptyCalibration));
        }
        for (pos, dev) in points {
            if !pos.is_finite() || !dev.is_finite() {
                return Err(eyre::Report::new(BuildError::NonFinitePoint));
            }
        }
        for i in 1..points.len() {
            if points[i].0 <= points[i - 1].0 {
                return Err(eyre::Report::new(BuildError::UnsortedCalibration));
            }
        }
        Ok(Self {
            points: points
                .iter()
                .map(|&(pos, dev)| ControlPoint {
                    position_mm: pos,
                    deviation_um: quantize_mm_to_um(dev),
                })
                .collect(),
        })
    }

    /// A single all-zero control point: deviation 0 at every position.
    pub fn flat() -> Self {
        Self {
            points: vec![ControlPoint {
                position_mm: 0.0,
                deviation_um: 0,
            }],
        }
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Deviation of the control point nearest to `lateral_mm`, in µm.
    ///
    /// Strict `<` comparison keeps the first (lowest-index) point on ties.
    /// Total over all inputs: a NaN position compares false everywhere and
    /// falls back to the first point.
    pub fn deviation_um_at(&self, lateral_mm: f32) -> i32 {
        let mut best = &self.points[0];
        let mut best_dist = (lateral_mm - best.position_mm).abs();
        for p in &self.points[1..] {
            let dist = (lateral_mm - p.position_mm).abs();
            if dist < best_dist {
                best = p;
                best_dist = dist;
            }
        }
        best.deviation_um
    }
}

/// Process-wide immutable calibration data: one table per workpiece, shared
/// read-only by every session.
#[derive(Debug, Clone)]
pub struct CalibrationSet {
    standard: CalibrationTable,
    wp2: CalibrationTable,
    wp3: CalibrationTable,
}

impl CalibrationSet {
    pub fn new(
        standard: CalibrationTable,
        wp2: CalibrationTable,
        wp3: CalibrationTable,
    ) -> Self {
        Self { standard, wp2, wp3 }
    }

    pub fn table(&self, kind: WorkpieceKind) -> &CalibrationTable {
        match kind {
            WorkpieceKind::Standard => &self.standard,
            WorkpieceKind::Wp2 => &self.wp2,
            WorkpieceKind::Wp3 => &self.wp3,
        }
    }

    /// Replace one workpiece's table, e.g. with a profile loaded from CSV.
    pub fn set_table(&mut self, kind: WorkpieceKind, table: CalibrationTable) {
        match kind {
            WorkpieceKind::Standard => self.standard = table,
            WorkpieceKind::Wp2 => self.wp2 = table,
            WorkpieceKind::Wp3 => self.wp3 = table,
        }
    }

    pub fn deviation_um_at(&self, kind: WorkpieceKind, lateral_mm: f32) -> i32 {
        self.table(kind).deviation_um_at(lateral_mm)
    }
}

impl Default for CalibrationSet {
    /// The stock trainer curves.
    fn default() -> Self {
        let wp2 = CalibrationTable::from_points_mm(&[
            (-30.0, 0.121),
            (0.0, 0.0),
            (10.0, 0.311),
            (30.0, 0.489),
        ]);
        let wp3 = CalibrationTable::from_points_mm(&[
            (-45.0, 0.4),
            (-20.0, 0.521),
            (0.0, 0.0),
            (20.0, 0.55),
            (47.0, 0.6),
        ]);
        // The stock point sets are compile-time constants; both are non-empty
        // and sorted, so the fallback never actually triggers.
        Self {
            standard: CalibrationTable::flat(),
            wp2: wp2.unwrap_or_else(|_| CalibrationTable::flat()),
            wp3: wp3.unwrap_or_else(|_| CalibrationTable::flat()),
        }
    }
}
