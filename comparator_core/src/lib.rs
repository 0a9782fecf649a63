#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Measurement simulation engine for an electrical-comparator trainer
//! (presentation-agnostic).
//!
//! Maps user-controlled degrees of freedom — measuring-head height, stage
//! lateral position, selected workpiece — to a simulated deviation readout,
//! and manages the bookkeeping around it. Hosts supply two primitive input
//! signals (button presses and numeric drag deltas) and render whatever the
//! accessors report; no widget types cross this boundary.
//!
//! ## Architecture
//!
//! - **Calibration**: nearest-neighbour lookup over per-workpiece control
//!   points (`calibration` module)
//! - **Motion**: clamped accumulators for stage and head (`motion`)
//! - **Session**: position state, derived deviation, reading log, page
//!   cursor (`session`)
//! - **Pager**: pure fixed-size slicing of the log (`pager`)
//! - **Tutorial**: one-shot timed advisory sequence with a cancellable
//!   runner (`notify`)
//! - **Walkthrough**: clamped cursor over instructional steps (`walkthrough`)
//!
//! ## Fixed-Point Arithmetic
//!
//! Deviations live in **micrometres** (µm, 1 µm = 0.001 mm) as `i32`, the
//! precision of the 3-decimal readout. Quantization happens once, at table
//! construction, so a captured reading reproduces the displayed digits
//! exactly: measured + deviation == standard with no float residue.

// Module declarations
pub mod calibration;
pub mod conversions;
pub mod error;
pub mod events;
pub mod mocks;
pub mod motion;
pub mod notify;
pub mod pager;
pub mod readings;
pub mod session;
pub mod util;
pub mod walkthrough;

pub use calibration::{CalibrationSet, CalibrationTable, ControlPoint, WorkpieceKind};
pub use events::InputEvent;
pub use motion::{HeadState, HeadTravel, StageState, StageTravel};
pub use notify::{TutorialNotifier, TutorialSequence, TutorialStep};
pub use readings::{Assessment, Reading, ReadingLog};
pub use session::{ComparatorSession, SessionBuilder};
pub use walkthrough::ProcedureGuide;
