//! One-shot tutorial notification sequencer.
//!
//! At session start a fixed list of advisory messages runs once, each
//! pointing at a named control and dwelling a fixed time before the next
//! replaces it. `TutorialSequence` is the pure timeline (index = elapsed /
//! dwell); `TutorialNotifier` drives it on a background thread that owns the
//! dwell timer, checks anchor liveness before publishing a step, and shuts
//! down promptly when cancelled or dropped, so a torn-down host never
//! receives a pointer to a control that no longer exists.

use crossbeam_channel as xch;
use comparator_traits::AnchorProbe;
use comparator_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::{BuildError, Result};

/// One advisory message and the control anchor it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialStep {
    pub message: String,
    pub anchor: String,
}

/// The fixed, time-indexed advisory timeline. Step `i` is active while
/// elapsed time is inside [i*dwell, (i+1)*dwell); past the last slot the
/// sequence is finished and nothing is active again.
#[derive(Debug, Clone)]
pub struct TutorialSequence {
    steps: Vec<TutorialStep>,
    dwell_ms: u64,
}

impl TutorialSequence {
    pub fn new(steps: Vec<TutorialStep>, dwell_ms: u64) -> Result<Self> {
        if dwell_ms == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "tutorial dwell must be >= 1 ms",
            )));
        }
        Ok(Self { steps, dwell_ms })
    }

    pub fn steps(&self) -> &[TutorialStep] {
        &self.steps
    }

    pub fn dwell_ms(&self) -> u64 {
        self.dwell_ms
    }

    pub fn step_index_at(&self, elapsed_ms: u64) -> Option<usize> {
        let idx = (elapsed_ms / self.dwell_ms) as usize;
        (idx < self.steps.len()).then_some(idx)
    }

    pub fn active_at(&self, elapsed_ms: u64) -> Option<&TutorialStep> {
        self.step_index_at(elapsed_ms).map(|i| &self.steps[i])
    }

    pub fn is_finished_at(&self, elapsed_ms: u64) -> bool {
        self.step_index_at(elapsed_ms).is_none()
    }
}

/// What the runner thread publishes for each timeline slot.
#[derive(Debug, Clone)]
enum Update {
    Show(TutorialStep),
    /// Anchor was gone; the slot elapses with nothing on screen.
    Blank,
    /// Past the last slot; nothing will ever be active again.
    Finished,
}

/// Background runner for a `TutorialSequence`.
///
/// Spawns exactly one thread that walks the timeline with the provided
/// clock. Each slot publishes either the step (anchor alive) or a blank
/// (anchor dead, skipped silently); after the last slot a terminal marker is
/// published. The thread is signalled and joined on drop, so no dwell timer
/// outlives the host.
pub struct TutorialNotifier {
    rx: xch::Receiver<Update>,
    active: Option<TutorialStep>,
    finished: bool,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl TutorialNotifier {
    pub fn spawn<C, P>(sequence: TutorialSequence, probe: P, clock: C) -> Self
    where
        C: Clock + Send + Sync + 'static,
        P: AnchorProbe + Send + Sync + 'static,
    {
        let (tx, rx) = xch::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_thread = shutdown.clone();
        let dwell_ms = sequence.dwell_ms;

        let join_handle = std::thread::spawn(move || {
            for step in sequence.steps {
                if shutdown_thread.load(Ordering::Relaxed) {
                    tracing::debug!("tutorial thread received shutdown signal");
                    return;
                }
                let update = if probe.is_live(&step.anchor) {
                    Update::Show(step)
                } else {
                    tracing::debug!(anchor = %step.anchor, "skipping tutorial step, anchor gone");
                    Update::Blank
                };
                // If send fails, consumer is gone; exit gracefully
                if tx.send(update).is_err() {
                    tracing::debug!("tutorial consumer disconnected, exiting thread");
                    return;
                }
                if !sliced_sleep(&clock, dwell_ms, &shutdown_thread) {
                    return;
                }
            }
            let _ = tx.send(Update::Finished);
            tracing::trace!("tutorial thread finished sequence");
        });

        Self {
            rx,
            active: None,
            finished: false,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Drain published updates and return the currently active step, if any.
    pub fn active(&mut self) -> Option<&TutorialStep> {
        for update in self.rx.try_iter() {
            match update {
                Update::Show(step) => self.active = Some(step),
                Update::Blank => self.active = None,
                Update::Finished => {
                    self.active = None;
                    self.finished = true;
                }
            }
        }
        self.active.as_ref()
    }

    /// True once the sequence has run out (as of the last `active` poll).
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Abort the remaining sequence. Idempotent; `drop` calls it too.
    pub fn cancel(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for TutorialNotifier {
    fn drop(&mut self) {
        self.cancel();
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("tutorial thread joined successfully");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "tutorial thread panicked during shutdown");
                }
            }
        }
    }
}

/// Sleep `total_ms` in small slices, bailing out between slices when the
/// shutdown flag is raised. Returns false when interrupted.
fn sliced_sleep<C: Clock>(clock: &C, total_ms: u64, shutdown: &AtomicBool) -> bool {
    const SLICE_MS: u64 = 25;
    let mut remaining = total_ms;
    while remaining > 0 {
        if shutdown.load(Ordering::Relaxed) {
            return false;
        }
        let chunk = remaining.min(SLICE_MS);
        clock.sleep(Duration::from_millis(chunk));
        remaining -= chunk;
    }
    !shutdown.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(n: usize, dwell_ms: u64) -> TutorialSequence {
        let steps = (0..n)
            .map(|i| TutorialStep {
                message: format!("msg {i}"),
                anchor: format!("anchor-{i}"),
            })
            .collect();
        TutorialSequence::new(steps, dwell_ms).unwrap()
    }

    #[test]
    fn rejects_zero_dwell() {
        assert!(TutorialSequence::new(Vec::new(), 0).is_err());
    }

    #[test]
    fn first_step_is_active_immediately() {
        let seq = sequence(3, 3_000);
        assert_eq!(seq.active_at(0).unwrap().message, "msg 0");
    }

    #[test]
    fn steps_advance_per_dwell_window() {
        let seq = sequence(3, 3_000);
        assert_eq!(seq.step_index_at(2_999), Some(0));
        assert_eq!(seq.step_index_at(3_000), Some(1));
        assert_eq!(seq.step_index_at(8_999), Some(2));
        assert_eq!(seq.step_index_at(9_000), None);
        assert!(seq.is_finished_at(9_000));
    }

    #[test]
    fn empty_sequence_is_finished_from_the_start() {
        let seq = sequence(0, 3_000);
        assert!(seq.is_finished_at(0));
        assert!(seq.active_at(0).is_none());
    }
}
