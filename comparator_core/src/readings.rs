//! Captured readings and their accept/reject assessment.

use crate::util::format_um_as_mm;

/// Outcome of checking one reading against the tolerance limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    Accepted,
    Rejected,
}

impl Assessment {
    pub fn label(self) -> &'static str {
        match self {
            Assessment::Accepted => "Accepted",
            Assessment::Rejected => "Rejected",
        }
    }
}

/// One captured measurement. All values are integer micrometres frozen at
/// capture time from the displayed (already rounded) deviation, so
/// measured + deviation == standard holds exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    /// Session-local monotonic id.
    pub id: u64,
    pub standard_um: i32,
    pub measured_um: i32,
    pub deviation_um: i32,
}

impl Reading {
    /// Rejected iff the absolute deviation exceeds the tolerance.
    pub fn assess(&self, tolerance_um: i32) -> Assessment {
        if self.deviation_um.unsigned_abs() > tolerance_um.unsigned_abs() {
            Assessment::Rejected
        } else {
            Assessment::Accepted
        }
    }

    pub fn standard_display(&self) -> String {
        format_um_as_mm(self.standard_um)
    }

    pub fn measured_display(&self) -> String {
        format_um_as_mm(self.measured_um)
    }

    pub fn deviation_display(&self) -> String {
        format_um_as_mm(self.deviation_um)
    }
}

/// Append-only log of readings, newest first. The only removal is wholesale.
#[derive(Debug, Clone, Default)]
pub struct ReadingLog {
    entries: Vec<Reading>,
}

impl ReadingLog {
    /// Prepend a reading so the most recent capture lists first.
    pub fn prepend(&mut self, reading: Reading) {
        self.entries.insert(0, reading);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Reading] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(id: u64, deviation_um: i32) -> Reading {
        Reading {
            id,
            standard_um: 50_000,
            measured_um: 50_000 - deviation_um,
            deviation_um,
        }
    }

    #[test]
    fn assessment_is_symmetric_around_zero() {
        assert_eq!(reading(1, 600).assess(500), Assessment::Rejected);
        assert_eq!(reading(2, -600).assess(500), Assessment::Rejected);
        assert_eq!(reading(3, 300).assess(500), Assessment::Accepted);
        assert_eq!(reading(4, -300).assess(500), Assessment::Accepted);
        // Exactly at the limit is still acceptable.
        assert_eq!(reading(5, 500).assess(500), Assessment::Accepted);
    }

    #[test]
    fn log_lists_newest_first() {
        let mut log = ReadingLog::default();
        log.prepend(reading(1, 0));
        log.prepend(reading(2, 100));
        assert_eq!(log.entries()[0].id, 2);
        assert_eq!(log.entries()[1].id, 1);
    }
}
