//! Test and helper doubles for comparator_core

use comparator_traits::AnchorProbe;

/// Probe that reports every anchor as mounted; used by headless hosts where
/// tutorial steps have nothing to dangle from.
pub struct AlwaysLive;

impl AnchorProbe for AlwaysLive {
    fn is_live(&self, _anchor: &str) -> bool {
        true
    }
}

/// Probe with a fixed set of dead anchors.
pub struct DeadAnchors(pub Vec<String>);

impl AnchorProbe for DeadAnchors {
    fn is_live(&self, anchor: &str) -> bool {
        !self.0.iter().any(|dead| dead == anchor)
    }
}
