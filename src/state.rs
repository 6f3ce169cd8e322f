//! Mutable state of a processor.

use crate::domain::{PeerRequestRegistry, TargetRegistry};

/// Both registries behind one lock: every mutating entry point acquires the
/// processor's single write lock once, so vote application is strictly
/// serialized and poll issuance cannot interleave with response matching.
pub(crate) struct EngineState {
    pub targets: TargetRegistry,
    pub requests: PeerRequestRegistry,
}

impl EngineState {
    pub fn new() -> Self {
        Self {
            targets: TargetRegistry::new(),
            requests: PeerRequestRegistry::new(),
        }
    }
}
