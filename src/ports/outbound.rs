//! Driven ports: what the engine asks of its environment.

use std::time::Instant;

use crate::domain::{NodeId, ResponseViolation};

/// Peer membership as the engine consumes it.
///
/// Selection, scoring, and penalization all live behind this port; the
/// engine only asks for the next peer to poll and reports what it observed.
/// Implementations must not call back into the processor.
pub trait PeerDirectory: Send + Sync {
    /// The next peer to poll, or `None` when no peer is available.
    fn select_next_peer(&self) -> Option<NodeId>;

    /// A response from `peer` violated its request and was dropped.
    fn report_misbehavior(&self, peer: NodeId, violation: ResponseViolation);

    /// A poll to `peer` expired without a response.
    fn report_timeout(&self, peer: NodeId);
}

/// Time source for deadlines.
///
/// Injected at processor construction so tests can supply a deterministic
/// clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Default clock reading the system's monotonic time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
