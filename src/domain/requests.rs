//! Bookkeeping for polls awaiting their response.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use super::{Inv, NodeId};

/// One outbound poll waiting for its peer's answer.
#[derive(Debug, Clone)]
pub struct OutstandingPoll {
    pub peer: NodeId,
    pub issued_at: Instant,
    pub deadline: Instant,
    pub invs: Vec<Inv>,
}

/// Tracks outstanding polls per peer.
///
/// A peer holds at most one in-flight poll at any moment. A deadline-ordered
/// index makes timeout sweeps proportional to the number of expired entries.
#[derive(Default)]
pub struct PeerRequestRegistry {
    requests: HashMap<NodeId, OutstandingPoll>,
    deadlines: BTreeSet<(Instant, NodeId)>,
}

impl PeerRequestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outbound poll with deadline `now + timeout`.
    ///
    /// Returns `false` without mutation when the peer already has a poll in
    /// flight.
    pub fn register_request(
        &mut self,
        peer: NodeId,
        invs: Vec<Inv>,
        now: Instant,
        timeout: Duration,
    ) -> bool {
        if self.requests.contains_key(&peer) {
            return false;
        }
        let deadline = now + timeout;
        self.deadlines.insert((deadline, peer));
        self.requests.insert(
            peer,
            OutstandingPoll {
                peer,
                issued_at: now,
                deadline,
                invs,
            },
        );
        true
    }

    /// Atomically removes and returns the outstanding poll for `peer`.
    pub fn match_response(&mut self, peer: &NodeId) -> Option<OutstandingPoll> {
        let poll = self.requests.remove(peer)?;
        self.deadlines.remove(&(poll.deadline, poll.peer));
        Some(poll)
    }

    /// Removes every poll whose deadline is `<= now`; returns the peers
    /// that timed out.
    pub fn reap_expired(&mut self, now: Instant) -> Vec<NodeId> {
        let mut reaped = Vec::new();
        loop {
            let expired = match self.deadlines.first().copied() {
                Some((deadline, peer)) if deadline <= now => (deadline, peer),
                _ => break,
            };
            self.deadlines.remove(&expired);
            self.requests.remove(&expired.1);
            reaped.push(expired.1);
        }
        reaped
    }

    pub fn is_busy(&self, peer: &NodeId) -> bool {
        self.requests.contains_key(peer)
    }

    pub fn outstanding(&self) -> usize {
        self.requests.len()
    }
}
