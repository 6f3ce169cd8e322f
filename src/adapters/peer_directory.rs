//! In-memory peer directory with round-robin selection.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::{NodeId, ResponseViolation};
use crate::ports::PeerDirectory;

/// Strikes at which a peer stops being selected.
pub const DEFAULT_MAX_STRIKES: u32 = 3;

/// Rotates through registered peers in order, skipping peers that have
/// accumulated too many strikes from misbehavior or timeouts.
pub struct RoundRobinDirectory {
    inner: RwLock<DirectoryInner>,
    max_strikes: u32,
}

struct DirectoryInner {
    peers: Vec<NodeId>,
    cursor: usize,
    strikes: HashMap<NodeId, u32>,
}

impl RoundRobinDirectory {
    pub fn new() -> Self {
        Self::with_max_strikes(DEFAULT_MAX_STRIKES)
    }

    pub fn with_max_strikes(max_strikes: u32) -> Self {
        Self {
            inner: RwLock::new(DirectoryInner {
                peers: Vec::new(),
                cursor: 0,
                strikes: HashMap::new(),
            }),
            max_strikes,
        }
    }

    pub fn add_peer(&self, peer: NodeId) {
        let mut inner = self.inner.write();
        if !inner.peers.contains(&peer) {
            inner.peers.push(peer);
        }
    }

    pub fn remove_peer(&self, peer: &NodeId) {
        let mut inner = self.inner.write();
        inner.peers.retain(|p| p != peer);
        inner.strikes.remove(peer);
    }

    pub fn strikes(&self, peer: &NodeId) -> u32 {
        self.inner
            .read()
            .strikes
            .get(peer)
            .copied()
            .unwrap_or_default()
    }

    fn strike(&self, peer: NodeId) {
        *self.inner.write().strikes.entry(peer).or_default() += 1;
    }
}

impl Default for RoundRobinDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerDirectory for RoundRobinDirectory {
    fn select_next_peer(&self) -> Option<NodeId> {
        let mut inner = self.inner.write();
        let count = inner.peers.len();
        for _ in 0..count {
            let index = inner.cursor % count;
            inner.cursor = (index + 1) % count;
            let peer = inner.peers[index];
            let strikes = inner.strikes.get(&peer).copied().unwrap_or_default();
            if strikes < self.max_strikes {
                return Some(peer);
            }
        }
        None
    }

    fn report_misbehavior(&self, peer: NodeId, violation: ResponseViolation) {
        warn!(%peer, %violation, "peer misbehaved");
        self.strike(peer);
    }

    fn report_timeout(&self, peer: NodeId) {
        debug!(%peer, "peer timed out");
        self.strike(peer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(n: u8) -> NodeId {
        NodeId::new([n; 32])
    }

    #[test]
    fn test_rotates_through_peers() {
        let directory = RoundRobinDirectory::new();
        directory.add_peer(node(1));
        directory.add_peer(node(2));
        directory.add_peer(node(3));

        assert_eq!(directory.select_next_peer(), Some(node(1)));
        assert_eq!(directory.select_next_peer(), Some(node(2)));
        assert_eq!(directory.select_next_peer(), Some(node(3)));
        assert_eq!(directory.select_next_peer(), Some(node(1)));
    }

    #[test]
    fn test_empty_directory_selects_none() {
        let directory = RoundRobinDirectory::new();
        assert_eq!(directory.select_next_peer(), None);
    }

    #[test]
    fn test_struck_out_peers_are_skipped() {
        let directory = RoundRobinDirectory::with_max_strikes(2);
        directory.add_peer(node(1));
        directory.add_peer(node(2));

        directory.report_timeout(node(1));
        directory.report_misbehavior(
            node(1),
            ResponseViolation::LengthMismatch {
                expected: 1,
                got: 0,
            },
        );
        assert_eq!(directory.strikes(&node(1)), 2);

        // Only the healthy peer remains selectable.
        assert_eq!(directory.select_next_peer(), Some(node(2)));
        assert_eq!(directory.select_next_peer(), Some(node(2)));
    }

    #[test]
    fn test_all_struck_out_selects_none() {
        let directory = RoundRobinDirectory::with_max_strikes(1);
        directory.add_peer(node(1));
        directory.report_timeout(node(1));
        assert_eq!(directory.select_next_peer(), None);
    }

    #[test]
    fn test_duplicate_add_is_ignored() {
        let directory = RoundRobinDirectory::new();
        directory.add_peer(node(1));
        directory.add_peer(node(1));

        assert_eq!(directory.select_next_peer(), Some(node(1)));
        assert_eq!(directory.select_next_peer(), Some(node(1)));
    }
}
