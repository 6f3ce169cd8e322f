use super::*;
use crate::adapters::ManualClock;
use crate::domain::{BlockTarget, Hash, ResponseViolation, TransactionTarget, BLOCK_KIND};
use parking_lot::Mutex;
use std::time::Duration;

// Mock directory recording every report it receives
struct MockDirectory {
    peers: Vec<NodeId>,
    cursor: Mutex<usize>,
    misbehavior: Mutex<Vec<(NodeId, ResponseViolation)>>,
    timeouts: Mutex<Vec<NodeId>>,
}

impl MockDirectory {
    fn new(peers: Vec<NodeId>) -> Self {
        Self {
            peers,
            cursor: Mutex::new(0),
            misbehavior: Mutex::new(Vec::new()),
            timeouts: Mutex::new(Vec::new()),
        }
    }
}

impl PeerDirectory for MockDirectory {
    fn select_next_peer(&self) -> Option<NodeId> {
        if self.peers.is_empty() {
            return None;
        }
        let mut cursor = self.cursor.lock();
        let peer = self.peers[*cursor % self.peers.len()];
        *cursor += 1;
        Some(peer)
    }

    fn report_misbehavior(&self, peer: NodeId, violation: ResponseViolation) {
        self.misbehavior.lock().push((peer, violation));
    }

    fn report_timeout(&self, peer: NodeId) {
        self.timeouts.lock().push(peer);
    }
}

fn hash(n: u64) -> Hash {
    let mut hash = [0u8; 32];
    hash[..8].copy_from_slice(&n.to_le_bytes());
    hash
}

fn node(n: u8) -> NodeId {
    NodeId::new([n; 32])
}

fn tx_target(n: u64, accepted: bool) -> Arc<dyn Target> {
    Arc::new(TransactionTarget::new(hash(n), accepted))
}

fn block_target(n: u64, work: i64) -> Arc<dyn Target> {
    Arc::new(BlockTarget::new(hash(n), work, true, true))
}

fn create_processor(
    peers: Vec<NodeId>,
) -> (Processor<MockDirectory>, Arc<MockDirectory>, ManualClock) {
    let directory = Arc::new(MockDirectory::new(peers));
    let clock = ManualClock::new();
    let processor = Processor::new(Arc::clone(&directory), EngineConfig::default())
        .with_clock(Box::new(clock.clone()));
    (processor, directory, clock)
}

/// One full poll round: issue, answer every element with `vote_error`,
/// register. Returns the emitted status updates.
fn poll_round(processor: &Processor<MockDirectory>, vote_error: i32) -> Vec<StatusUpdate> {
    let (peer, invs) = processor.issue_poll().expect("no poll issued");
    let votes = invs
        .iter()
        .map(|inv| Vote::new(vote_error, inv.target_hash))
        .collect();
    let mut updates = Vec::new();
    processor.register_votes(peer, Response::new(0, 0, votes), &mut updates);
    updates
}

#[test]
fn test_fast_finalization() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(42, true));

    // Six seed rounds plus 128 conclusive agreeing rounds.
    for round in 0..133 {
        assert!(poll_round(&processor, 0).is_empty(), "round {round}");
    }
    let updates = poll_round(&processor, 0);
    assert_eq!(
        updates,
        vec![StatusUpdate {
            target_hash: hash(42),
            status: Status::Finalized,
        }]
    );

    // Finalized targets leave the registry; nothing remains to poll.
    assert_eq!(processor.open_targets(), 0);
    assert!(processor.invs_for_next_poll().is_empty());
    assert!(processor.issue_poll().is_none());
}

#[test]
fn test_polarity_flip_then_finalized_rejection() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(7, true));

    // Conclusive denial first lands on the seventh round and flips the
    // polarity with a reset streak.
    for _ in 0..6 {
        assert!(poll_round(&processor, 1).is_empty());
    }
    let updates = poll_round(&processor, 1);
    assert_eq!(
        updates,
        vec![StatusUpdate {
            target_hash: hash(7),
            status: Status::Rejected,
        }]
    );
    assert_eq!(processor.open_targets(), 1);

    // 128 further denials finalize the rejection as invalid.
    for _ in 0..127 {
        assert!(poll_round(&processor, 1).is_empty());
    }
    let updates = poll_round(&processor, 1);
    assert_eq!(
        updates,
        vec![StatusUpdate {
            target_hash: hash(7),
            status: Status::Invalid,
        }]
    );
    assert_eq!(processor.open_targets(), 0);
}

#[test]
fn test_undecided_peer_never_concludes() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(9, true));

    for round in 0..400 {
        let err = if round % 2 == 0 { 0 } else { -1 };
        assert!(poll_round(&processor, err).is_empty(), "round {round}");
    }
    // The entry stays open indefinitely.
    assert_eq!(processor.open_targets(), 1);
}

#[test]
fn test_misordered_response_rejected_whole() {
    let (processor, directory, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(1, true));
    processor.add_to_reconcile(tx_target(2, true));

    let (peer, invs) = processor.issue_poll().unwrap();
    assert_eq!(invs.len(), 2);

    // Votes answer the right hashes in the wrong order.
    let response = Response::new(
        0,
        0,
        vec![
            Vote::new(0, invs[1].target_hash),
            Vote::new(0, invs[0].target_hash),
        ],
    );
    let mut updates = Vec::new();
    processor.register_votes(peer, response, &mut updates);

    assert!(updates.is_empty());
    assert_eq!(processor.open_targets(), 2);

    let reports = directory.misbehavior.lock();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, peer);
    assert!(matches!(
        reports[0].1,
        ResponseViolation::HashMismatch { index: 0, .. }
    ));
    drop(reports);

    // The request was consumed; the peer may be polled again.
    assert_eq!(processor.outstanding_polls(), 0);
    assert!(processor.issue_poll().is_some());
}

#[test]
fn test_truncated_response_rejected_whole() {
    let (processor, directory, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(1, true));
    processor.add_to_reconcile(tx_target(2, true));

    let (peer, invs) = processor.issue_poll().unwrap();
    let response = Response::new(0, 0, vec![Vote::new(0, invs[0].target_hash)]);
    let mut updates = Vec::new();
    processor.register_votes(peer, response, &mut updates);

    assert!(updates.is_empty());
    assert!(matches!(
        directory.misbehavior.lock()[0].1,
        ResponseViolation::LengthMismatch {
            expected: 2,
            got: 1
        }
    ));
}

#[test]
fn test_unsolicited_response_dropped_silently() {
    let (processor, directory, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(1, true));

    let response = Response::new(0, 0, vec![Vote::new(0, hash(1))]);
    let mut updates = Vec::new();
    processor.register_votes(node(1), response, &mut updates);

    assert!(updates.is_empty());
    assert!(directory.misbehavior.lock().is_empty());
    assert!(directory.timeouts.lock().is_empty());
}

#[test]
fn test_timeout_reaps_and_reports() {
    let (processor, directory, clock) = create_processor(vec![node(3)]);
    processor.add_to_reconcile(tx_target(1, true));

    let (peer, _) = processor.issue_poll().unwrap();
    assert_eq!(peer, node(3));
    assert_eq!(processor.outstanding_polls(), 1);

    // Just before the deadline nothing is reaped.
    clock.advance(Duration::from_secs(59));
    processor.tick();
    assert!(directory.timeouts.lock().is_empty());
    assert_eq!(processor.outstanding_polls(), 1);

    clock.advance(Duration::from_secs(1));
    processor.tick();
    assert_eq!(*directory.timeouts.lock(), vec![node(3)]);
    assert_eq!(processor.outstanding_polls(), 0);

    // No vote was applied for that round; the target is still open and the
    // peer may be polled again.
    assert_eq!(processor.open_targets(), 1);
    assert!(processor.issue_poll().is_some());
}

#[test]
fn test_late_response_after_reap_is_dropped() {
    let (processor, directory, clock) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(1, true));

    let (peer, invs) = processor.issue_poll().unwrap();
    clock.advance(Duration::from_secs(60));
    processor.tick();

    let votes = invs.iter().map(|inv| Vote::new(0, inv.target_hash)).collect();
    let mut updates = Vec::new();
    processor.register_votes(peer, Response::new(0, 0, votes), &mut updates);

    assert!(updates.is_empty());
    assert!(directory.misbehavior.lock().is_empty());
}

#[test]
fn test_no_poll_without_targets() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    assert!(processor.issue_poll().is_none());
}

#[test]
fn test_no_poll_without_peers() {
    let (processor, _, _) = create_processor(vec![]);
    processor.add_to_reconcile(tx_target(1, true));
    assert!(processor.issue_poll().is_none());
}

#[test]
fn test_no_poll_while_peer_busy() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(1, true));

    let (peer, invs) = processor.issue_poll().unwrap();
    assert!(processor.issue_poll().is_none());

    // Answering frees the peer.
    let votes = invs.iter().map(|inv| Vote::new(0, inv.target_hash)).collect();
    processor.register_votes(peer, Response::new(0, 0, votes), &mut Vec::new());
    assert!(processor.issue_poll().is_some());
}

#[test]
fn test_blocks_polled_before_others_by_work() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(block_target(1, 10));
    processor.add_to_reconcile(tx_target(100, true));
    processor.add_to_reconcile(block_target(2, 50));
    processor.add_to_reconcile(block_target(3, 30));

    let invs = processor.invs_for_next_poll();
    let hashes: Vec<Hash> = invs.iter().map(|inv| inv.target_hash).collect();
    assert_eq!(hashes, vec![hash(2), hash(3), hash(1), hash(100)]);
    assert!(invs[..3].iter().all(|inv| inv.target_type == BLOCK_KIND));
}

#[test]
fn test_inventory_respects_configured_cap() {
    let directory = Arc::new(MockDirectory::new(vec![node(1)]));
    let config = EngineConfig {
        max_element_poll: 3,
        ..EngineConfig::default()
    };
    let processor = Processor::new(Arc::clone(&directory), config);
    for n in 0..8 {
        processor.add_to_reconcile(tx_target(n, true));
    }
    assert_eq!(processor.invs_for_next_poll().len(), 3);
    let (_, invs) = processor.issue_poll().unwrap();
    assert_eq!(invs.len(), 3);
}

#[test]
fn test_malformed_target_goes_invalid_without_polling() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    let malformed: Arc<dyn Target> = Arc::new(BlockTarget::new(hash(66), 100, false, true));

    let update = processor.add_to_reconcile(malformed);
    assert_eq!(
        update,
        Some(StatusUpdate {
            target_hash: hash(66),
            status: Status::Invalid,
        })
    );
    assert_eq!(processor.open_targets(), 0);
    assert!(processor.issue_poll().is_none());
}

#[test]
fn test_add_to_reconcile_is_idempotent() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    assert!(processor.add_to_reconcile(tx_target(1, true)).is_none());
    assert!(processor.add_to_reconcile(tx_target(1, true)).is_none());
    assert_eq!(processor.open_targets(), 1);
}

#[test]
fn test_answer_poll_reports_local_verdicts() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(1, true));
    processor.add_to_reconcile(tx_target(2, false));

    let invs = vec![
        Inv::new("transaction", hash(1)),
        Inv::new("transaction", hash(2)),
        Inv::new("transaction", hash(3)),
    ];
    let response = processor.answer_poll(&invs);

    assert_eq!(response.votes.len(), 3);
    assert_eq!(response.votes[0], Vote::new(0, hash(1)));
    assert_eq!(response.votes[1], Vote::new(1, hash(2)));
    assert_eq!(response.votes[2], Vote::new(-1, hash(3)));
}

#[test]
fn test_updates_follow_vote_application_order() {
    let (processor, _, _) = create_processor(vec![node(1)]);
    processor.add_to_reconcile(tx_target(1, true));
    processor.add_to_reconcile(tx_target(2, true));

    // Both targets flip on the same round; the updates arrive in inventory
    // order.
    let mut updates = Vec::new();
    for _ in 0..7 {
        updates = poll_round(&processor, 1);
    }
    assert_eq!(
        updates,
        vec![
            StatusUpdate {
                target_hash: hash(1),
                status: Status::Rejected,
            },
            StatusUpdate {
                target_hash: hash(2),
                status: Status::Rejected,
            },
        ]
    );
}
