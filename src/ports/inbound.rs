//! Driving port: the contract external collaborators consume.

use std::sync::Arc;

use crate::domain::{Inv, NodeId, Response, StatusUpdate, Target};

/// The reconciliation engine as seen by its drivers: the intake feeding
/// targets, the poll loop dispatching polls, and the inbound handler
/// delivering responses.
///
/// Every method runs in bounded time and never blocks; all waiting happens
/// in the callers.
pub trait ReconciliationApi {
    /// Submits a target for reconciliation. Idempotent for valid targets.
    ///
    /// A malformed target (`is_valid() == false`) is never admitted: the
    /// call immediately returns its `Invalid` transition and the target is
    /// not polled.
    fn add_to_reconcile(&self, target: Arc<dyn Target>) -> Option<StatusUpdate>;

    /// The inventory the next poll would carry; empty when no targets are
    /// open.
    fn invs_for_next_poll(&self) -> Vec<Inv>;

    /// Picks a free peer and records an outstanding poll for it.
    ///
    /// `None` when there are no open targets, no peer is available, or the
    /// selected peer already has a poll in flight. The caller dispatches
    /// the returned inventory on its own transport.
    fn issue_poll(&self) -> Option<(NodeId, Vec<Inv>)>;

    /// Matches a response against `peer`'s outstanding poll and applies its
    /// votes in inventory order, appending every resulting transition to
    /// `updates`.
    ///
    /// Responses without a matching poll are dropped silently; responses
    /// violating their poll are dropped whole and reported to the peer
    /// directory.
    fn register_votes(&self, peer: NodeId, response: Response, updates: &mut Vec<StatusUpdate>);

    /// Answers a poll received from a peer with this node's current
    /// verdicts: `0` where the local record accepts, `1` where it rejects,
    /// `-1` where the target is unknown here.
    fn answer_poll(&self, invs: &[Inv]) -> Response;

    /// Reaps expired polls and reports the timed-out peers.
    fn tick(&self);
}
