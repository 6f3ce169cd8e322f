//! The processor: orchestrates registries, polls, and vote application.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{EngineConfig, Inv, NodeId, Response, Status, StatusUpdate, Target, Vote};
use crate::ports::{Clock, PeerDirectory, ReconciliationApi, SystemClock};
use crate::state::EngineState;
use crate::validation::validate_response;

/// Drives reconciliation for one node.
///
/// The processor owns the target and request registries and composes them
/// with two injected collaborators: a [`PeerDirectory`] supplying peers and
/// absorbing misbehavior/timeout reports, and a [`Clock`] supplying
/// deadlines. All entry points are non-blocking; external loops drive them
/// and carry the polls over their own transport.
pub struct Processor<D>
where
    D: PeerDirectory,
{
    directory: Arc<D>,
    clock: Box<dyn Clock>,
    config: EngineConfig,
    state: RwLock<EngineState>,
}

impl<D> Processor<D>
where
    D: PeerDirectory,
{
    pub fn new(directory: Arc<D>, config: EngineConfig) -> Self {
        Self {
            directory,
            clock: Box::new(SystemClock),
            config,
            state: RwLock::new(EngineState::new()),
        }
    }

    /// Replace the clock (for deterministic tests and simulations).
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Number of targets still being reconciled.
    pub fn open_targets(&self) -> usize {
        self.state.read().targets.len()
    }

    /// Number of polls awaiting a response.
    pub fn outstanding_polls(&self) -> usize {
        self.state.read().requests.outstanding()
    }
}

impl<D> ReconciliationApi for Processor<D>
where
    D: PeerDirectory,
{
    fn add_to_reconcile(&self, target: Arc<dyn Target>) -> Option<StatusUpdate> {
        let target_hash = target.hash();

        // A target the local node can already prove malformed is never
        // polled; it goes terminal on the spot.
        if !target.is_valid() {
            warn!(kind = target.kind(), "refusing malformed target");
            crate::metrics::record_status_transition(Status::Invalid.label());
            return Some(StatusUpdate {
                target_hash,
                status: Status::Invalid,
            });
        }

        if self.state.write().targets.add_target(target) {
            debug!("target admitted for reconciliation");
        }
        None
    }

    fn invs_for_next_poll(&self) -> Vec<Inv> {
        self.state
            .read()
            .targets
            .invs_for_next_poll(self.config.max_element_poll)
    }

    fn issue_poll(&self) -> Option<(NodeId, Vec<Inv>)> {
        let now = self.clock.now();
        let mut state = self.state.write();

        let invs = state.targets.invs_for_next_poll(self.config.max_element_poll);
        if invs.is_empty() {
            return None;
        }

        let peer = self.directory.select_next_peer()?;
        if !state
            .requests
            .register_request(peer, invs.clone(), now, self.config.request_timeout)
        {
            debug!(%peer, "selected peer still has a poll in flight");
            return None;
        }

        crate::metrics::record_poll_issued();
        debug!(%peer, elements = invs.len(), "poll issued");
        Some((peer, invs))
    }

    fn register_votes(&self, peer: NodeId, response: Response, updates: &mut Vec<StatusUpdate>) {
        let mut state = self.state.write();

        let Some(poll) = state.requests.match_response(&peer) else {
            // Benign race: the poll may have been reaped already, or the
            // response was never asked for.
            debug!(%peer, "response without outstanding poll, dropped");
            return;
        };

        if let Err(violation) = validate_response(&poll, &response) {
            crate::metrics::record_response_rejected(violation.label());
            drop(state);
            self.directory.report_misbehavior(peer, violation);
            return;
        }

        for vote in &response.votes {
            crate::metrics::record_vote_registered();
            if let Some(update) = state.targets.register_vote(&vote.target_hash, vote.error) {
                debug!(status = update.status.label(), "target transitioned");
                crate::metrics::record_status_transition(update.status.label());
                updates.push(update);
            }
        }
    }

    fn answer_poll(&self, invs: &[Inv]) -> Response {
        let state = self.state.read();
        let votes = invs
            .iter()
            .map(|inv| {
                let error = match state.targets.record(&inv.target_hash) {
                    Some(record) if record.is_accepted() => 0,
                    Some(_) => 1,
                    None => -1,
                };
                Vote::new(error, inv.target_hash)
            })
            .collect();
        Response::new(0, 0, votes)
    }

    fn tick(&self) {
        let now = self.clock.now();
        let reaped = self.state.write().requests.reap_expired(now);
        for peer in reaped {
            warn!(%peer, "poll expired without response");
            crate::metrics::record_request_timeout();
            self.directory.report_timeout(peer);
        }
    }
}

#[cfg(test)]
mod tests;
