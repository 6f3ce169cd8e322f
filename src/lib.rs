//! # Avalanche Reconciliation Engine
//!
//! Decides the acceptance of candidate items (transactions, blocks, any
//! opaque target) by repeated randomized polling of peers. A node keeps a
//! registry of open targets, packages them into bounded polls, matches peer
//! responses against its outstanding requests, and feeds each vote to a
//! per-target sliding-window record until confidence accumulates into a
//! terminal `Finalized` or `Invalid` status.
//!
//! ## Architecture
//!
//! - **domain** - pure state machines: the vote record, the target
//!   registry, the outstanding-poll registry, and the wire value objects.
//! - **ports** - the contracts at the engine's edges: the
//!   [`ReconciliationApi`] its drivers call, and the [`PeerDirectory`] and
//!   [`Clock`] collaborators it consumes.
//! - **adapters** - in-memory implementations of the driven ports:
//!   a round-robin peer directory and a deterministic clock.
//! - **service** - the [`Processor`] orchestrating all of the above.
//!
//! Transport, target intake, persistence, and peer membership live outside
//! the crate: external loops call [`Processor::issue_poll`](ReconciliationApi::issue_poll),
//! carry the inventory to a peer however they like, and deliver the answer
//! back through [`register_votes`](ReconciliationApi::register_votes).
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use avalanche_engine::{
//!     EngineConfig, Processor, ReconciliationApi, RoundRobinDirectory,
//!     NodeId, TransactionTarget,
//! };
//!
//! let directory = Arc::new(RoundRobinDirectory::new());
//! directory.add_peer(NodeId::new([1u8; 32]));
//!
//! let processor = Processor::new(Arc::clone(&directory), EngineConfig::default());
//! processor.add_to_reconcile(Arc::new(TransactionTarget::new([42u8; 32], true)));
//!
//! if let Some((peer, invs)) = processor.issue_poll() {
//!     // dispatch `invs` to `peer` on your transport; when its response
//!     // arrives, call processor.register_votes(peer, response, &mut out)
//!     assert_eq!(invs.len(), 1);
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod validation;

mod state;

pub use adapters::{ManualClock, RoundRobinDirectory};
pub use domain::{
    BlockTarget, EngineConfig, Hash, Inv, NodeId, Response, ResponseViolation, Status,
    StatusUpdate, Target, TransactionTarget, Vote, VoteRecord, BLOCK_KIND, FINALIZATION_SCORE,
    MAX_ELEMENT_POLL, REQUEST_TIMEOUT, TIME_STEP, TRANSACTION_KIND,
};
pub use ports::{Clock, PeerDirectory, ReconciliationApi, SystemClock};
pub use service::Processor;
