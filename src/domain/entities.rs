//! Core value objects: identifiers, poll inventory, votes, and statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte opaque target identifier.
///
/// Equality and hashing are the only operations the engine performs on it;
/// the intake decides what it digests.
pub type Hash = [u8; 32];

/// Unique identifier for a peer in the network.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct NodeId(pub [u8; 32]);

impl NodeId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..")
    }
}

/// One poll inventory element: which kind of target, and which one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inv {
    pub target_type: String,
    pub target_hash: Hash,
}

impl Inv {
    pub fn new(target_type: impl Into<String>, target_hash: Hash) -> Self {
        Self {
            target_type: target_type.into(),
            target_hash,
        }
    }
}

/// One peer's verdict for one inventory element.
///
/// The error code has three domains: `0` affirms acceptance, positive values
/// conclusively deny it, negative values mean the peer cannot decide (the
/// vote ages the window but is never counted as conclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub error: i32,
    pub target_hash: Hash,
}

impl Vote {
    pub fn new(error: i32, target_hash: Hash) -> Self {
        Self { error, target_hash }
    }
}

/// The payload answering one poll.
///
/// `round` and `cooldown` are carried end-to-end but not consulted; they are
/// reserved for flow-control extensions. `votes` is positionally aligned
/// with the inventory of the poll it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub round: u64,
    pub cooldown: u32,
    pub votes: Vec<Vote>,
}

impl Response {
    pub fn new(round: u64, cooldown: u32, votes: Vec<Vote>) -> Self {
        Self {
            round,
            cooldown,
            votes,
        }
    }
}

/// Where a target currently stands.
///
/// The discriminants are stable and part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Invalid = 0,
    Rejected = 1,
    Accepted = 2,
    Finalized = 3,
}

impl Status {
    /// Terminal statuses end reconciliation; the target leaves the registry.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Finalized | Status::Invalid)
    }

    /// Stable lowercase label, used for metrics and logging.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Invalid => "invalid",
            Status::Rejected => "rejected",
            Status::Accepted => "accepted",
            Status::Finalized => "finalized",
        }
    }
}

/// Emitted whenever a target's status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub target_hash: Hash,
    pub status: Status,
}
