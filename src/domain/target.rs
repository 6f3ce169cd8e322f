//! The polymorphic target: anything whose acceptance is being decided.

use super::Hash;

/// Type tag carried by block targets; blocks get special poll ordering.
pub const BLOCK_KIND: &str = "block";

/// Type tag carried by transaction targets.
pub const TRANSACTION_KIND: &str = "transaction";

/// Something being decided by reconciliation, e.g. a transaction or block.
///
/// The engine only ever reads these five observers; it never mutates a
/// target. Implementations must stay immutable once handed to the engine.
pub trait Target: Send + Sync {
    /// Identity of the target.
    fn hash(&self) -> Hash;

    /// The kind of thing, e.g. `"block"` or `"transaction"`.
    fn kind(&self) -> &str;

    /// Whether the local node considers the target acceptable on first
    /// sight.
    fn is_accepted(&self) -> bool;

    /// Malformed targets are invalidated without polling.
    fn is_valid(&self) -> bool;

    /// Weights targets against each other within a poll, e.g. cumulative
    /// work for blocks.
    fn score(&self) -> i64;
}

/// A block candidate.
#[derive(Debug, Clone)]
pub struct BlockTarget {
    hash: Hash,
    work: i64,
    valid: bool,
    in_active_chain: bool,
}

impl BlockTarget {
    pub fn new(hash: Hash, work: i64, valid: bool, in_active_chain: bool) -> Self {
        Self {
            hash,
            work,
            valid,
            in_active_chain,
        }
    }
}

impl Target for BlockTarget {
    fn hash(&self) -> Hash {
        self.hash
    }

    fn kind(&self) -> &str {
        BLOCK_KIND
    }

    fn is_accepted(&self) -> bool {
        self.in_active_chain
    }

    fn is_valid(&self) -> bool {
        self.valid
    }

    fn score(&self) -> i64 {
        self.work
    }
}

/// A mempool transaction candidate.
#[derive(Debug, Clone)]
pub struct TransactionTarget {
    hash: Hash,
    accepted: bool,
}

impl TransactionTarget {
    pub fn new(hash: Hash, accepted: bool) -> Self {
        Self { hash, accepted }
    }
}

impl Target for TransactionTarget {
    fn hash(&self) -> Hash {
        self.hash
    }

    fn kind(&self) -> &str {
        TRANSACTION_KIND
    }

    fn is_accepted(&self) -> bool {
        self.accepted
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn score(&self) -> i64 {
        1
    }
}
