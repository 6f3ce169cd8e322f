//! Registry of targets currently under reconciliation.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Hash, Inv, StatusUpdate, Target, VoteRecord, BLOCK_KIND};

struct TargetEntry {
    target: Arc<dyn Target>,
    record: VoteRecord,
}

/// Maps open target hashes to their descriptor and vote record.
///
/// Every registered target has a non-terminal record; entries leave the
/// registry the moment their record turns terminal. Insertion order is
/// preserved for the poll ordering of non-block targets.
#[derive(Default)]
pub struct TargetRegistry {
    entries: HashMap<Hash, TargetEntry>,
    /// Insertion order of live entries.
    order: Vec<Hash>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a target for reconciliation, seeding its record from the
    /// target's initial acceptance.
    ///
    /// Returns `false` without mutation when the hash is already
    /// registered.
    pub fn add_target(&mut self, target: Arc<dyn Target>) -> bool {
        let hash = target.hash();
        if self.entries.contains_key(&hash) {
            return false;
        }
        let record = VoteRecord::new(target.is_accepted());
        self.entries.insert(hash, TargetEntry { target, record });
        self.order.push(hash);
        true
    }

    pub fn has_target(&self, hash: &Hash) -> bool {
        self.entries.contains_key(hash)
    }

    /// Read access to a target's vote record, e.g. to answer a poll.
    pub fn record(&self, hash: &Hash) -> Option<&VoteRecord> {
        self.entries.get(hash).map(|entry| &entry.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Feeds one vote to the target's record.
    ///
    /// Returns the new status when the record's state changed, `None` for
    /// unknown hashes or rounds that changed nothing. Terminal transitions
    /// remove the entry.
    pub fn register_vote(&mut self, hash: &Hash, err: i32) -> Option<StatusUpdate> {
        let entry = self.entries.get_mut(hash)?;
        if !entry.record.register_vote(err) {
            return None;
        }
        let status = entry.record.status();
        if status.is_terminal() {
            self.entries.remove(hash);
            self.order.retain(|h| h != hash);
        }
        Some(StatusUpdate {
            target_hash: *hash,
            status,
        })
    }

    /// Assembles the inventory for the next poll, at most `max` elements.
    ///
    /// Block targets come first in descending score (cumulative work), all
    /// other targets follow in insertion order. The score is read from the
    /// target descriptor itself.
    pub fn invs_for_next_poll(&self, max: usize) -> Vec<Inv> {
        let mut blocks: Vec<(i64, Hash)> = Vec::new();
        let mut rest: Vec<Inv> = Vec::new();

        for hash in &self.order {
            let entry = &self.entries[hash];
            if entry.target.kind() == BLOCK_KIND {
                blocks.push((entry.target.score(), *hash));
            } else {
                rest.push(Inv::new(entry.target.kind(), *hash));
            }
        }

        // Stable sort keeps insertion order among equal scores.
        blocks.sort_by(|a, b| b.0.cmp(&a.0));

        let mut invs: Vec<Inv> = blocks
            .into_iter()
            .map(|(_, hash)| Inv::new(BLOCK_KIND, hash))
            .collect();
        invs.extend(rest);
        invs.truncate(max);
        invs
    }
}
