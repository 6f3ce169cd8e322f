//! Per-target confidence state machine.

use super::{Status, FINALIZATION_SCORE};

/// Tracks a series of per-round votes for one target.
///
/// `votes` and `consider` are 8-bit sliding windows over the most recent
/// rounds: `votes` holds the affirmation bits, `consider` marks which of
/// those rounds were conclusive (the peer could decide at all). A round is
/// conclusive for the window when at least 7 of the 8 considered rounds
/// agree in either direction.
///
/// `confidence` packs the current acceptance polarity into bit 0 and the
/// streak of consecutive conclusive rounds agreeing with that polarity into
/// the upper 15 bits. A streak of [`FINALIZATION_SCORE`] rounds makes the
/// polarity terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteRecord {
    votes: u8,
    consider: u8,
    confidence: u16,
}

impl VoteRecord {
    /// `accepted` seeds the initial polarity. The alternating `votes`
    /// pattern guarantees several rounds of real data before either
    /// supermajority can trigger.
    pub fn new(accepted: bool) -> Self {
        Self {
            votes: 0xAA,
            consider: 0,
            confidence: u16::from(accepted),
        }
    }

    /// Current acceptance polarity.
    pub fn is_accepted(&self) -> bool {
        (self.confidence & 0x01) == 1
    }

    /// Streak of consecutive conclusive rounds agreeing with the polarity.
    pub fn confidence(&self) -> u16 {
        self.confidence >> 1
    }

    /// Whether the record has finalized a state.
    pub fn has_finalized(&self) -> bool {
        self.confidence() >= FINALIZATION_SCORE
    }

    /// Absorbs one round's vote and updates confidence accordingly.
    ///
    /// Returns `true` iff the acceptance or finalization state changed.
    pub fn register_vote(&mut self, err: i32) -> bool {
        self.votes = (self.votes << 1) | u8::from(err == 0);
        self.consider = (self.consider << 1) | u8::from(err >= 0);

        let yes = (self.votes & self.consider).count_ones() > 6;
        let no = (!self.votes & self.consider).count_ones() > 6;

        // The round is inconclusive
        if !yes && !no {
            return false;
        }

        // Conclusive and agrees with our current state
        if self.is_accepted() == yes {
            self.confidence += 2;
            return self.confidence() == FINALIZATION_SCORE;
        }

        // Conclusive but disagrees: polarity flips, streak resets
        self.confidence = u16::from(yes);
        true
    }

    /// Derives the externally visible status from polarity and
    /// finalization.
    pub fn status(&self) -> Status {
        match (self.is_accepted(), self.has_finalized()) {
            (true, false) => Status::Accepted,
            (false, false) => Status::Rejected,
            (true, true) => Status::Finalized,
            (false, true) => Status::Invalid,
        }
    }
}
