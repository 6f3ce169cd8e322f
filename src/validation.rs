//! Response validation against the poll it answers.

use crate::domain::{OutstandingPoll, Response, ResponseViolation};

/// Checks that a response matches its poll: one vote per inventory element,
/// in the same order, answering the same hashes.
///
/// All-or-nothing: a response failing any check applies zero votes.
pub fn validate_response(
    poll: &OutstandingPoll,
    response: &Response,
) -> Result<(), ResponseViolation> {
    if response.votes.len() != poll.invs.len() {
        return Err(ResponseViolation::LengthMismatch {
            expected: poll.invs.len(),
            got: response.votes.len(),
        });
    }

    for (index, (inv, vote)) in poll.invs.iter().zip(&response.votes).enumerate() {
        if vote.target_hash != inv.target_hash {
            return Err(ResponseViolation::HashMismatch {
                index,
                expected: inv.target_hash,
                got: vote.target_hash,
            });
        }
    }

    Ok(())
}
