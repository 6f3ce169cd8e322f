//! Engine constants and configuration.

use std::time::Duration;

/// Streak length of mutually-agreeing conclusive rounds at which a target's
/// polarity becomes terminal.
pub const FINALIZATION_SCORE: u16 = 128;

/// Upper bound on the number of inventory elements carried by one poll.
pub const MAX_ELEMENT_POLL: usize = 4096;

/// How long an outstanding poll may wait for its response before the peer
/// is reaped.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Advisory cadence for external poll loops.
pub const TIME_STEP: Duration = Duration::from_millis(10);

/// Operational knobs for a [`Processor`](crate::service::Processor).
///
/// Defaults are the authoritative protocol constants.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Maximum inventory elements per poll.
    pub max_element_poll: usize,
    /// Deadline applied to every outbound poll.
    pub request_timeout: Duration,
    /// Advisory poll cadence, exposed for the embedding poll loop.
    pub time_step: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_element_poll: MAX_ELEMENT_POLL,
            request_timeout: REQUEST_TIMEOUT,
            time_step: TIME_STEP,
        }
    }
}
