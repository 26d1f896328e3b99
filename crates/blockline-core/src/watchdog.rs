//! Stale request watchdog.
//!
//! A request that is sent but never acknowledged leaves the local side
//! waiting with nothing visibly wrong. The watchdog remembers the outstanding
//! request and flags it stale once the timeout passes, so the panel can say
//! so. It never resends, never queues, and never touches the local state.
//!
//! Time is passed in, never read, so simulations can use virtual clocks.

use std::{ops::Sub, time::Duration};

use crate::BlockState;

/// The request currently awaiting acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest<I> {
    /// State the request asked the peer for.
    pub expected: BlockState,
    /// When the request was sent.
    pub sent_at: I,
    /// Whether the timeout has passed.
    pub stale: bool,
}

/// Tracks at most one outstanding request.
#[derive(Debug, Clone)]
pub struct RequestWatchdog<I> {
    timeout: Option<Duration>,
    pending: Option<PendingRequest<I>>,
}

impl<I> RequestWatchdog<I>
where
    I: Copy + Ord + Sub<Output = Duration>,
{
    /// Create a watchdog. `None` disables it.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout, pending: None }
    }

    /// Configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Outstanding request, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&PendingRequest<I>> {
        self.pending.as_ref()
    }

    /// Whether the outstanding request has timed out.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.stale)
    }

    /// Record a request sent at `now`, replacing any older one.
    pub fn record(&mut self, expected: BlockState, now: I) {
        if self.timeout.is_none() {
            return;
        }
        self.pending = Some(PendingRequest { expected, sent_at: now, stale: false });
    }

    /// Clear the outstanding request. Returns it, if there was one.
    pub fn resolve(&mut self) -> Option<PendingRequest<I>> {
        self.pending.take()
    }

    /// Advance time. Returns `true` when the stale flag becomes set.
    pub fn tick(&mut self, now: I) -> bool {
        let (Some(timeout), Some(pending)) = (self.timeout, self.pending.as_mut()) else {
            return false;
        };
        if pending.stale || now < pending.sent_at {
            return false;
        }
        if now - pending.sent_at >= timeout {
            pending.stale = true;
            tracing::warn!(
                expected = %pending.expected,
                timeout_ms = timeout.as_millis() as u64,
                "request not acknowledged"
            );
            return true;
        }
        false
    }
}
