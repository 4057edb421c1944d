//! Cooperative timer for simulated training ticks.
//!
//! The frame loop polls the schedule; at most one tick is pending at a time and
//! it is tagged with the [`RunToken`] of the run that armed it. Re-arming or
//! cancelling drops the pending tick, so a superseded run can never fire.

use std::time::{Duration, Instant};

/// Identifies one training run. Tokens are never reused within a simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunToken(u64);

impl RunToken {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn successor(self) -> Self {
        Self(self.0.wrapping_add(1).max(1))
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// A tick waiting for its deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledTick {
    pub token: RunToken,
    pub due: Instant,
}

#[derive(Clone, Debug, Default)]
pub struct TickSchedule {
    pending: Option<ScheduledTick>,
}

impl TickSchedule {
    /// Schedule the next tick for `token`, replacing anything pending.
    pub fn arm(&mut self, token: RunToken, now: Instant, interval: Duration) {
        self.pending = Some(ScheduledTick {
            token,
            due: now + interval,
        });
    }

    /// Drop the pending tick, returning it if there was one.
    pub fn cancel(&mut self) -> Option<ScheduledTick> {
        self.pending.take()
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|tick| tick.due)
    }

    /// Take the pending tick once its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<RunToken> {
        match self.pending {
            Some(tick) if tick.due <= now => {
                self.pending = None;
                Some(tick.token)
            }
            _ => None,
        }
    }
}
