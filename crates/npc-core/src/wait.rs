//! Cancellable, resumable waits.
//!
//! # Model
//!
//! Every NPC owns one [`WaitScope`].  Before it starts a wait it *arms* the
//! scope, receiving a [`CancelToken`] tagged with a fresh generation, and
//! binds a [`Timer`] to that token.  Arming again invalidates every older
//! token, so at most one wait per NPC is live at any time.
//!
//! Interruption calls [`WaitScope::cancel`].  The owner then polls its timer,
//! which reports [`WaitPoll::Cancelled`] with the time still outstanding; the
//! owner stores that in its resumption snapshot.  Resuming arms the scope
//! again and starts a *new* timer for the outstanding time.  A cancelled or
//! superseded token cannot start a new timer.
//!
//! Time only moves when the owner polls with a `dt`, so the time an NPC spends
//! parked between cancel and resume never counts against a wait.

use crate::{Millis, WaitError};

/// Handle tying a timer to one arming of a [`WaitScope`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CancelToken {
    generation: u64,
}

/// Per-NPC cancellation scope.
#[derive(Debug, Default)]
pub struct WaitScope {
    generation: u64,
    armed:      bool,
    cancelled:  bool,
}

impl WaitScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token, invalidating all earlier ones.
    pub fn arm(&mut self) -> CancelToken {
        self.generation += 1;
        self.armed = true;
        self.cancelled = false;
        CancelToken { generation: self.generation }
    }

    /// Cancel the live token.  Returns `false` if nothing was armed or it was
    /// already cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.armed && !self.cancelled {
            self.cancelled = true;
            true
        } else {
            false
        }
    }

    /// Drop the live token without cancelling it (the wait finished normally).
    pub fn disarm(&mut self) {
        self.armed = false;
        self.cancelled = false;
    }

    /// Whether `token` may still drive a wait.
    pub fn check(&self, token: CancelToken) -> Result<(), WaitError> {
        if !self.armed || token.generation != self.generation {
            return Err(WaitError::StaleToken);
        }
        if self.cancelled {
            return Err(WaitError::TokenCancelled);
        }
        Ok(())
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.armed && self.cancelled
    }
}

/// Outcome of polling a [`Timer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitPoll {
    /// Still waiting; `remaining` is left.
    Pending { remaining: Millis },
    /// The full duration has elapsed.
    Elapsed,
    /// The scope was cancelled; `remaining` had not yet elapsed.
    Cancelled { remaining: Millis },
}

/// A countdown bound to a [`CancelToken`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timer {
    token:     CancelToken,
    duration:  Millis,
    remaining: Millis,
}

impl Timer {
    /// Start a countdown of `duration` bound to `token`.
    ///
    /// Fails if `token` was cancelled or superseded.
    pub fn start(scope: &WaitScope, token: CancelToken, duration: Millis) -> Result<Timer, WaitError> {
        scope.check(token)?;
        Ok(Timer { token, duration, remaining: duration })
    }

    /// Advance by `dt` unless the scope was cancelled.
    pub fn poll(&mut self, scope: &WaitScope, dt: Millis) -> Result<WaitPoll, WaitError> {
        match scope.check(self.token) {
            Ok(()) => {}
            Err(WaitError::TokenCancelled) => {
                return Ok(WaitPoll::Cancelled { remaining: self.remaining });
            }
            Err(e) => return Err(e),
        }
        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            Ok(WaitPoll::Elapsed)
        } else {
            Ok(WaitPoll::Pending { remaining: self.remaining })
        }
    }

    #[inline]
    pub fn duration(&self) -> Millis {
        self.duration
    }

    #[inline]
    pub fn remaining(&self) -> Millis {
        self.remaining
    }

    #[inline]
    pub fn elapsed(&self) -> Millis {
        self.duration.saturating_sub(self.remaining)
    }

    /// Fraction complete in `[0, 1]`; a zero-length timer counts as done.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        self.elapsed().0 as f32 / self.duration.0 as f32
    }
}
