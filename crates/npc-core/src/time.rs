//! Game time model.
//!
//! # Design
//!
//! The world advances in fixed steps.  Each step is one `Tick` and moves the
//! clock forward by `WorldConfig::tick_ms` milliseconds:
//!
//!   elapsed = tick * tick_ms
//!
//! All behavior timing (action halves, waits, turn durations) is held in
//! integer milliseconds (`Millis`), so splitting a duration in two and
//! subtracting elapsed time is exact.  Nothing in the core reads a wall clock.

use std::fmt;

// ── Millis ───────────────────────────────────────────────────────────────────

/// A duration in whole milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    #[inline]
    pub const fn from_secs(secs: u64) -> Millis {
        Millis(secs * 1_000)
    }

    /// Round a fractional second count to the nearest millisecond.
    /// Negative and non-finite inputs map to zero.
    pub fn from_secs_f32(secs: f32) -> Millis {
        if !secs.is_finite() || secs <= 0.0 {
            return Millis::ZERO;
        }
        Millis((secs * 1_000.0).round() as u64)
    }

    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        self.0 as f32 / 1_000.0
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn saturating_sub(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_sub(rhs.0))
    }

    /// Split into `(first, second)` halves with `first = d / 2`.
    /// The odd millisecond, if any, goes to the second half.
    #[inline]
    pub fn halves(self) -> (Millis, Millis) {
        let first = self.0 / 2;
        (Millis(first), Millis(self.0 - first))
    }
}

impl std::ops::Add for Millis {
    type Output = Millis;
    #[inline]
    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Millis {
    #[inline]
    fn add_assign(&mut self, rhs: Millis) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute world step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── GameClock ────────────────────────────────────────────────────────────────

/// Tracks the current tick and the game time it corresponds to.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameClock {
    /// Length of one step.
    pub tick_ms: Millis,
    /// The current tick, advanced by `GameClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl GameClock {
    pub fn new(tick_ms: Millis) -> Self {
        Self { tick_ms, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.offset(1);
    }

    /// Game time elapsed since tick 0.
    #[inline]
    pub fn elapsed(&self) -> Millis {
        Millis(self.current_tick.0 * self.tick_ms.0)
    }
}

impl fmt::Display for GameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{})", self.current_tick, self.elapsed())
    }
}

// ── WorldConfig ──────────────────────────────────────────────────────────────

/// Top-level world configuration.
///
/// Typically assembled by the application and handed to the world builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig {
    /// Milliseconds per tick.  Must be non-zero.  Default: 20 (50 Hz).
    pub tick_ms: u64,

    /// Total ticks `World::run` will execute.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical behavior.
    pub seed: u64,

    /// Clip played whenever an NPC returns to rest.
    pub idle_clip: String,
}

impl WorldConfig {
    /// The tick at which `World::run` stops (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    #[inline]
    pub fn tick_duration(&self) -> Millis {
        Millis(self.tick_ms)
    }

    /// Construct a `GameClock` pre-configured for this run.
    pub fn make_clock(&self) -> GameClock {
        GameClock::new(self.tick_duration())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tick_ms:     20,
            total_ticks: 0,
            seed:        0,
            idle_clip:   "Idle".to_owned(),
        }
    }
}
