//! `ActionSelector` — the one selection policy shared by action pools and
//! patrol routes.
//!
//! The selector is pure: it maps `(mode, pool size, current index)` to the
//! next index and owns no cursor.  [`SelectionCursor`] is the small stateful
//! wrapper a pool or route keeps to remember its last dispensed index.
//!
//! An uninitialised cursor is `None` and behaves like index `-1`:
//!
//! ```text
//! RoundRobin         None → 0          Some(i) → (i + 1) % n
//! RoundRobinReverse  None → n - 1      Some(i) → (i + n - 1) % n
//! Random             uniform in [0, n), redrawn while == current (bounded,
//!                    then drawn from the other n - 1 slots)
//! ```

use crate::RandomSource;

/// How many times a `Random` draw is retried to avoid the current index
/// before falling back to a draw over the remaining slots.
pub const MAX_REDRAWS: u32 = 8;

/// Selection policy for a pool of actions or a list of checkpoints.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortMode {
    #[default]
    RoundRobin,
    RoundRobinReverse,
    Random,
}

impl SortMode {
    /// Parse the authored names used in route files (case-insensitive).
    pub fn parse(s: &str) -> Option<SortMode> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roundrobin" | "round_robin" | "rr" => Some(SortMode::RoundRobin),
            "roundrobinreverse" | "round_robin_reverse" | "reverse" => {
                Some(SortMode::RoundRobinReverse)
            }
            "random" => Some(SortMode::Random),
            _ => None,
        }
    }
}

/// A sort mode plus the exclude-current flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSelector {
    pub mode: SortMode,
    /// Only meaningful for `Random`: avoid handing out the same index twice
    /// in a row.  Round-robin modes never repeat for `n > 1` anyway.
    pub exclude_current: bool,
}

impl ActionSelector {
    pub const fn new(mode: SortMode, exclude_current: bool) -> Self {
        Self { mode, exclude_current }
    }

    #[inline]
    pub fn next<R: RandomSource + ?Sized>(
        &self,
        pool_size: usize,
        current:   Option<usize>,
        rng:       &mut R,
    ) -> usize {
        select_next(self.mode, pool_size, current, self.exclude_current, rng)
    }

    #[inline]
    pub fn first<R: RandomSource + ?Sized>(&self, pool_size: usize, rng: &mut R) -> usize {
        select_first(self.mode, pool_size, rng)
    }
}

/// Index following `current` under `mode`.
///
/// `pool_size` must be non-zero; deciding what to do with an empty list is the
/// caller's job (see [`SelectionCursor::advance`]).
pub fn select_next<R: RandomSource + ?Sized>(
    mode:            SortMode,
    pool_size:       usize,
    current:         Option<usize>,
    exclude_current: bool,
    rng:             &mut R,
) -> usize {
    debug_assert!(pool_size > 0, "select_next on an empty pool");

    match (mode, current) {
        (SortMode::RoundRobin, None) | (SortMode::RoundRobinReverse, None) => {
            select_first(mode, pool_size, rng)
        }
        (SortMode::RoundRobin, Some(i)) => (i + 1) % pool_size,
        (SortMode::RoundRobinReverse, Some(i)) => (i % pool_size + pool_size - 1) % pool_size,
        (SortMode::Random, current) => {
            let mut pick = rng.index(pool_size);
            if let (true, Some(cur)) = (exclude_current && pool_size > 1, current) {
                let mut redraws = 0;
                while pick == cur && redraws < MAX_REDRAWS {
                    pick = rng.index(pool_size);
                    redraws += 1;
                }
                if pick == cur {
                    // Draw from the other n - 1 slots and step over `cur`.
                    pick = rng.index(pool_size - 1);
                    if pick >= cur {
                        pick += 1;
                    }
                }
            }
            pick
        }
    }
}

/// Starting index for a freshly configured list.
pub fn select_first<R: RandomSource + ?Sized>(
    mode:      SortMode,
    pool_size: usize,
    rng:       &mut R,
) -> usize {
    debug_assert!(pool_size > 0, "select_first on an empty pool");

    match mode {
        SortMode::RoundRobin => 0,
        SortMode::RoundRobinReverse => pool_size - 1,
        SortMode::Random => rng.index(pool_size),
    }
}

// ── SelectionCursor ──────────────────────────────────────────────────────────

/// The single mutable cursor a pool or route keeps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionCursor {
    current: Option<usize>,
}

impl SelectionCursor {
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Start from a known index (e.g. an NPC spawned at a given checkpoint).
    pub const fn at(index: usize) -> Self {
        Self { current: Some(index) }
    }

    /// Last dispensed index, `None` until the first `advance`.
    #[inline]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Select and record the next index, or `None` for an empty list.
    pub fn advance<R: RandomSource + ?Sized>(
        &mut self,
        selector: ActionSelector,
        len:      usize,
        rng:      &mut R,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let next = selector.next(len, self.current, rng);
        self.current = Some(next);
        Some(next)
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}
