//! Deterministic per-NPC and world-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each NPC gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (npc_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive NPC IDs uniformly across the seed space.  Adding
//! NPCs at the end of the list does not disturb the draws of existing ones.
//!
//! Behavior code never names `NpcRng` directly: it draws through the
//! [`RandomSource`] trait so tests can substitute a scripted source.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::NpcId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── RandomSource ─────────────────────────────────────────────────────────────

/// Uniform integer draws used by selection policies and action counts.
pub trait RandomSource {
    /// Uniform draw in `[0, upper)`.  `upper` must be non-zero.
    fn index(&mut self, upper: usize) -> usize;

    /// Uniform draw in `[lo, hi]`.  Requires `lo <= hi`.
    fn inclusive(&mut self, lo: u32, hi: u32) -> u32;
}

// ── NpcRng ───────────────────────────────────────────────────────────────────

/// Per-NPC deterministic RNG.
pub struct NpcRng(SmallRng);

impl NpcRng {
    /// Seed deterministically from the run's global seed and an NPC ID.
    pub fn new(global_seed: u64, npc: NpcId) -> Self {
        let seed = global_seed ^ (npc.0 as u64).wrapping_mul(MIXING_CONSTANT);
        NpcRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

impl RandomSource for NpcRng {
    #[inline]
    fn index(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..upper)
    }

    #[inline]
    fn inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        self.0.gen_range(lo..=hi)
    }
}

// ── WorldRng ─────────────────────────────────────────────────────────────────

/// World-level RNG, used to derive per-NPC seeds for NPCs spawned mid-run.
pub struct WorldRng(SmallRng);

impl WorldRng {
    pub fn new(seed: u64) -> Self {
        WorldRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an `NpcRng` for `npc` from this generator's stream.
    pub fn npc_rng(&mut self, npc: NpcId) -> NpcRng {
        let seed: u64 = self.0.r#gen::<u64>();
        NpcRng::new(seed, npc)
    }
}

impl RandomSource for WorldRng {
    #[inline]
    fn index(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..upper)
    }

    #[inline]
    fn inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        self.0.gen_range(lo..=hi)
    }
}
