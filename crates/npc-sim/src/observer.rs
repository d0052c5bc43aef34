//! World observer trait for progress reporting and test probes.

use npc_core::{NpcId, Tick};

use crate::{Npc, Signal};

/// Callbacks invoked by [`World::run`][crate::World::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — position logger
///
/// ```rust,ignore
/// struct Trail(Vec<(Tick, Position)>);
///
/// impl WorldObserver for Trail {
///     fn on_tick_end(&mut self, tick: Tick, npcs: &[Npc]) {
///         self.0.push((tick, npcs[0].position()));
///     }
/// }
/// ```
pub trait WorldObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called for every queued signal as it is delivered.
    fn on_signal(&mut self, _tick: Tick, _npc: NpcId, _signal: &Signal) {}

    /// Called when a choreography starts one of its beats.
    fn on_beat(&mut self, _tick: Tick, _choreography: &str, _npc: NpcId, _step: usize) {}

    /// Called at the end of each tick with read access to every NPC.
    fn on_tick_end(&mut self, _tick: Tick, _npcs: &[Npc]) {}

    /// Called once after the final tick completes.
    fn on_world_end(&mut self, _final_tick: Tick) {}
}

/// A [`WorldObserver`] that does nothing.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}
