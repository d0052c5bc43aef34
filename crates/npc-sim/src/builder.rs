//! Fluent builder for constructing a [`World`].

use npc_core::{ClipId, NpcId, NpcRng, WorldConfig, WorldRng};
use npc_services::{DialogueService, HookSink, QuestService};
use tracing::info;

use crate::{NpcSpec, Services, World, WorldError, WorldResult};

/// Separates the world stream from NPC 0's stream under the same seed.
const WORLD_STREAM: u64 = 0xa076_1d64_78bd_642f;

/// Fluent builder for [`World<D, Q, H>`].
///
/// # Required inputs
///
/// - [`WorldConfig`] — tick length, total ticks, seed, idle clip
/// - the three shared services: dialogue, quests, hooks
///
/// # Example
///
/// ```rust,ignore
/// let mut world = WorldBuilder::new(config, DialogueLog::default(), QuestLog::new(), HookLog::default())
///     .npc(NpcSpec::patrol(route, KinematicNav::new(start, 2.0, 0.2), clips.clone()))
///     .build()?;
/// world.run(&mut NoopObserver)?;
/// ```
pub struct WorldBuilder<D, Q, H> {
    config:   WorldConfig,
    services: Services<D, Q, H>,
    npcs:     Vec<NpcSpec>,
}

impl<D, Q, H> WorldBuilder<D, Q, H>
where
    D: DialogueService,
    Q: QuestService,
    H: HookSink,
{
    pub fn new(config: WorldConfig, dialogue: D, quests: Q, hooks: H) -> Self {
        Self { config, services: Services { dialogue, quests, hooks }, npcs: Vec::new() }
    }

    /// Add one NPC.  IDs are assigned in insertion order from `NpcId(0)`.
    pub fn npc(mut self, spec: NpcSpec) -> Self {
        self.npcs.push(spec);
        self
    }

    pub fn npcs(mut self, specs: impl IntoIterator<Item = NpcSpec>) -> Self {
        self.npcs.extend(specs);
        self
    }

    /// Validate inputs, seed per-NPC RNGs, start every patrol, and return a
    /// ready-to-run [`World`].
    pub fn build(self) -> WorldResult<World<D, Q, H>> {
        // ── Validate ──────────────────────────────────────────────────────
        if self.config.tick_ms == 0 {
            return Err(WorldError::Config("tick_ms must be non-zero".into()));
        }
        if self.config.idle_clip.is_empty() {
            return Err(WorldError::Config("idle_clip must name a clip".into()));
        }
        if u32::try_from(self.npcs.len()).is_err() {
            return Err(WorldError::Config(format!("{} npcs exceed the id space", self.npcs.len())));
        }

        // ── Assemble NPCs ─────────────────────────────────────────────────
        let seed = self.config.seed;
        let npcs = self
            .npcs
            .into_iter()
            .enumerate()
            .map(|(i, spec)| {
                let id = NpcId(i as u32);
                spec.into_npc(id, NpcRng::new(seed, id))
            })
            .collect::<Vec<_>>();

        info!(npcs = npcs.len(), tick_ms = self.config.tick_ms, seed, "world built");

        let mut world = World {
            clock:          self.config.make_clock(),
            idle_clip:      ClipId::from(self.config.idle_clip.as_str()),
            config:         self.config,
            npcs,
            services:       self.services,
            world_rng:      WorldRng::new(seed ^ WORLD_STREAM),
            signals:        Default::default(),
            choreographies: Vec::new(),
        };

        for i in 0..world.npcs.len() {
            world.start_driver(NpcId(i as u32))?;
        }
        Ok(world)
    }
}
