//! One NPC as the world stores it: a driver, an optional arbiter, and the
//! bodies the driver moves.

use npc_behavior::{BehaviorMode, CheckpointBehaviorController};
use npc_core::{ClipId, Millis, NpcId, NpcRng, Position};
use npc_interact::{InteractionArbiter, InteractionProfile};
use npc_plan::PatrolRoute;
use npc_sequence::SequenceEngine;
use npc_services::{
    Animation, DialogueService, HookSink, Interruptible, Navigation, NpcContext, QuestService,
};

// ── Driver ────────────────────────────────────────────────────────────────────

/// What decides an NPC's next move.
#[derive(Debug)]
pub enum Driver {
    /// Checkpoint patrol with random or ordered action pools.
    Patrol(CheckpointBehaviorController),
    /// Authored step list, advanced by the host or by choreography.
    Scripted(SequenceEngine),
}

impl Driver {
    pub fn as_interruptible(&mut self) -> &mut dyn Interruptible {
        match self {
            Driver::Patrol(c) => c,
            Driver::Scripted(s) => s,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        match self {
            Driver::Patrol(c) => c.is_interrupted(),
            Driver::Scripted(s) => s.is_interrupted(),
        }
    }

    /// Patrol mode, or `None` for scripted NPCs.
    pub fn patrol_mode(&self) -> Option<BehaviorMode> {
        match self {
            Driver::Patrol(c) => Some(c.mode()),
            Driver::Scripted(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Driver::Patrol(_) => "patrol",
            Driver::Scripted(_) => "script",
        }
    }
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Per-NPC collaborators: the pieces of `NpcContext` the NPC owns.
pub struct NpcBody {
    pub nav:  Box<dyn Navigation>,
    pub anim: Box<dyn Animation>,
    pub(crate) rng: NpcRng,
}

/// Shared collaborators, one set per world.
#[derive(Debug, Default)]
pub struct Services<D, Q, H> {
    pub dialogue: D,
    pub quests:   Q,
    pub hooks:    H,
}

impl NpcBody {
    pub(crate) fn context<'a, D, Q, H>(
        &'a mut self,
        npc:       NpcId,
        now:       Millis,
        dt:        Millis,
        idle_clip: &'a ClipId,
        services:  &'a mut Services<D, Q, H>,
    ) -> NpcContext<'a>
    where
        D: DialogueService,
        Q: QuestService,
        H: HookSink,
    {
        NpcContext {
            npc,
            now,
            dt,
            idle_clip,
            nav:      self.nav.as_mut(),
            anim:     self.anim.as_mut(),
            dialogue: &mut services.dialogue,
            quests:   &mut services.quests,
            hooks:    &mut services.hooks,
            rng:      &mut self.rng,
        }
    }
}

// ── Npc ───────────────────────────────────────────────────────────────────────

pub struct Npc {
    pub id:      NpcId,
    pub driver:  Driver,
    pub arbiter: Option<InteractionArbiter>,
    pub body:    NpcBody,
}

impl Npc {
    #[inline]
    pub fn position(&self) -> Position {
        self.body.nav.position()
    }

    /// `true` while a player interaction holds this NPC.
    pub fn is_engaged(&self) -> bool {
        self.arbiter.as_ref().is_some_and(InteractionArbiter::is_engaged)
    }
}

// ── NpcSpec ───────────────────────────────────────────────────────────────────

/// Everything needed to add one NPC to a world.
pub struct NpcSpec {
    pub driver:  Driver,
    pub nav:     Box<dyn Navigation>,
    pub anim:    Box<dyn Animation>,
    pub profile: Option<InteractionProfile>,
}

impl NpcSpec {
    pub fn patrol(
        route: PatrolRoute,
        nav:   impl Navigation + 'static,
        anim:  impl Animation + 'static,
    ) -> Self {
        Self::with_driver(Driver::Patrol(CheckpointBehaviorController::new(route)), nav, anim)
    }

    pub fn scripted(
        engine: SequenceEngine,
        nav:    impl Navigation + 'static,
        anim:   impl Animation + 'static,
    ) -> Self {
        Self::with_driver(Driver::Scripted(engine), nav, anim)
    }

    pub fn with_driver(
        driver: Driver,
        nav:    impl Navigation + 'static,
        anim:   impl Animation + 'static,
    ) -> Self {
        Self { driver, nav: Box::new(nav), anim: Box::new(anim), profile: None }
    }

    /// Let the player interact with this NPC.
    pub fn interactive(mut self, profile: InteractionProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub(crate) fn into_npc(self, id: NpcId, rng: NpcRng) -> Npc {
        Npc {
            id,
            driver:  self.driver,
            arbiter: self.profile.map(InteractionArbiter::new),
            body:    NpcBody { nav: self.nav, anim: self.anim, rng },
        }
    }
}
