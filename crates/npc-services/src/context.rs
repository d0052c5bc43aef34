//! Per-tick context handed to every NPC driver.

use npc_core::{ClipId, HookId, Millis, NpcId, RandomSource};

use crate::{Animation, DEFAULT_BLEND, DialogueService, HookSink, Navigation, QuestService};

/// Everything one NPC's driver may touch during one tick.
///
/// The world assembles a fresh `NpcContext` for each NPC from that NPC's own
/// navigation / animation bodies plus the shared dialogue, quest, and hook
/// services.  Drivers receive collaborators only through this struct; nothing
/// is looked up globally.
///
/// # Lifetimes
///
/// All borrows live for one driver call.  Because the context holds
/// `&mut` to the NPC's bodies, no other NPC can be driven while it is live.
pub struct NpcContext<'a> {
    pub npc: NpcId,

    /// Game time at the start of this tick.
    pub now: Millis,

    /// Time step being applied this tick.
    pub dt: Millis,

    /// Clip an NPC returns to between actions.
    pub idle_clip: &'a ClipId,

    pub nav:      &'a mut dyn Navigation,
    pub anim:     &'a mut dyn Animation,
    pub dialogue: &'a mut dyn DialogueService,
    pub quests:   &'a mut dyn QuestService,
    pub hooks:    &'a mut dyn HookSink,
    pub rng:      &'a mut dyn RandomSource,
}

impl NpcContext<'_> {
    /// Play `clip` with the default blend.
    #[inline]
    pub fn play(&mut self, clip: &ClipId) {
        self.anim.play(clip, DEFAULT_BLEND);
    }

    #[inline]
    pub fn play_idle(&mut self) {
        let idle = self.idle_clip;
        self.anim.play(idle, DEFAULT_BLEND);
    }

    #[inline]
    pub fn fire(&mut self, hook: &HookId) {
        self.hooks.fire(self.npc, hook);
    }

    /// Fire `hook` if one is authored.
    #[inline]
    pub fn fire_opt(&mut self, hook: Option<&HookId>) {
        if let Some(hook) = hook {
            self.hooks.fire(self.npc, hook);
        }
    }

    /// Clip length from the animation service.
    #[inline]
    pub fn clip_length(&self, clip: &ClipId) -> Option<Millis> {
        self.anim.clip_length(clip)
    }
}

/// A driver the interaction layer can park and release.
///
/// Both the checkpoint controller and the scripted sequence engine implement
/// this.  `interrupt` cancels the driver's live wait, captures a resumption
/// snapshot, and stops the NPC in place; `resume` re-arms a fresh wait from
/// the snapshot.
pub trait Interruptible {
    /// `true` between a successful `interrupt` and the matching `resume`.
    fn is_interrupted(&self) -> bool;

    /// Returns `Ok(false)` if the driver was already interrupted.
    fn interrupt(&mut self, ctx: &mut NpcContext<'_>) -> Result<bool, npc_core::WaitError>;

    /// Returns `Ok(false)` when there is no snapshot to resume from, which is
    /// a caller bug: debug builds assert, release builds log and do nothing.
    fn resume(&mut self, ctx: &mut NpcContext<'_>) -> Result<bool, npc_core::WaitError>;
}
