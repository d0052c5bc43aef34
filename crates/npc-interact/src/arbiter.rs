//! `InteractionArbiter` — the player's handle on one NPC.
//!
//! # Choreography
//!
//! ```text
//!   interact ─► driver.interrupt ─► turn to player (yaw only, turn_duration)
//!                                          │ elapsed
//!                                          ▼
//!                               start dialogue for quest state
//!                                          │ that dialogue ended
//!                                          ▼
//!                      release_on_dialogue_end ? driver.resume : hold
//!
//!   interact while engaged ─► driver.resume (toggle)
//! ```
//!
//! Dialogue never starts before the turn completes.

use npc_core::{DialogueId, Position, Timer, WaitPoll, WaitScope, Yaw};
use npc_services::{Interruptible, NpcContext, QuestState};
use tracing::{debug, info};

use crate::{InteractError, InteractResult, InteractionProfile};

/// What an `interact` call did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InteractOutcome {
    /// The NPC was parked and is turning to the player.
    Engaged,
    /// The NPC was handed back to its driver.
    Released,
}

#[derive(Debug)]
enum Phase {
    Free,
    Turning { from: Yaw, to: Yaw, timer: Timer },
    Talking { dialogue: DialogueId },
    /// Dialogue over, waiting for the player to release the NPC.
    Holding,
}

#[derive(Debug)]
pub struct InteractionArbiter {
    profile: InteractionProfile,
    phase:   Phase,
    scope:   WaitScope,
}

impl InteractionArbiter {
    pub fn new(profile: InteractionProfile) -> Self {
        Self { profile, phase: Phase::Free, scope: WaitScope::new() }
    }

    pub fn profile(&self) -> &InteractionProfile {
        &self.profile
    }

    /// `true` from `interact` until the NPC is released.
    pub fn is_engaged(&self) -> bool {
        !matches!(self.phase, Phase::Free)
    }

    pub fn is_turning(&self) -> bool {
        matches!(self.phase, Phase::Turning { .. })
    }

    /// Dialogue this arbiter started and is waiting on, if any.
    pub fn active_dialogue(&self) -> Option<&DialogueId> {
        match &self.phase {
            Phase::Talking { dialogue } => Some(dialogue),
            _ => None,
        }
    }

    /// Toggle: park the NPC and turn to `player`, or release it if engaged.
    pub fn interact(
        &mut self,
        driver: &mut dyn Interruptible,
        player: Position,
        ctx:    &mut NpcContext<'_>,
    ) -> InteractResult<InteractOutcome> {
        if self.is_engaged() {
            self.release(driver, ctx)?;
            return Ok(InteractOutcome::Released);
        }
        if !driver.interrupt(ctx)? {
            return Err(InteractError::DriverBusy(ctx.npc));
        }
        info!(npc = %ctx.npc, "player interaction");

        let from = ctx.nav.facing();
        match ctx.nav.position().yaw_to(player) {
            Some(to) if !self.profile.turn_duration.is_zero() => {
                let token = self.scope.arm();
                let timer = Timer::start(&self.scope, token, self.profile.turn_duration)?;
                self.phase = Phase::Turning { from, to, timer };
            }
            Some(to) => {
                ctx.nav.set_facing(to);
                self.start_dialogue(ctx);
            }
            // Player stands on the NPC: no facing to turn to.
            None => self.start_dialogue(ctx),
        }
        Ok(InteractOutcome::Engaged)
    }

    /// Advance the turn.
    pub fn tick(&mut self, ctx: &mut NpcContext<'_>) -> InteractResult<()> {
        let Phase::Turning { from, to, timer } = &mut self.phase else {
            return Ok(());
        };
        let done = matches!(timer.poll(&self.scope, ctx.dt)?, WaitPoll::Elapsed);
        ctx.nav.set_facing(if done { *to } else { from.lerp(*to, timer.progress()) });
        if done {
            self.scope.disarm();
            self.start_dialogue(ctx);
        }
        Ok(())
    }

    /// Route the end of `dialogue`.  Returns `true` if it was the dialogue
    /// this arbiter started; any other dialogue is left for the driver.
    pub fn on_dialogue_end(
        &mut self,
        driver:   &mut dyn Interruptible,
        dialogue: &DialogueId,
        ctx:      &mut NpcContext<'_>,
    ) -> InteractResult<bool> {
        if self.active_dialogue() != Some(dialogue) {
            return Ok(false);
        }
        if self.profile.release_on_dialogue_end {
            self.release(driver, ctx)?;
        } else {
            self.phase = Phase::Holding;
        }
        Ok(true)
    }

    /// Hand the NPC back to its driver.
    pub fn release(
        &mut self,
        driver: &mut dyn Interruptible,
        ctx:    &mut NpcContext<'_>,
    ) -> InteractResult<()> {
        if !self.is_engaged() {
            return Ok(());
        }
        if self.is_turning() {
            self.scope.cancel();
        }
        self.scope.disarm();
        self.phase = Phase::Free;
        driver.resume(ctx)?;
        info!(npc = %ctx.npc, "released");
        Ok(())
    }

    fn start_dialogue(&mut self, ctx: &mut NpcContext<'_>) {
        let state = self
            .profile
            .quest
            .as_ref()
            .map_or(QuestState::NotStarted, |q| ctx.quests.state(q));
        let dialogue = self.profile.dialogues.for_state(state).clone();

        if let (true, QuestState::NotStarted, Some(quest)) =
            (self.profile.begins_quest, state, self.profile.quest.as_ref())
        {
            ctx.quests.begin(quest);
        }
        debug!(npc = %ctx.npc, %dialogue, ?state, "dialogue start");
        ctx.dialogue.start_dialogue(ctx.npc, &dialogue);
        self.phase = Phase::Talking { dialogue };
    }
}
