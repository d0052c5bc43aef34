//! `CheckpointBehaviorController` — patrol a route, perform actions at each
//! checkpoint, and survive interruption mid-action.
//!
//! # Two-phase actions
//!
//! ```text
//!   dispense ──► phase 1 (d/2) ──► midpoint ──► phase 2 (d - d/2) ──► done
//!   play clip               actions_remaining -= 1          play idle
//!   fire on_start                                           fire on_end
//! ```
//!
//! An interrupt in either phase freezes the phase's remaining wait.  Resuming
//! re-enters the same phase with that wait, so the start hook never fires
//! twice and the action is counted exactly once.

use npc_core::{Millis, Timer, WaitError, WaitPoll, WaitScope};
use npc_plan::PatrolRoute;
use npc_services::{Interruptible, NpcContext};
use tracing::{debug, error, warn};

use crate::table::handlers;
use crate::{
    ActionPhase, ActionProgress, BehaviorError, BehaviorMode, BehaviorResult, BehaviorState,
    ParkedAction, ResumeSnapshot,
};

/// Patrol driver for one NPC.
#[derive(Debug)]
pub struct CheckpointBehaviorController {
    pub(crate) route:         PatrolRoute,
    pub(crate) state:         BehaviorState,
    pub(crate) action:        Option<ActionProgress>,
    /// Action to pick back up when the NPC is next at its checkpoint.
    pub(crate) parked_action: Option<ParkedAction>,
    pub(crate) scope:         WaitScope,
}

impl CheckpointBehaviorController {
    pub fn new(route: PatrolRoute) -> Self {
        Self {
            route,
            state: BehaviorState::default(),
            action: None,
            parked_action: None,
            scope: WaitScope::new(),
        }
    }

    /// Make the first `go_to_next_checkpoint` continue from `index`, as if the
    /// NPC had just left it.
    pub fn starting_after(mut self, index: usize) -> BehaviorResult<Self> {
        if index >= self.route.len() {
            return Err(BehaviorError::Config(format!(
                "start checkpoint {index} out of range for a route of {}",
                self.route.len()
            )));
        }
        self.route = self.route.starting_at(index);
        Ok(self)
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn state(&self) -> &BehaviorState {
        &self.state
    }

    #[inline]
    pub fn mode(&self) -> BehaviorMode {
        self.state.mode
    }

    pub fn route(&self) -> &PatrolRoute {
        &self.route
    }

    /// Index, phase, and time left of the running action.
    pub fn current_action(&self) -> Option<(usize, ActionPhase, Millis)> {
        self.action
            .as_ref()
            .map(|p| (p.action_index, p.phase, p.timer.remaining()))
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Begin patrolling.  Equivalent to `go_to_next_checkpoint` from `Idle`.
    pub fn start(&mut self, ctx: &mut NpcContext<'_>) -> BehaviorResult<()> {
        self.go_to_next_checkpoint(ctx)
    }

    /// Pick the next checkpoint by the route's policy and travel to it.
    ///
    /// Ignored while interacting.  An empty route leaves the NPC idle.
    pub fn go_to_next_checkpoint(&mut self, ctx: &mut NpcContext<'_>) -> BehaviorResult<()> {
        if self.state.snapshot.is_some() {
            warn!(npc = %ctx.npc, "go_to_next_checkpoint ignored while interacting");
            return Ok(());
        }
        self.advance_checkpoint(ctx)?;
        Ok(())
    }

    /// Run the current mode's update handler once.
    pub fn tick(&mut self, ctx: &mut NpcContext<'_>) -> BehaviorResult<()> {
        let update = handlers(self.state.mode.kind()).update;
        update(self, ctx)?;
        Ok(())
    }

    // ── State table plumbing ──────────────────────────────────────────────

    /// The only place `state.mode` changes.
    pub(crate) fn transition(
        &mut self,
        next: BehaviorMode,
        ctx:  &mut NpcContext<'_>,
    ) -> Result<(), WaitError> {
        let from = self.state.mode;
        (handlers(from.kind()).exit)(self, ctx)?;
        debug!(npc = %ctx.npc, ?from, to = ?next, "behavior transition");
        self.state.mode = next;
        (handlers(next.kind()).enter)(self, ctx)
    }

    pub(crate) fn advance_checkpoint(&mut self, ctx: &mut NpcContext<'_>) -> Result<(), WaitError> {
        if let Some(parked) = self.parked_action.take() {
            // Leaving before the frozen action could finish; close it out.
            if let Some(checkpoint) = self.state.mode.checkpoint() {
                self.fire_end_hook(checkpoint, parked.action_index, ctx);
            }
        }
        match self.route.next_checkpoint(&mut *ctx.rng) {
            Some(checkpoint) => {
                self.transition(BehaviorMode::Traveling { checkpoint, carry: None }, ctx)
            }
            None => {
                warn!(npc = %ctx.npc, "patrol route is empty; staying idle");
                if self.state.mode == BehaviorMode::Idle {
                    return Ok(());
                }
                self.transition(BehaviorMode::Idle, ctx)
            }
        }
    }

    pub(crate) fn lost_checkpoint(
        &mut self,
        checkpoint: usize,
        ctx:        &mut NpcContext<'_>,
    ) -> Result<(), WaitError> {
        error!(npc = %ctx.npc, checkpoint, "checkpoint index not on route; going idle");
        self.transition(BehaviorMode::Idle, ctx)
    }

    // ── Actions ───────────────────────────────────────────────────────────

    /// Dispense the next action at `checkpoint`, or move on / go idle.
    pub(crate) fn start_next_action(
        &mut self,
        checkpoint: usize,
        ctx:        &mut NpcContext<'_>,
    ) -> Result<(), WaitError> {
        let Some(cp) = self.route.checkpoint_mut(checkpoint) else {
            return self.lost_checkpoint(checkpoint, ctx);
        };
        if cp.pool.is_empty() {
            warn!(npc = %ctx.npc, checkpoint = %cp.name, "action pool is empty; going idle");
            return self.transition(BehaviorMode::Idle, ctx);
        }
        if self.state.actions_remaining == 0 {
            return self.advance_checkpoint(ctx);
        }

        let pool = &mut cp.pool;
        let Some((index, spec)) = pool.next_action(&mut *ctx.rng).map(|(i, s)| (i, s.clone())) else {
            return self.transition(BehaviorMode::Idle, ctx);
        };
        let duration = pool.duration_for(&spec, |clip| ctx.anim.clip_length(clip));
        let (first, second) = duration.halves();

        match &spec.clip {
            Some(clip) if ctx.clip_length(clip).is_some() => ctx.play(clip),
            Some(clip) => {
                warn!(npc = %ctx.npc, %clip, action = %spec.name, "clip missing; skipping playback")
            }
            None => {}
        }
        ctx.fire_opt(spec.on_start.as_ref());

        let token = self.scope.arm();
        let timer = Timer::start(&self.scope, token, first)?;
        self.action = Some(ActionProgress {
            action_index: index,
            phase: ActionPhase::First,
            timer,
            second_half: second,
        });
        debug!(
            npc = %ctx.npc,
            checkpoint,
            action = index,
            name = %spec.name,
            %duration,
            remaining = self.state.actions_remaining,
            "action dispensed"
        );
        Ok(())
    }

    /// Phase 2 elapsed: return to idle, fire the end hook, then either start
    /// the next action or move on.
    pub(crate) fn finish_action(&mut self, ctx: &mut NpcContext<'_>) -> Result<(), WaitError> {
        let Some(progress) = self.action.take() else {
            return Ok(());
        };
        self.scope.disarm();
        ctx.play_idle();
        let Some(checkpoint) = self.state.mode.checkpoint() else {
            return Ok(());
        };
        self.fire_end_hook(checkpoint, progress.action_index, ctx);
        debug!(npc = %ctx.npc, action = progress.action_index, remaining = self.state.actions_remaining, "action done");

        if self.state.actions_remaining == 0 {
            self.advance_checkpoint(ctx)
        } else {
            self.transition(BehaviorMode::AtCheckpoint { checkpoint }, ctx)
        }
    }

    pub(crate) fn fire_end_hook(&self, checkpoint: usize, action_index: usize, ctx: &mut NpcContext<'_>) {
        let on_end = self
            .route
            .checkpoint(checkpoint)
            .and_then(|cp| cp.pool.action(action_index))
            .and_then(|a| a.on_end.as_ref());
        ctx.fire_opt(on_end);
    }

    /// Re-enter a frozen action in the phase it was interrupted in.
    pub(crate) fn restore_action(
        &mut self,
        checkpoint: usize,
        parked:     ParkedAction,
        ctx:        &mut NpcContext<'_>,
    ) -> Result<(), WaitError> {
        let clip = self
            .route
            .checkpoint(checkpoint)
            .and_then(|cp| cp.pool.action(parked.action_index))
            .and_then(|a| a.clip.as_ref());
        if let Some(clip) = clip {
            if ctx.clip_length(clip).is_some() {
                ctx.play(clip);
            }
        }
        let token = self.scope.arm();
        let timer = Timer::start(&self.scope, token, parked.remaining)?;
        self.action = Some(ActionProgress {
            action_index: parked.action_index,
            phase:        parked.phase,
            timer,
            second_half:  parked.second_half,
        });
        debug!(npc = %ctx.npc, action = parked.action_index, phase = ?parked.phase, remaining = %parked.remaining, "action resumed");
        Ok(())
    }
}

// ── Interruptible ─────────────────────────────────────────────────────────────

impl Interruptible for CheckpointBehaviorController {
    fn is_interrupted(&self) -> bool {
        self.state.was_interrupted()
    }

    fn interrupt(&mut self, ctx: &mut NpcContext<'_>) -> Result<bool, WaitError> {
        if self.state.snapshot.is_some() {
            return Ok(false);
        }
        self.scope.cancel();
        let action = match self.action.take() {
            Some(mut progress) => {
                let remaining = match progress.timer.poll(&self.scope, Millis::ZERO)? {
                    WaitPoll::Cancelled { remaining } | WaitPoll::Pending { remaining } => remaining,
                    WaitPoll::Elapsed => Millis::ZERO,
                };
                Some(ParkedAction {
                    action_index: progress.action_index,
                    phase: progress.phase,
                    remaining,
                    second_half: progress.second_half,
                })
            }
            // Walking back to a checkpoint with an action still frozen.
            None => self.parked_action.take(),
        };
        ctx.nav.stop();
        let snapshot = ResumeSnapshot { prior: self.state.mode, action };
        debug!(npc = %ctx.npc, ?snapshot, "behavior interrupted");
        self.state.snapshot = Some(snapshot);
        self.transition(BehaviorMode::Interacting, ctx)?;
        Ok(true)
    }

    fn resume(&mut self, ctx: &mut NpcContext<'_>) -> Result<bool, WaitError> {
        let Some(snapshot) = self.state.snapshot.take() else {
            debug_assert!(false, "behavior resumed without a snapshot");
            error!(npc = %ctx.npc, "behavior resumed without a snapshot; ignoring");
            return Ok(false);
        };
        self.scope.disarm();
        self.parked_action = snapshot.action;

        let next = match snapshot.prior {
            BehaviorMode::AtCheckpoint { checkpoint } => {
                // Height is the nav's business; only ground-plane drift counts.
                let drifted = self.route.checkpoint(checkpoint).is_some_and(|cp| {
                    ctx.nav.position().planar_distance(cp.position) > ctx.nav.stopping_distance()
                });
                if drifted {
                    // Moved while parked: walk back, keeping the count.
                    BehaviorMode::Traveling {
                        checkpoint,
                        carry: Some(self.state.actions_remaining),
                    }
                } else {
                    snapshot.prior
                }
            }
            other => other,
        };
        debug!(npc = %ctx.npc, to = ?next, "behavior resumed");
        self.transition(next, ctx)?;
        Ok(true)
    }
}
