//! The state table: per-mode `enter` / `update` / `exit` handlers.
//!
//! Every mode change goes through [`CheckpointBehaviorController::transition`],
//! which runs the old mode's `exit`, swaps the mode, then runs the new mode's
//! `enter`.  An `enter` handler may itself transition (an empty pool drops to
//! `Idle`, a spent action count moves on to `Traveling`).
//!
//! ```text
//!            go_to_next_checkpoint          arrival
//!   Idle ───────────────────────► Traveling ───────► AtCheckpoint ─┐
//!    ▲                               ▲                 │  ▲        │ action done,
//!    │ empty pool / route            └─────────────────┘  └────────┘ count > 0
//!    │                                  count == 0
//!    └── any mode ◄──► Interacting (interrupt / resume)
//! ```

use npc_core::{Timer, WaitError, WaitPoll};
use npc_services::{NpcContext, has_arrived};
use tracing::debug;

use crate::{ActionPhase, BehaviorMode, CheckpointBehaviorController, ModeKind};

type Handler = fn(&mut CheckpointBehaviorController, &mut NpcContext<'_>) -> Result<(), WaitError>;

pub(crate) struct StateHandlers {
    pub enter:  Handler,
    pub update: Handler,
    pub exit:   Handler,
}

const HANDLERS: [StateHandlers; 4] = [
    // Idle
    StateHandlers { enter: enter_idle, update: nothing, exit: nothing },
    // Traveling
    StateHandlers { enter: enter_traveling, update: update_traveling, exit: nothing },
    // AtCheckpoint
    StateHandlers { enter: enter_at_checkpoint, update: update_at_checkpoint, exit: exit_at_checkpoint },
    // Interacting
    StateHandlers { enter: nothing, update: nothing, exit: nothing },
];

#[inline]
pub(crate) fn handlers(kind: ModeKind) -> &'static StateHandlers {
    &HANDLERS[kind as usize]
}

fn nothing(_: &mut CheckpointBehaviorController, _: &mut NpcContext<'_>) -> Result<(), WaitError> {
    Ok(())
}

// ── Idle ──────────────────────────────────────────────────────────────────────

fn enter_idle(_: &mut CheckpointBehaviorController, ctx: &mut NpcContext<'_>) -> Result<(), WaitError> {
    ctx.nav.stop();
    ctx.play_idle();
    Ok(())
}

// ── Traveling ─────────────────────────────────────────────────────────────────

fn enter_traveling(
    c:   &mut CheckpointBehaviorController,
    ctx: &mut NpcContext<'_>,
) -> Result<(), WaitError> {
    let Some(checkpoint) = c.state.mode.checkpoint() else {
        return Ok(());
    };
    match c.route.checkpoint(checkpoint) {
        Some(cp) => {
            ctx.nav.set_destination(cp.position);
            Ok(())
        }
        None => c.lost_checkpoint(checkpoint, ctx),
    }
}

fn update_traveling(
    c:   &mut CheckpointBehaviorController,
    ctx: &mut NpcContext<'_>,
) -> Result<(), WaitError> {
    let BehaviorMode::Traveling { checkpoint, carry } = c.state.mode else {
        return Ok(());
    };
    if !has_arrived(&*ctx.nav) {
        return Ok(());
    }
    let Some(cp) = c.route.checkpoint(checkpoint) else {
        return c.lost_checkpoint(checkpoint, ctx);
    };
    match carry {
        Some(count) => c.state.actions_remaining = count,
        None => {
            ctx.fire_opt(cp.on_arrive.as_ref());
            c.state.actions_remaining = cp.pool.roll_action_count(&mut *ctx.rng);
        }
    }
    debug!(
        npc = %ctx.npc,
        checkpoint = %cp.name,
        actions = c.state.actions_remaining,
        resumed = carry.is_some(),
        "arrived"
    );
    c.transition(BehaviorMode::AtCheckpoint { checkpoint }, ctx)
}

// ── AtCheckpoint ──────────────────────────────────────────────────────────────

fn enter_at_checkpoint(
    c:   &mut CheckpointBehaviorController,
    ctx: &mut NpcContext<'_>,
) -> Result<(), WaitError> {
    let BehaviorMode::AtCheckpoint { checkpoint } = c.state.mode else {
        return Ok(());
    };
    if let Some(parked) = c.parked_action.take() {
        return c.restore_action(checkpoint, parked, ctx);
    }
    c.start_next_action(checkpoint, ctx)
}

fn update_at_checkpoint(
    c:   &mut CheckpointBehaviorController,
    ctx: &mut NpcContext<'_>,
) -> Result<(), WaitError> {
    let Some(progress) = c.action.as_mut() else {
        return Ok(());
    };
    match progress.timer.poll(&c.scope, ctx.dt)? {
        WaitPoll::Pending { .. } | WaitPoll::Cancelled { .. } => Ok(()),
        WaitPoll::Elapsed => match progress.phase {
            ActionPhase::First => {
                // Midpoint: the action now counts.
                c.state.actions_remaining = c.state.actions_remaining.saturating_sub(1);
                progress.phase = ActionPhase::Second;
                let token = c.scope.arm();
                progress.timer = Timer::start(&c.scope, token, progress.second_half)?;
                debug!(
                    npc = %ctx.npc,
                    action = progress.action_index,
                    remaining = c.state.actions_remaining,
                    "action midpoint"
                );
                Ok(())
            }
            ActionPhase::Second => c.finish_action(ctx),
        },
    }
}

fn exit_at_checkpoint(
    c:   &mut CheckpointBehaviorController,
    ctx: &mut NpcContext<'_>,
) -> Result<(), WaitError> {
    // Only an external redirect leaves with an action still running.
    if let Some(progress) = c.action.take() {
        c.scope.disarm();
        if let Some(checkpoint) = c.state.mode.checkpoint() {
            c.fire_end_hook(checkpoint, progress.action_index, ctx);
        }
        ctx.play_idle();
    }
    Ok(())
}
