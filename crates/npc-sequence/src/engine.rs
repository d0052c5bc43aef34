//! `SequenceEngine` — runs one NPC's scripted steps.
//!
//! # Step lifecycle
//!
//! ```text
//! start_sequence(i) ─► begin step i ─┬─ completes at once ─► finish ─┐
//!                                    └─ active (walk / timer / turn / │
//!                                       dialogue), polled by tick ────┤
//!                                                                     ▼
//!                                   auto_advance ? start next : park at i
//! ```
//!
//! Steps that complete immediately (non-blocking animate, custom, a turn that
//! is already facing its target) chain through auto-advance within the same
//! call.  A chain is cut after one pass over the list so a wrapped list of
//! instant steps cannot spin forever.
//!
//! # Tickets
//!
//! [`SequenceEngine::start_sequence_awaitable`] hands back a [`StepTicket`].
//! It reads `Completed` once the step it started finishes, or `Superseded` if
//! the engine was redirected to another step first.  Only the last
//! [`TICKET_HISTORY`] settled tickets are remembered; older ones read
//! `Expired`.

use std::collections::VecDeque;

use npc_core::{DialogueId, Millis, Position, Timer, WaitError, WaitPoll, WaitScope, Yaw};
use npc_services::{Interruptible, NpcContext, within_stopping_distance};
use tracing::{debug, error, warn};

use crate::{SequenceError, SequenceResult, SequenceStep, StepKind};

// ── Tickets ───────────────────────────────────────────────────────────────────

/// Settled tickets kept for [`SequenceEngine::ticket_status`].
pub const TICKET_HISTORY: usize = 32;

/// Handle to one awaitable step start.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StepTicket(u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TicketStatus {
    Pending,
    Completed,
    /// The engine moved to another step before this one completed.
    Superseded,
    /// Settled too long ago to remember, or never issued by this engine.
    Expired,
}

// ── Internal step state ───────────────────────────────────────────────────────

#[derive(Debug)]
enum ActiveStep {
    Walking { destination: Position },
    Timed(Timer),
    Turning { from: Yaw, to: Yaw, timer: Timer },
    AwaitingDialogue,
}

/// What an interrupted step needs to pick up where it left off.
#[derive(Clone, Debug, PartialEq)]
enum Parked {
    /// No step was running.
    Idle,
    /// Redirected while interrupted; start the step fresh on resume.
    NotStarted,
    Walking { destination: Position },
    Timed { remaining: Millis },
    Turning { to: Yaw, remaining: Millis },
    AwaitingDialogue,
}

#[derive(Clone, Debug, PartialEq)]
struct SequenceSnapshot {
    index:  Option<usize>,
    parked: Parked,
}

// ── SequenceEngine ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct SequenceEngine {
    steps:    Vec<SequenceStep>,
    wrap:     bool,
    cursor:   Option<usize>,
    active:   Option<ActiveStep>,
    scope:    WaitScope,
    snapshot: Option<SequenceSnapshot>,
    awaited:  Option<StepTicket>,
    settled:  VecDeque<(StepTicket, TicketStatus)>,
    issued:   u32,
}

impl SequenceEngine {
    /// A wrapped list restarts at step 0 after the last step; a one-shot list
    /// holds at the last step.
    pub fn new(steps: Vec<SequenceStep>, wrap: bool) -> Self {
        Self {
            steps,
            wrap,
            cursor: None,
            active: None,
            scope: WaitScope::new(),
            snapshot: None,
            awaited: None,
            settled: VecDeque::with_capacity(TICKET_HISTORY),
            issued: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[SequenceStep] {
        &self.steps
    }

    /// Index of the step last started.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// `true` while a step is waiting on its completion signal.
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Time left on the running step's timer, if it has one.
    pub fn active_remaining(&self) -> Option<Millis> {
        match &self.active {
            Some(ActiveStep::Timed(timer)) | Some(ActiveStep::Turning { timer, .. }) => {
                Some(timer.remaining())
            }
            _ => None,
        }
    }

    pub fn ticket_status(&self, ticket: StepTicket) -> TicketStatus {
        if self.awaited == Some(ticket) {
            return TicketStatus::Pending;
        }
        self.settled
            .iter()
            .rev()
            .find(|(t, _)| *t == ticket)
            .map_or(TicketStatus::Expired, |(_, status)| *status)
    }

    fn settle(&mut self, ticket: StepTicket, status: TicketStatus) {
        if self.settled.len() == TICKET_HISTORY {
            self.settled.pop_front();
        }
        self.settled.push_back((ticket, status));
    }

    // ── Starting steps ────────────────────────────────────────────────────

    /// Jump to step `index` and start it (fire-and-forget).
    pub fn start_sequence(&mut self, index: usize, ctx: &mut NpcContext<'_>) -> SequenceResult<()> {
        self.check_index(index)?;
        self.enter(index, ctx, None)?;
        Ok(())
    }

    /// Like [`start_sequence`](Self::start_sequence), returning a ticket that
    /// resolves when this step completes.
    pub fn start_sequence_awaitable(
        &mut self,
        index: usize,
        ctx:   &mut NpcContext<'_>,
    ) -> SequenceResult<StepTicket> {
        self.check_index(index)?;
        let ticket = StepTicket(self.issued);
        self.issued = self.issued.wrapping_add(1);
        self.enter(index, ctx, Some(ticket))?;
        Ok(ticket)
    }

    /// Move the cursor by `skip` and start that step.
    ///
    /// Wrapped lists wrap in both directions.  One-shot lists clamp below at
    /// step 0 and hold at the last step: once the last step has started,
    /// further calls are no-ops.
    pub fn start_next_sequence(&mut self, skip: isize, ctx: &mut NpcContext<'_>) -> SequenceResult<()> {
        if self.steps.is_empty() {
            return Err(SequenceError::Empty);
        }
        match self.next_index(skip) {
            Some(index) => self.enter(index, ctx, None)?,
            None => debug!(npc = %ctx.npc, cursor = ?self.cursor, "sequence holding at last step"),
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> SequenceResult<()> {
        if self.steps.is_empty() {
            return Err(SequenceError::Empty);
        }
        if index >= self.steps.len() {
            return Err(SequenceError::IndexOutOfRange { index, len: self.steps.len() });
        }
        Ok(())
    }

    /// `None` means hold (one-shot list already at its last step).
    fn next_index(&self, skip: isize) -> Option<usize> {
        let len = self.steps.len() as isize;
        let current = self.cursor.map_or(-1, |c| c as isize);
        let target = current + skip;
        if self.wrap {
            return Some(target.rem_euclid(len) as usize);
        }
        if target >= len {
            let last = len - 1;
            return (current != last).then_some(last as usize);
        }
        Some(target.max(0) as usize)
    }

    fn enter(
        &mut self,
        index:  usize,
        ctx:    &mut NpcContext<'_>,
        ticket: Option<StepTicket>,
    ) -> Result<(), WaitError> {
        if let Some(old) = self.awaited.take() {
            self.settle(old, TicketStatus::Superseded);
        }
        self.awaited = ticket;

        if self.snapshot.is_some() {
            debug!(npc = %ctx.npc, step = index, "sequence redirected while interrupted");
            self.cursor = Some(index);
            self.snapshot = Some(SequenceSnapshot { index: Some(index), parked: Parked::NotStarted });
            return Ok(());
        }

        if matches!(self.active, Some(ActiveStep::Walking { .. })) {
            ctx.nav.stop();
        }
        self.run_from(index, ctx)
    }

    fn run_from(&mut self, mut index: usize, ctx: &mut NpcContext<'_>) -> Result<(), WaitError> {
        for _ in 0..=self.steps.len() {
            self.cursor = Some(index);
            self.active = None;
            self.scope.disarm();
            if let Some(active) = self.begin_step(index, ctx)? {
                self.active = Some(active);
                return Ok(());
            }
            match self.finish_step(index, ctx) {
                Some(next) => index = next,
                None => return Ok(()),
            }
        }
        warn!(npc = %ctx.npc, step = index, "sequence chain of instant steps did not settle; parking");
        Ok(())
    }

    /// Start step `index`.  Returns `None` if it completed immediately.
    fn begin_step(
        &mut self,
        index: usize,
        ctx:   &mut NpcContext<'_>,
    ) -> Result<Option<ActiveStep>, WaitError> {
        let kind = &self.steps[index].kind;
        debug!(npc = %ctx.npc, step = index, kind = kind.label(), "sequence step start");

        match kind {
            StepKind::Walk { destination } => {
                ctx.nav.set_destination(*destination);
                Ok(Some(ActiveStep::Walking { destination: *destination }))
            }
            StepKind::Animate { clip, looping, blocking } => {
                ctx.play(clip);
                if !*blocking || *looping {
                    return Ok(None);
                }
                match ctx.clip_length(clip) {
                    Some(length) if !length.is_zero() => {
                        let token = self.scope.arm();
                        Ok(Some(ActiveStep::Timed(Timer::start(&self.scope, token, length)?)))
                    }
                    _ => {
                        warn!(npc = %ctx.npc, %clip, "blocking clip has no length; completing at once");
                        Ok(None)
                    }
                }
            }
            StepKind::Wait { duration } => {
                if duration.is_zero() {
                    return Ok(None);
                }
                let token = self.scope.arm();
                Ok(Some(ActiveStep::Timed(Timer::start(&self.scope, token, *duration)?)))
            }
            StepKind::TurnToFace { target, duration } => {
                let from = ctx.nav.facing();
                let Some(to) = ctx.nav.position().yaw_to(*target) else {
                    return Ok(None);
                };
                if duration.is_zero() {
                    ctx.nav.set_facing(to);
                    return Ok(None);
                }
                let token = self.scope.arm();
                let timer = Timer::start(&self.scope, token, *duration)?;
                Ok(Some(ActiveStep::Turning { from, to, timer }))
            }
            StepKind::Dialogue { dialogue } => {
                ctx.dialogue.start_dialogue(ctx.npc, dialogue);
                Ok(Some(ActiveStep::AwaitingDialogue))
            }
            StepKind::Custom(callback) => {
                let callback = callback.clone();
                callback.call(ctx);
                Ok(None)
            }
        }
    }

    /// Mark step `index` complete.  Returns the step to chain into, if any.
    fn finish_step(&mut self, index: usize, ctx: &NpcContext<'_>) -> Option<usize> {
        self.active = None;
        self.scope.disarm();
        if let Some(ticket) = self.awaited.take() {
            self.settle(ticket, TicketStatus::Completed);
        }
        debug!(npc = %ctx.npc, step = index, "sequence step complete");
        if self.steps[index].auto_advance {
            self.next_index(1)
        } else {
            None
        }
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Advance the running step by `ctx.dt`.
    pub fn tick(&mut self, ctx: &mut NpcContext<'_>) -> SequenceResult<()> {
        if self.snapshot.is_some() {
            return Ok(());
        }
        let Some(index) = self.cursor else {
            return Ok(());
        };

        let done = match &mut self.active {
            None | Some(ActiveStep::AwaitingDialogue) => false,
            Some(ActiveStep::Walking { .. }) => within_stopping_distance(&*ctx.nav),
            Some(ActiveStep::Timed(timer)) => {
                matches!(timer.poll(&self.scope, ctx.dt)?, WaitPoll::Elapsed)
            }
            Some(ActiveStep::Turning { from, to, timer }) => {
                let done = matches!(timer.poll(&self.scope, ctx.dt)?, WaitPoll::Elapsed);
                ctx.nav.set_facing(if done { *to } else { from.lerp(*to, timer.progress()) });
                done
            }
        };

        if done {
            if let Some(next) = self.finish_step(index, ctx) {
                self.run_from(next, ctx)?;
            }
        }
        Ok(())
    }

    /// Route the end of `dialogue`.  Returns `true` if the running Dialogue
    /// step started that dialogue and was waiting on it.
    pub fn on_dialogue_end(
        &mut self,
        dialogue: &DialogueId,
        ctx:      &mut NpcContext<'_>,
    ) -> SequenceResult<bool> {
        if self.snapshot.is_some() || !matches!(self.active, Some(ActiveStep::AwaitingDialogue)) {
            return Ok(false);
        }
        let Some(index) = self.cursor else {
            return Ok(false);
        };
        match &self.steps[index].kind {
            StepKind::Dialogue { dialogue: ours } if ours == dialogue => {}
            _ => {
                debug!(npc = %ctx.npc, %dialogue, step = index, "dialogue end for another dialogue; ignored");
                return Ok(false);
            }
        }
        if let Some(next) = self.finish_step(index, ctx) {
            self.run_from(next, ctx)?;
        }
        Ok(true)
    }
}

fn cancelled_remaining(timer: &mut Timer, scope: &WaitScope) -> Result<Millis, WaitError> {
    match timer.poll(scope, Millis::ZERO)? {
        WaitPoll::Cancelled { remaining } | WaitPoll::Pending { remaining } => Ok(remaining),
        WaitPoll::Elapsed => Ok(Millis::ZERO),
    }
}

impl Interruptible for SequenceEngine {
    fn is_interrupted(&self) -> bool {
        self.snapshot.is_some()
    }

    fn interrupt(&mut self, ctx: &mut NpcContext<'_>) -> Result<bool, WaitError> {
        if self.snapshot.is_some() {
            return Ok(false);
        }
        self.scope.cancel();
        let parked = match self.active.take() {
            None => Parked::Idle,
            Some(ActiveStep::Walking { destination }) => Parked::Walking { destination },
            Some(ActiveStep::Timed(mut timer)) => Parked::Timed {
                remaining: cancelled_remaining(&mut timer, &self.scope)?,
            },
            Some(ActiveStep::Turning { to, mut timer, .. }) => Parked::Turning {
                to,
                remaining: cancelled_remaining(&mut timer, &self.scope)?,
            },
            Some(ActiveStep::AwaitingDialogue) => Parked::AwaitingDialogue,
        };
        ctx.nav.stop();
        debug!(npc = %ctx.npc, step = ?self.cursor, ?parked, "sequence interrupted");
        self.snapshot = Some(SequenceSnapshot { index: self.cursor, parked });
        Ok(true)
    }

    fn resume(&mut self, ctx: &mut NpcContext<'_>) -> Result<bool, WaitError> {
        let Some(snapshot) = self.snapshot.take() else {
            debug_assert!(false, "sequence resumed without a snapshot");
            error!(npc = %ctx.npc, "sequence resumed without a snapshot; ignoring");
            return Ok(false);
        };
        self.scope.disarm();
        debug!(npc = %ctx.npc, step = ?snapshot.index, parked = ?snapshot.parked, "sequence resumed");

        let Some(index) = snapshot.index else {
            return Ok(true);
        };
        self.cursor = Some(index);
        self.active = match snapshot.parked {
            Parked::Idle => None,
            Parked::NotStarted => {
                self.run_from(index, ctx)?;
                return Ok(true);
            }
            Parked::Walking { destination } => {
                ctx.nav.set_destination(destination);
                Some(ActiveStep::Walking { destination })
            }
            Parked::Timed { remaining } => {
                let token = self.scope.arm();
                Some(ActiveStep::Timed(Timer::start(&self.scope, token, remaining)?))
            }
            Parked::Turning { to, remaining } => {
                let from = ctx.nav.facing();
                let token = self.scope.arm();
                Some(ActiveStep::Turning { from, to, timer: Timer::start(&self.scope, token, remaining)? })
            }
            Parked::AwaitingDialogue => {
                // The player's conversation displaced this one; start it again.
                if let StepKind::Dialogue { dialogue } = &self.steps[index].kind {
                    ctx.dialogue.start_dialogue(ctx.npc, dialogue);
                }
                Some(ActiveStep::AwaitingDialogue)
            }
        };
        Ok(true)
    }
}
