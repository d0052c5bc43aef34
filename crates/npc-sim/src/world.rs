//! The `World` struct and its tick loop.

use npc_core::{ClipId, DialogueId, GameClock, Millis, NpcId, Position, Tick, WorldConfig, WorldRng};
use npc_interact::{InteractOutcome, InteractionArbiter};
use npc_sequence::{StepTicket, TicketStatus};
use npc_services::{DialogueService, HookSink, NpcContext, QuestService};
use tracing::{debug, info, warn};

use crate::choreography::ChoreographyState;
use crate::{Choreography, Driver, Npc, NpcSpec, Services, WorldError, WorldObserver, WorldResult};

#[cfg(feature = "fx-hash")]
type SignalMap = rustc_hash::FxHashMap<NpcId, Vec<Signal>>;
#[cfg(not(feature = "fx-hash"))]
type SignalMap = std::collections::HashMap<NpcId, Vec<Signal>>;

// ── Signals ───────────────────────────────────────────────────────────────────

/// A deferred command for one NPC, delivered at the start of the next tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    /// The player interacted from `player`.
    Interact { player: Position },
    /// `dialogue`, started by this NPC's arbiter or script, has ended.
    DialogueEnded { dialogue: DialogueId },
    /// Patrol: leave for the next checkpoint.
    NextCheckpoint,
    /// Script: jump to step `index`.
    StartStep { index: usize },
    /// Script: move the cursor by `skip`.
    NextStep { skip: isize },
}

// ── World ─────────────────────────────────────────────────────────────────────

/// Every NPC in a scene plus the services they share.
///
/// Each tick runs four phases:
///
/// 1. **Signals**: queued [`Signal`]s are delivered in ascending `NpcId`
///    order.  A signal that fails is logged and dropped.
/// 2. **Bodies**: each NPC's navigation advances by one tick.
/// 3. **Drivers**: the arbiter (if engaged) and then the driver tick, in
///    ascending `NpcId` order.
/// 4. **Choreography**: chains whose awaited step has completed start their
///    next beat.
///
/// Direct commands (`interact`, `start_step`, …) act immediately between
/// ticks.  Create via [`WorldBuilder`][crate::WorldBuilder].
pub struct World<D, Q, H> {
    pub config: WorldConfig,
    pub clock:  GameClock,

    /// Indexed by `NpcId`.
    pub npcs: Vec<Npc>,

    /// Dialogue, quest, and hook services shared by every NPC.
    pub services: Services<D, Q, H>,

    pub(crate) idle_clip: ClipId,
    pub(crate) world_rng: WorldRng,
    pub(crate) signals:   SignalMap,
    pub(crate) choreographies: Vec<Choreography>,
}

impl<D, Q, H> World<D, Q, H>
where
    D: DialogueService,
    Q: QuestService,
    H: HookSink,
{
    // ── Running ───────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    pub fn run<O: WorldObserver>(&mut self, observer: &mut O) -> WorldResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_world_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: WorldObserver>(&mut self, n: u64, observer: &mut O) -> WorldResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    fn step(&mut self, observer: &mut dyn WorldObserver) -> WorldResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        self.process_tick(now, observer)?;
        observer.on_tick_end(now, &self.npcs);
        self.clock.advance();
        Ok(())
    }

    fn process_tick(&mut self, now: Tick, observer: &mut dyn WorldObserver) -> WorldResult<()> {
        // ── Phase 1: deliver queued signals ───────────────────────────────
        let mut queued: Vec<(NpcId, Vec<Signal>)> = self.signals.drain().collect();
        queued.sort_unstable_by_key(|(npc, _)| *npc);
        for (npc, signals) in queued {
            for signal in signals {
                observer.on_signal(now, npc, &signal);
                if let Err(e) = self.deliver(npc, &signal) {
                    warn!(%npc, ?signal, error = %e, "signal dropped");
                }
            }
        }

        // ── Phases 2 + 3: bodies, then arbiters and drivers ───────────────
        let dt = self.config.tick_duration();
        for i in 0..self.npcs.len() {
            let id = self.npcs[i].id;
            self.with_npc(id, dt, |driver, arbiter, ctx| {
                ctx.nav.step(ctx.dt);
                if let Some(arbiter) = arbiter {
                    arbiter.tick(ctx)?;
                }
                match driver {
                    Driver::Patrol(c) => c.tick(ctx)?,
                    Driver::Scripted(s) => s.tick(ctx)?,
                }
                Ok(())
            })?;
        }

        // ── Phase 4: choreography ─────────────────────────────────────────
        self.advance_choreographies(now, observer);
        Ok(())
    }

    // ── NPCs ──────────────────────────────────────────────────────────────

    pub fn npc(&self, id: NpcId) -> Option<&Npc> {
        self.npcs.get(id.index())
    }

    pub fn npc_mut(&mut self, id: NpcId) -> Option<&mut Npc> {
        self.npcs.get_mut(id.index())
    }

    /// Add an NPC mid-run.  Its RNG is drawn from the world stream so
    /// existing NPCs' draws are undisturbed.
    pub fn spawn(&mut self, spec: NpcSpec) -> WorldResult<NpcId> {
        let id = NpcId::try_from(self.npcs.len())
            .map_err(|_| WorldError::Config("npc count exceeds u32".into()))?;
        let rng = self.world_rng.npc_rng(id);
        self.npcs.push(spec.into_npc(id, rng));
        info!(npc = %id, driver = self.npcs[id.index()].driver.kind(), "spawned");
        self.start_driver(id)?;
        Ok(id)
    }

    /// Start patrolling NPCs.  Scripted NPCs wait for their first step.
    pub(crate) fn start_driver(&mut self, id: NpcId) -> WorldResult<()> {
        self.with_npc(id, Millis::ZERO, |driver, _, ctx| {
            if let Driver::Patrol(c) = driver {
                c.start(ctx)?;
            }
            Ok(())
        })
    }

    // ── Signals ───────────────────────────────────────────────────────────

    /// Queue `signal` for delivery at the start of the next tick.
    pub fn post(&mut self, npc: NpcId, signal: Signal) -> WorldResult<()> {
        if self.npc(npc).is_none() {
            return Err(WorldError::UnknownNpc(npc));
        }
        debug!(%npc, ?signal, "signal queued");
        self.signals.entry(npc).or_default().push(signal);
        Ok(())
    }

    pub fn pending_signals(&self) -> usize {
        self.signals.values().map(Vec::len).sum()
    }

    fn deliver(&mut self, npc: NpcId, signal: &Signal) -> WorldResult<()> {
        match signal {
            Signal::Interact { player } => self.interact(npc, *player).map(drop),
            Signal::DialogueEnded { dialogue } => self.dialogue_ended(npc, dialogue).map(drop),
            Signal::NextCheckpoint => self.go_to_next_checkpoint(npc),
            Signal::StartStep { index } => self.start_step(npc, *index),
            Signal::NextStep { skip } => self.start_next_step(npc, *skip),
        }
    }

    // ── Direct commands ───────────────────────────────────────────────────

    /// Toggle a player interaction with `npc`.
    pub fn interact(&mut self, npc: NpcId, player: Position) -> WorldResult<InteractOutcome> {
        self.with_npc(npc, Millis::ZERO, |driver, arbiter, ctx| {
            let arbiter = arbiter.as_mut().ok_or(WorldError::NoArbiter(ctx.npc))?;
            Ok(arbiter.interact(driver.as_interruptible(), player, ctx)?)
        })
    }

    /// Hand `npc` back to its driver if a player interaction holds it.
    pub fn release(&mut self, npc: NpcId) -> WorldResult<()> {
        self.with_npc(npc, Millis::ZERO, |driver, arbiter, ctx| {
            if let Some(arbiter) = arbiter {
                arbiter.release(driver.as_interruptible(), ctx)?;
            }
            Ok(())
        })
    }

    /// Route the end of `dialogue` to whichever party started it: the
    /// arbiter, or else a scripted driver's Dialogue step.
    ///
    /// Returns `true` if something was waiting on it.
    pub fn dialogue_ended(&mut self, npc: NpcId, dialogue: &DialogueId) -> WorldResult<bool> {
        self.with_npc(npc, Millis::ZERO, |driver, arbiter, ctx| {
            if let Some(arbiter) = arbiter {
                if arbiter.on_dialogue_end(driver.as_interruptible(), dialogue, ctx)? {
                    return Ok(true);
                }
            }
            match driver {
                Driver::Scripted(s) => Ok(s.on_dialogue_end(dialogue, ctx)?),
                Driver::Patrol(_) => Ok(false),
            }
        })
    }

    pub fn go_to_next_checkpoint(&mut self, npc: NpcId) -> WorldResult<()> {
        self.with_npc(npc, Millis::ZERO, |driver, _, ctx| match driver {
            Driver::Patrol(c) => Ok(c.go_to_next_checkpoint(ctx)?),
            Driver::Scripted(_) => Err(WorldError::WrongDriver { npc: ctx.npc, expected: "patrol" }),
        })
    }

    pub fn start_step(&mut self, npc: NpcId, index: usize) -> WorldResult<()> {
        self.with_npc(npc, Millis::ZERO, |driver, _, ctx| match driver {
            Driver::Scripted(s) => Ok(s.start_sequence(index, ctx)?),
            Driver::Patrol(_) => Err(WorldError::WrongDriver { npc: ctx.npc, expected: "script" }),
        })
    }

    pub fn start_step_awaitable(&mut self, npc: NpcId, index: usize) -> WorldResult<StepTicket> {
        self.with_npc(npc, Millis::ZERO, |driver, _, ctx| match driver {
            Driver::Scripted(s) => Ok(s.start_sequence_awaitable(index, ctx)?),
            Driver::Patrol(_) => Err(WorldError::WrongDriver { npc: ctx.npc, expected: "script" }),
        })
    }

    pub fn start_next_step(&mut self, npc: NpcId, skip: isize) -> WorldResult<()> {
        self.with_npc(npc, Millis::ZERO, |driver, _, ctx| match driver {
            Driver::Scripted(s) => Ok(s.start_next_sequence(skip, ctx)?),
            Driver::Patrol(_) => Err(WorldError::WrongDriver { npc: ctx.npc, expected: "script" }),
        })
    }

    pub fn ticket_status(&self, npc: NpcId, ticket: StepTicket) -> WorldResult<TicketStatus> {
        match &self.npc(npc).ok_or(WorldError::UnknownNpc(npc))?.driver {
            Driver::Scripted(s) => Ok(s.ticket_status(ticket)),
            Driver::Patrol(_) => Err(WorldError::WrongDriver { npc, expected: "script" }),
        }
    }

    // ── Choreography ──────────────────────────────────────────────────────

    /// Validate `choreography` and start its first beat now.
    pub fn choreograph(&mut self, mut choreography: Choreography) -> WorldResult<()> {
        if choreography.beats().is_empty() {
            return Err(WorldError::Config(format!(
                "choreography {:?} has no beats",
                choreography.name()
            )));
        }
        for beat in choreography.beats() {
            let npc = self.npc(beat.npc).ok_or(WorldError::UnknownNpc(beat.npc))?;
            let Driver::Scripted(engine) = &npc.driver else {
                return Err(WorldError::WrongDriver { npc: beat.npc, expected: "script" });
            };
            if beat.step >= engine.len() {
                return Err(WorldError::Config(format!(
                    "choreography {:?}: {} has no step {}",
                    choreography.name(),
                    beat.npc,
                    beat.step
                )));
            }
        }
        let now = self.clock.current_tick;
        self.start_beat(&mut choreography, 0, now, &mut crate::NoopObserver)?;
        self.choreographies.push(choreography);
        Ok(())
    }

    pub fn choreographies(&self) -> &[Choreography] {
        &self.choreographies
    }

    pub fn choreography(&self, name: &str) -> Option<&Choreography> {
        self.choreographies.iter().find(|c| c.name() == name)
    }

    /// A chain that fails to advance is abandoned on its own; the others
    /// carry on.
    fn advance_choreographies(&mut self, now: Tick, observer: &mut dyn WorldObserver) {
        let mut running = std::mem::take(&mut self.choreographies);
        for c in running.iter_mut() {
            if let Err(e) = self.advance_choreography(c, now, observer) {
                let beat = match c.state {
                    ChoreographyState::Waiting { beat, .. } => beat,
                    _ => 0,
                };
                warn!(choreography = c.name(), beat, error = %e, "beat failed; abandoning");
                c.state = ChoreographyState::Abandoned { beat };
            }
        }
        self.choreographies = running;
    }

    fn advance_choreography(
        &mut self,
        c:        &mut Choreography,
        now:      Tick,
        observer: &mut dyn WorldObserver,
    ) -> WorldResult<()> {
        // Instant steps complete as they start, so one tick may run several
        // beats.
        while let ChoreographyState::Waiting { beat, npc, ticket } = c.state {
            match self.ticket_status(npc, ticket)? {
                TicketStatus::Pending => break,
                TicketStatus::Completed => self.start_beat(c, beat + 1, now, observer)?,
                TicketStatus::Superseded | TicketStatus::Expired => {
                    warn!(choreography = c.name(), beat, %npc, "beat superseded; abandoning");
                    c.state = ChoreographyState::Abandoned { beat };
                }
            }
        }
        Ok(())
    }

    fn start_beat(
        &mut self,
        c:        &mut Choreography,
        index:    usize,
        now:      Tick,
        observer: &mut dyn WorldObserver,
    ) -> WorldResult<()> {
        let Some(beat) = c.beat(index) else {
            info!(choreography = c.name(), "choreography finished");
            c.state = ChoreographyState::Finished;
            return Ok(());
        };
        let ticket = self.start_step_awaitable(beat.npc, beat.step)?;
        debug!(choreography = c.name(), index, npc = %beat.npc, step = beat.step, "beat");
        observer.on_beat(now, c.name(), beat.npc, beat.step);
        c.state = ChoreographyState::Waiting { beat: index, npc: beat.npc, ticket };
        Ok(())
    }

    // ── Context plumbing ──────────────────────────────────────────────────

    /// Assemble `npc`'s context and hand it to `f` with the driver and
    /// arbiter split off.
    fn with_npc<T>(
        &mut self,
        npc: NpcId,
        dt:  Millis,
        f:   impl FnOnce(
            &mut Driver,
            &mut Option<InteractionArbiter>,
            &mut NpcContext<'_>,
        ) -> WorldResult<T>,
    ) -> WorldResult<T> {
        let now = self.clock.elapsed();
        let entry = self.npcs.get_mut(npc.index()).ok_or(WorldError::UnknownNpc(npc))?;
        let mut ctx = entry.body.context(npc, now, dt, &self.idle_clip, &mut self.services);
        f(&mut entry.driver, &mut entry.arbiter, &mut ctx)
    }
}
