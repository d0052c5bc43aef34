//! Unit tests for npc-behavior.

use npc_core::{ActionSelector, ClipId, HookId, Millis, NpcId, NpcRng, Position, SortMode};
use npc_plan::{ActionPool, ActionSpec, Checkpoint, PatrolRoute, Timing};
use npc_services::{ClipTable, DialogueLog, HookLog, KinematicNav, NpcContext, QuestLog};

use crate::{BehaviorMode, CheckpointBehaviorController};

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Rig {
    idle:     ClipId,
    nav:      KinematicNav,
    anim:     ClipTable,
    dialogue: DialogueLog,
    quests:   QuestLog,
    hooks:    HookLog,
    rng:      NpcRng,
}

impl Rig {
    fn new() -> Self {
        Self {
            idle:     ClipId::from("Idle"),
            nav:      KinematicNav::new(Position::ORIGIN, 2.0, 0.1),
            anim:     ClipTable::new().with_clip("Act", Millis(1_000)),
            dialogue: DialogueLog::default(),
            quests:   QuestLog::new(),
            hooks:    HookLog::default(),
            rng:      NpcRng::new(3, NpcId(0)),
        }
    }

    fn ctx(&mut self, dt: u64) -> NpcContext<'_> {
        NpcContext {
            npc:       NpcId(0),
            now:       Millis::ZERO,
            dt:        Millis(dt),
            idle_clip: &self.idle,
            nav:       &mut self.nav,
            anim:      &mut self.anim,
            dialogue:  &mut self.dialogue,
            quests:    &mut self.quests,
            hooks:     &mut self.hooks,
            rng:       &mut self.rng,
        }
    }

    fn fired(&self) -> Vec<&str> {
        self.hooks.fired.iter().map(|(_, h)| h.as_str()).collect()
    }
}

fn action(i: usize, clip: &str) -> ActionSpec {
    ActionSpec::new(format!("a{i}"))
        .with_clip(clip)
        .with_hooks(Some(format!("start{i}").as_str()), Some(format!("end{i}").as_str()))
}

/// Three actions on a 1000 ms clip, round robin, exactly two per visit.
fn pool3() -> ActionPool {
    ActionPool::new(
        (0..3).map(|i| action(i, "Act")).collect(),
        ActionSelector::new(SortMode::RoundRobin, false),
        Timing::Short,
        2,
        2,
    )
    .unwrap()
}

/// Two checkpoints: one at the origin, one 6 m along +x.
fn route() -> PatrolRoute {
    let mut home = Checkpoint::new("home", Position::ORIGIN, pool3());
    home.on_arrive = Some(HookId::from("arrive0"));
    let far = Checkpoint::new("far", Position::new(6.0, 0.0, 0.0), pool3());
    PatrolRoute::new(vec![home, far], ActionSelector::new(SortMode::RoundRobin, false))
}

/// Start patrolling and take the arrival tick at the origin checkpoint.
fn arrived(rig: &mut Rig) -> CheckpointBehaviorController {
    let mut c = CheckpointBehaviorController::new(route());
    c.start(&mut rig.ctx(20)).unwrap();
    c.tick(&mut rig.ctx(20)).unwrap();
    assert_eq!(c.mode(), BehaviorMode::AtCheckpoint { checkpoint: 0 });
    c
}

/// Step the body and the controller until it leaves `Traveling`.
fn walk_until_arrival(c: &mut CheckpointBehaviorController, rig: &mut Rig) {
    use npc_services::Navigation;
    for _ in 0..1_000 {
        if !matches!(c.mode(), BehaviorMode::Traveling { .. }) {
            return;
        }
        rig.nav.step(Millis(20));
        c.tick(&mut rig.ctx(20)).unwrap();
    }
    panic!("never arrived");
}

// ── Patrol loop ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod patrol {
    use super::*;
    use crate::ActionPhase;

    #[test]
    fn round_robin_pool_dispenses_0_then_1_then_travels() {
        let mut rig = Rig::new();
        let mut c = arrived(&mut rig);
        assert_eq!(c.state().actions_remaining(), 2);
        assert_eq!(c.current_action(), Some((0, ActionPhase::First, Millis(500))));

        c.tick(&mut rig.ctx(500)).unwrap();
        assert_eq!(c.state().actions_remaining(), 1);
        c.tick(&mut rig.ctx(500)).unwrap();
        assert_eq!(c.current_action(), Some((1, ActionPhase::First, Millis(500))));

        c.tick(&mut rig.ctx(500)).unwrap();
        assert_eq!(c.state().actions_remaining(), 0);
        c.tick(&mut rig.ctx(500)).unwrap();

        assert_eq!(c.mode(), BehaviorMode::Traveling { checkpoint: 1, carry: None });
        assert_eq!(rig.fired(), vec!["arrive0", "start0", "end0", "start1", "end1"]);
        assert_eq!(rig.anim.last_played().map(ClipId::as_str), Some("Idle"));
    }

    #[test]
    fn arrive_hook_fires_on_every_arrival() {
        let mut rig = Rig::new();
        let mut c = arrived(&mut rig);
        // Two actions at home, two at far, then back home.
        for _ in 0..4 {
            c.tick(&mut rig.ctx(500)).unwrap();
        }
        walk_until_arrival(&mut c, &mut rig);
        for _ in 0..4 {
            c.tick(&mut rig.ctx(500)).unwrap();
        }
        walk_until_arrival(&mut c, &mut rig);
        assert_eq!(c.mode(), BehaviorMode::AtCheckpoint { checkpoint: 0 });
        assert_eq!(rig.hooks.count("arrive0"), 2);
    }

    #[test]
    fn pool_cursor_persists_across_visits() {
        let mut rig = Rig::new();
        let mut c = arrived(&mut rig);
        for _ in 0..4 {
            c.tick(&mut rig.ctx(500)).unwrap();
        }
        walk_until_arrival(&mut c, &mut rig);
        for _ in 0..4 {
            c.tick(&mut rig.ctx(500)).unwrap();
        }
        walk_until_arrival(&mut c, &mut rig);
        // Home pool handed out 0 and 1 last visit; this one starts at 2.
        assert_eq!(c.current_action().map(|a| a.0), Some(2));
    }

    #[test]
    fn missing_clip_keeps_timing_and_hooks() {
        let mut rig = Rig::new();
        let pool = ActionPool::new(
            vec![action(0, "Ghost")],
            ActionSelector::default(),
            Timing::Short,
            1,
            1,
        )
        .unwrap();
        let route = PatrolRoute::new(
            vec![Checkpoint::new("spot", Position::ORIGIN, pool)],
            ActionSelector::default(),
        );
        let mut c = CheckpointBehaviorController::new(route);
        c.start(&mut rig.ctx(20)).unwrap();
        c.tick(&mut rig.ctx(20)).unwrap();

        assert_eq!(c.current_action(), Some((0, ActionPhase::First, Millis(500))));
        assert_eq!(rig.anim.play_count("Ghost"), 0);
        c.tick(&mut rig.ctx(500)).unwrap();
        c.tick(&mut rig.ctx(500)).unwrap();
        assert_eq!(rig.hooks.count("start0"), 1);
        assert_eq!(rig.hooks.count("end0"), 1);
    }

    #[test]
    fn empty_pool_goes_idle() {
        let mut rig = Rig::new();
        let route = PatrolRoute::new(
            vec![Checkpoint::new("bare", Position::ORIGIN, ActionPool::empty())],
            ActionSelector::default(),
        );
        let mut c = CheckpointBehaviorController::new(route);
        c.start(&mut rig.ctx(20)).unwrap();
        c.tick(&mut rig.ctx(20)).unwrap();
        assert_eq!(c.mode(), BehaviorMode::Idle);
        assert_eq!(rig.anim.last_played().map(ClipId::as_str), Some("Idle"));
    }

    #[test]
    fn empty_route_stays_idle() {
        let mut rig = Rig::new();
        let mut c = CheckpointBehaviorController::new(PatrolRoute::empty());
        c.start(&mut rig.ctx(20)).unwrap();
        c.tick(&mut rig.ctx(20)).unwrap();
        assert_eq!(c.mode(), BehaviorMode::Idle);
    }

    #[test]
    fn starting_after_validates_index() {
        assert!(CheckpointBehaviorController::new(route()).starting_after(5).is_err());
        let mut rig = Rig::new();
        let mut c = CheckpointBehaviorController::new(route()).starting_after(0).unwrap();
        c.start(&mut rig.ctx(20)).unwrap();
        assert_eq!(c.mode(), BehaviorMode::Traveling { checkpoint: 1, carry: None });
    }
}

// ── Interrupt / resume ────────────────────────────────────────────────────────

#[cfg(test)]
mod interrupt {
    use npc_services::{Interruptible, Navigation};

    use super::*;
    use crate::{ActionPhase, ParkedAction};

    #[test]
    fn phase_one_interrupt_does_not_count() {
        let mut rig = Rig::new();
        let mut c = arrived(&mut rig);
        c.tick(&mut rig.ctx(200)).unwrap();

        assert!(c.interrupt(&mut rig.ctx(20)).unwrap());
        assert_eq!(c.mode(), BehaviorMode::Interacting);
        assert_eq!(c.state().actions_remaining(), 2);
        assert_eq!(
            c.state().snapshot().and_then(|s| s.action),
            Some(ParkedAction {
                action_index: 0,
                phase:        ActionPhase::First,
                remaining:    Millis(300),
                second_half:  Millis(500),
            })
        );
        assert_eq!(c.state().current_checkpoint(), Some(0));

        // Parked time is not charged against the action.
        c.tick(&mut rig.ctx(5_000)).unwrap();
        assert!(c.resume(&mut rig.ctx(20)).unwrap());
        assert!(!c.state().was_interrupted());
        assert_eq!(c.current_action(), Some((0, ActionPhase::First, Millis(300))));

        c.tick(&mut rig.ctx(300)).unwrap();
        assert_eq!(c.state().actions_remaining(), 1);
        c.tick(&mut rig.ctx(500)).unwrap();
        assert_eq!(rig.hooks.count("start0"), 1);
        assert_eq!(rig.hooks.count("end0"), 1);
    }

    #[test]
    fn phase_two_interrupt_keeps_count() {
        let mut rig = Rig::new();
        let mut c = arrived(&mut rig);
        c.tick(&mut rig.ctx(500)).unwrap();
        c.tick(&mut rig.ctx(200)).unwrap();

        c.interrupt(&mut rig.ctx(20)).unwrap();
        assert_eq!(c.state().actions_remaining(), 1);

        c.resume(&mut rig.ctx(20)).unwrap();
        assert_eq!(c.current_action(), Some((0, ActionPhase::Second, Millis(300))));
        assert_eq!(c.state().actions_remaining(), 1);

        c.tick(&mut rig.ctx(300)).unwrap();
        assert_eq!(rig.hooks.count("start0"), 1);
        assert_eq!(rig.hooks.count("end0"), 1);
        // Next action dispensed straight away.
        assert_eq!(c.current_action().map(|a| a.0), Some(1));
    }

    #[test]
    fn second_interrupt_is_refused() {
        let mut rig = Rig::new();
        let mut c = arrived(&mut rig);
        assert!(c.interrupt(&mut rig.ctx(20)).unwrap());
        assert!(!c.interrupt(&mut rig.ctx(20)).unwrap());
    }

    #[test]
    fn mid_travel_interrupt_resumes_travel() {
        let mut rig = Rig::new();
        rig.nav.place(Position::new(-5.0, 0.0, 0.0));
        let mut c = CheckpointBehaviorController::new(route());
        c.start(&mut rig.ctx(20)).unwrap();
        rig.nav.step(Millis(1_000));

        c.interrupt(&mut rig.ctx(20)).unwrap();
        assert_eq!(rig.nav.destination(), None);
        let parked = rig.nav.position();
        rig.nav.step(Millis(1_000));
        assert_eq!(rig.nav.position(), parked);

        c.resume(&mut rig.ctx(20)).unwrap();
        assert_eq!(c.mode(), BehaviorMode::Traveling { checkpoint: 0, carry: None });
        assert_eq!(rig.nav.destination(), Some(Position::ORIGIN));

        // Interrupted before arriving: this is the first arrival, so it rolls.
        walk_until_arrival(&mut c, &mut rig);
        assert_eq!(rig.hooks.count("arrive0"), 1);
        assert_eq!(c.state().actions_remaining(), 2);
    }

    #[test]
    fn drifted_npc_walks_back_and_finishes_action() {
        let mut rig = Rig::new();
        let mut c = arrived(&mut rig);
        c.tick(&mut rig.ctx(200)).unwrap();
        c.interrupt(&mut rig.ctx(20)).unwrap();

        rig.nav.place(Position::new(0.0, 0.0, 3.0));
        c.resume(&mut rig.ctx(20)).unwrap();
        assert_eq!(c.mode(), BehaviorMode::Traveling { checkpoint: 0, carry: Some(2) });

        walk_until_arrival(&mut c, &mut rig);
        assert_eq!(c.mode(), BehaviorMode::AtCheckpoint { checkpoint: 0 });
        assert_eq!(c.current_action(), Some((0, ActionPhase::First, Millis(300))));
        // Walking back is not a fresh arrival.
        assert_eq!(rig.hooks.count("arrive0"), 1);
        assert_eq!(rig.hooks.count("start0"), 1);
    }

    #[test]
    fn height_change_is_not_drift() {
        let mut rig = Rig::new();
        let mut c = arrived(&mut rig);
        c.tick(&mut rig.ctx(200)).unwrap();
        c.interrupt(&mut rig.ctx(20)).unwrap();

        // Snapped onto a step above the checkpoint.
        rig.nav.place(Position::new(0.0, 0.5, 0.0));
        c.resume(&mut rig.ctx(20)).unwrap();
        assert_eq!(c.mode(), BehaviorMode::AtCheckpoint { checkpoint: 0 });
        assert_eq!(c.current_action(), Some((0, ActionPhase::First, Millis(300))));
    }
}
