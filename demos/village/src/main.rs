//! village — a small market square for the NPC behavior core.
//!
//! Two villagers patrol between authored checkpoints, a herald and a bard
//! perform a choreographed fanfare, and the player stops to talk to one of
//! the villagers halfway through.  Set `RUST_LOG=debug` to watch every
//! transition and dispensed action.

use std::io::Cursor;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use npc_behavior::BehaviorMode;
use npc_core::{Millis, NpcId, Position, Tick, WorldConfig};
use npc_interact::{DialogueSet, InteractionProfile};
use npc_plan::load_routes_reader;
use npc_sequence::{SequenceEngine, SequenceStep};
use npc_services::{ClipTable, DialogueLog, HookLog, KinematicNav, QuestLog, QuestService};
use npc_sim::{Choreography, Driver, Npc, NpcSpec, Signal, WorldBuilder, WorldObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:        u64 = 42;
const TICK_MS:     u64 = 20;     // 50 Hz
const TOTAL_TICKS: u64 = 3_000;  // one minute of game time

const MARA:   NpcId = NpcId(0);
const TOM:    NpcId = NpcId(1);
const HERALD: NpcId = NpcId(2);
const BARD:   NpcId = NpcId(3);

const PLAYER: Position = Position::new(1.0, 0.0, 6.0);

// ── Routes CSV ────────────────────────────────────────────────────────────────

// Mara tends the well and the stall in order.  Tom wanders at random and
// stops for good under the tree, which has nothing to do, until shooed along.
const ROUTES_CSV: &str = "\
npc_id,checkpoint,x,y,z,route_sort,route_exclude,action,clip,pool_sort,pool_exclude,timing,min_actions,max_actions,on_start,on_end,on_arrive\n\
0,well,0,0,4,roundrobin,false,draw,DrawWater,random,true,short,1,2,,water_drawn,at_well\n\
0,well,0,0,4,roundrobin,false,look,LookAround,random,true,short,1,2,,,at_well\n\
0,stall,6,0,4,roundrobin,false,haggle,Talk,roundrobin,false,medium,2,2,haggle_start,haggle_end,\n\
0,stall,6,0,4,roundrobin,false,count,CountCoins,roundrobin,false,medium,2,2,,,\n\
1,bench,-5,0,0,random,true,sit,Sit,random,true,long,1,1,,,\n\
1,gate,-8,0,8,random,true,stretch,Stretch,random,true,short,1,3,,,at_gate\n\
1,tree,-2,0,10,random,true,,,random,true,instant,0,0,,,\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct VillageObserver {
    beats:   usize,
    signals: usize,
}

impl WorldObserver for VillageObserver {
    fn on_signal(&mut self, tick: Tick, npc: NpcId, signal: &Signal) {
        self.signals += 1;
        info!(%tick, %npc, ?signal, "signal");
    }

    fn on_beat(&mut self, tick: Tick, choreography: &str, npc: NpcId, step: usize) {
        self.beats += 1;
        info!(%tick, choreography, %npc, step, "beat");
    }

    fn on_tick_end(&mut self, tick: Tick, npcs: &[Npc]) {
        // Once per game second.
        if tick.0 % 50 == 0 {
            for npc in npcs {
                let p = npc.position();
                tracing::debug!(%tick, npc = %npc.id, x = p.x, z = p.z, "position");
            }
        }
    }
}

fn clips() -> ClipTable {
    ClipTable::new()
        .with_clip("DrawWater", Millis(1_800))
        .with_clip("Talk", Millis(2_400))
        .with_clip("CountCoins", Millis(1_500))
        .with_clip("Sit", Millis(4_000))
        .with_clip("Stretch", Millis(1_200))
        .with_clip("Bow", Millis(900))
        .with_clip("Lute", Millis(3_000))
}

fn mode_label(driver: &Driver) -> String {
    match driver.patrol_mode() {
        Some(BehaviorMode::Idle) => "idle".into(),
        Some(BehaviorMode::Traveling { checkpoint, .. }) => format!("-> cp {checkpoint}"),
        Some(BehaviorMode::AtCheckpoint { checkpoint }) => format!("at cp {checkpoint}"),
        Some(BehaviorMode::Interacting) => "talking".into(),
        None => "scripted".into(),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== village — NPC behavior core ===");
    println!("Ticks: {TOTAL_TICKS} × {TICK_MS} ms  |  Seed: {SEED}");
    println!();

    // 1. Patrol routes for the two villagers.
    let mut routes = load_routes_reader(Cursor::new(ROUTES_CSV), 2)?.into_iter();
    let (Some(mara_route), Some(tom_route)) = (routes.next(), routes.next()) else {
        anyhow::bail!("routes CSV did not yield two routes");
    };

    // 2. Scripts for the performers.
    let herald = SequenceEngine::new(
        vec![
            SequenceStep::walk(Position::new(3.0, 0.0, 0.0)),
            SequenceStep::turn_to_face(PLAYER),
            SequenceStep::animate_blocking("Bow"),
            SequenceStep::dialogue("herald_announce"),
        ],
        false,
    );
    let bard = SequenceEngine::new(
        vec![
            SequenceStep::animate_blocking("Lute").advancing(false),
            SequenceStep::animate("Lute", true),
        ],
        false,
    );

    // 3. Mara hands out the ring quest.
    let ring = InteractionProfile::new(DialogueSet {
        first:    "mara_ring_offer".into(),
        repeat:   "mara_ring_remind".into(),
        complete: "mara_ring_thanks".into(),
        fail:     "mara_ring_shrug".into(),
    })
    .with_quest("lost_ring", true);

    // 4. World.
    let config = WorldConfig {
        tick_ms:     TICK_MS,
        total_ticks: TOTAL_TICKS,
        seed:        SEED,
        idle_clip:   "Idle".into(),
    };
    let mut world = WorldBuilder::new(config, DialogueLog::default(), QuestLog::new(), HookLog::default())
        .npc(NpcSpec::patrol(mara_route, KinematicNav::new(Position::ORIGIN, 1.6, 0.2), clips()).interactive(ring))
        .npc(NpcSpec::patrol(tom_route, KinematicNav::new(Position::new(-4.0, 0.0, 2.0), 1.2, 0.2), clips()))
        .npc(NpcSpec::scripted(herald, KinematicNav::new(Position::new(6.0, 0.0, -2.0), 1.4, 0.1), clips()))
        .npc(NpcSpec::scripted(bard, KinematicNav::new(Position::new(2.0, 0.0, -1.0), 1.0, 0.1), clips()))
        .build()?;

    // 5. Fanfare: herald walks in and turns, the bard plays, then the herald
    //    bows and announces.
    world.choreograph(
        Choreography::new("fanfare")
            .then(HERALD, 0)
            .then(BARD, 0)
            .then(HERALD, 2),
    )?;

    // 6. Run.  At 20 s the player stops to talk to Mara and shoos Tom along;
    //    at 26 s both conversations end.
    let mut obs = VillageObserver::default();
    let t0 = Instant::now();

    world.run_ticks(1_000, &mut obs)?;
    world.post(MARA, Signal::Interact { player: PLAYER })?;
    world.post(TOM, Signal::NextCheckpoint)?;
    world.run_ticks(300, &mut obs)?;
    world.post(MARA, Signal::DialogueEnded { dialogue: "mara_ring_offer".into() })?;
    world.post(HERALD, Signal::DialogueEnded { dialogue: "herald_announce".into() })?;
    world.run(&mut obs)?;

    let elapsed = t0.elapsed();

    // 7. Summary.
    println!("World complete in {:.3} s", elapsed.as_secs_f64());
    println!("  beats played      : {}", obs.beats);
    println!("  signals delivered : {}", obs.signals);
    println!("  dialogues started : {}", world.services.dialogue.started.len());
    println!("  hooks fired       : {}", world.services.hooks.fired.len());
    println!(
        "  lost_ring quest   : {:?}",
        world.services.quests.state(&"lost_ring".into())
    );
    if let Some(c) = world.choreography("fanfare") {
        println!("  fanfare           : {:?}", c.state());
    }
    println!();

    // 8. Final NPC table.
    println!("{:<8} {:<12} {:>7} {:>7}", "Npc", "Mode", "X", "Z");
    println!("{}", "-".repeat(36));
    for (npc, name) in world.npcs.iter().zip(["mara", "tom", "herald", "bard"]) {
        let p = npc.position();
        println!("{:<8} {:<12} {:>7.2} {:>7.2}", name, mode_label(&npc.driver), p.x, p.z);
    }

    Ok(())
}
