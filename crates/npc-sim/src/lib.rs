//! `npc-sim` — the world tick loop for many NPCs.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Signals      — drain queued signals in ascending NpcId order.
//!   ② Bodies       — nav.step(dt) for every NPC.
//!   ③ Drivers      — arbiter.tick, then patrol / script tick.
//!   ④ Choreography — start the next beat of every chain whose awaited
//!                    step completed.
//! ```
//!
//! # Cargo features
//!
//! | Feature   | Effect                                              |
//! |-----------|-----------------------------------------------------|
//! | `fx-hash` | Uses `rustc-hash` for the signal queue.             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use npc_sim::{NoopObserver, NpcSpec, WorldBuilder};
//!
//! let routes = load_routes_reader(csv, 1)?;
//! let mut world = WorldBuilder::new(config, DialogueLog::default(), QuestLog::new(), HookLog::default())
//!     .npc(NpcSpec::patrol(routes[0].clone(), nav, clips))
//!     .build()?;
//! world.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod choreography;
pub mod error;
pub mod npc;
pub mod observer;
pub mod world;


pub use builder::WorldBuilder;
pub use choreography::{Beat, Choreography, ChoreographyState};
pub use error::{WorldError, WorldResult};
pub use npc::{Driver, Npc, NpcBody, NpcSpec, Services};
pub use observer::{NoopObserver, WorldObserver};
pub use world::{Signal, World};
