//! `npc-services` — the collaborators the behavior core calls into.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`nav`]       | `Navigation` trait, `has_arrived`, `within_stopping_distance`   |
//! | [`anim`]      | `Animation` trait, `DEFAULT_BLEND`                              |
//! | [`dialogue`]  | `DialogueService`, `HookSink`                                   |
//! | [`quest`]     | `QuestState`, `QuestService`                                    |
//! | [`context`]   | `NpcContext<'a>` — per-tick view of one NPC's collaborators, `Interruptible` |
//! | [`kinematic`] | `KinematicNav` — straight-line mover                            |
//! | [`memory`]    | `ClipTable`, `QuestLog`, `DialogueLog`, `HookLog`               |
//!
//! # Design notes
//!
//! Nothing here decides behavior.  Rendering, path planning, and dialogue text
//! belong to the host; the core only issues commands and reads back the few
//! values it needs (arrival, clip lengths, quest state).

pub mod anim;
pub mod context;
pub mod dialogue;
pub mod kinematic;
pub mod memory;
pub mod nav;
pub mod quest;


pub use anim::{Animation, DEFAULT_BLEND};
pub use context::{Interruptible, NpcContext};
pub use dialogue::{DialogueService, HookSink};
pub use kinematic::KinematicNav;
pub use memory::{ClipTable, DialogueLog, HookLog, QuestLog};
pub use nav::{Navigation, SPEED_EPSILON, has_arrived, within_stopping_distance};
pub use quest::{QuestService, QuestState};
