//! `npc-core` — foundational types for the NPC behavior core.
//!
//! This crate is a dependency of every other `npc-*` crate.  It has no
//! `npc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`ids`]    | `NpcId`, `ClipId`, `DialogueId`, `QuestId`, `HookId`          |
//! | [`geo`]    | `Position`, `Yaw`                                             |
//! | [`time`]   | `Millis`, `Tick`, `GameClock`, `WorldConfig`                  |
//! | [`rng`]    | `RandomSource`, `NpcRng` (per-NPC), `WorldRng`                |
//! | [`select`] | `SortMode`, `ActionSelector`, `SelectionCursor`               |
//! | [`wait`]   | `WaitScope`, `CancelToken`, `Timer`, `WaitPoll`               |
//! | [`error`]  | `WaitError`                                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public data types.       |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod select;
pub mod time;
pub mod wait;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::WaitError;
pub use geo::{Position, Yaw};
pub use ids::{ClipId, DialogueId, HookId, NpcId, QuestId};
pub use rng::{NpcRng, RandomSource, WorldRng};
pub use select::{ActionSelector, SelectionCursor, SortMode, select_first, select_next};
pub use time::{GameClock, Millis, Tick, WorldConfig};
pub use wait::{CancelToken, Timer, WaitPoll, WaitScope};
