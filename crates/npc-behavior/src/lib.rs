//! `npc-behavior` — the checkpoint patrol state machine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`state`]      | `BehaviorMode`, `ModeKind`, `BehaviorState`, `ActionProgress`, `ResumeSnapshot` |
//! | [`controller`] | `CheckpointBehaviorController`                                  |
//! | `table`        | per-mode `enter` / `update` / `exit` handlers                   |
//! | [`error`]      | `BehaviorError`, `BehaviorResult<T>`                            |
//!
//! # Design notes
//!
//! Modes are plain data; behavior lives in a fixed table of function pointers
//! keyed by [`ModeKind`].  The controller owns its [`npc_plan::PatrolRoute`]
//! (and through it every checkpoint's action pool), so the only state it
//! shares with anything else is what arrives through `NpcContext`.

pub mod controller;
pub mod error;
pub mod state;
mod table;

#[cfg(test)]
mod tests;

pub use controller::CheckpointBehaviorController;
pub use error::{BehaviorError, BehaviorResult};
pub use state::{
    ActionPhase, ActionProgress, BehaviorMode, BehaviorState, ModeKind, ParkedAction, ResumeSnapshot,
};
