//! `npc-interact` — player-initiated interruption of an NPC driver.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`arbiter`] | `InteractionArbiter`, `InteractOutcome`                      |
//! | [`profile`] | `InteractionProfile`, `DialogueSet`, `DEFAULT_TURN_DURATION` |
//! | [`error`]   | `InteractError`, `InteractResult<T>`                         |
//!
//! The arbiter does not know which driver it parks: patrol controllers and
//! scripted sequences both arrive as `&mut dyn Interruptible`.

pub mod arbiter;
pub mod error;
pub mod profile;


pub use arbiter::{InteractOutcome, InteractionArbiter};
pub use error::{InteractError, InteractResult};
pub use profile::{DEFAULT_TURN_DURATION, DialogueSet, InteractionProfile};
