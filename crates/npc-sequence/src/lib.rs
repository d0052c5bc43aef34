//! `npc-sequence` — scripted, cutscene-style step lists for one NPC.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`step`]   | `StepKind`, `SequenceStep`, `StepCallback`, `DEFAULT_TURN`   |
//! | [`engine`] | `SequenceEngine`, `StepTicket`, `TicketStatus`               |
//! | [`error`]  | `SequenceError`, `SequenceResult<T>`                         |
//!
//! The engine implements [`npc_services::Interruptible`], so the interaction
//! arbiter parks and releases a scripted NPC the same way it does a patrolling
//! one.

pub mod engine;
pub mod error;
pub mod step;


pub use engine::{SequenceEngine, StepTicket, TICKET_HISTORY, TicketStatus};
pub use error::{SequenceError, SequenceResult};
pub use step::{DEFAULT_TURN, SequenceStep, StepCallback, StepKind};
