//! `npc-plan` — design-time behavior data and CSV loading.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`action`] | `ActionSpec`, `Timing`, `ActionPool`                    |
//! | [`route`]  | `Checkpoint`, `PatrolRoute`                             |
//! | [`loader`] | `load_routes_csv`, `load_routes_reader`                 |
//! | [`error`]  | `PlanError`, `PlanResult<T>`                            |
//!
//! # Mutability
//!
//! Everything here is read-only once configured except the two selection
//! cursors: one per `ActionPool` (last dispensed action) and one per
//! `PatrolRoute` (last picked checkpoint).  Each cursor is moved only by its
//! owner's own `next_*` method.

pub mod action;
pub mod error;
pub mod loader;
pub mod route;

#[cfg(test)]
mod tests;

pub use action::{ActionPool, ActionSpec, Timing};
pub use error::{PlanError, PlanResult};
pub use loader::{load_routes_csv, load_routes_reader};
pub use route::{Checkpoint, PatrolRoute};
