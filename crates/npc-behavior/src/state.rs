//! Runtime behavior state for one patrolling NPC.
//!
//! # Invariants
//!
//! - Exactly one [`BehaviorMode`] is active.
//! - A [`ResumeSnapshot`] exists exactly while the mode is `Interacting`;
//!   "was interrupted" is derived from its presence, never stored.

use npc_core::{Millis, Timer};

/// Discriminant of [`BehaviorMode`], used to index the state table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Idle = 0,
    Traveling = 1,
    AtCheckpoint = 2,
    Interacting = 3,
}

/// Top-level mode of a patrolling NPC.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BehaviorMode {
    #[default]
    Idle,

    /// Walking to `checkpoint`.  `carry` is set when walking back to a
    /// checkpoint after an interaction: the arrival keeps that action count
    /// instead of rolling a new one and does not fire the arrive hook.  A
    /// plain mid-travel resume has no count to keep (`carry: None`), so its
    /// arrival rolls a fresh count and fires the hook.
    Traveling { checkpoint: usize, carry: Option<u32> },

    AtCheckpoint { checkpoint: usize },

    /// Parked by the interaction layer.
    Interacting,
}

impl BehaviorMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            BehaviorMode::Idle => ModeKind::Idle,
            BehaviorMode::Traveling { .. } => ModeKind::Traveling,
            BehaviorMode::AtCheckpoint { .. } => ModeKind::AtCheckpoint,
            BehaviorMode::Interacting => ModeKind::Interacting,
        }
    }

    pub fn checkpoint(&self) -> Option<usize> {
        match self {
            BehaviorMode::Traveling { checkpoint, .. } | BehaviorMode::AtCheckpoint { checkpoint } => {
                Some(*checkpoint)
            }
            _ => None,
        }
    }
}

/// Which half of a two-phase action is running.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionPhase {
    /// Clip playing, start hook fired; the action has not been counted yet.
    First,
    /// Counted; waiting out the remainder before returning to idle.
    Second,
}

/// The action currently being performed.
#[derive(Clone, Debug)]
pub struct ActionProgress {
    pub action_index: usize,
    pub phase:        ActionPhase,
    pub timer:        Timer,
    /// Length of phase 2, armed when phase 1 elapses.
    pub second_half:  Millis,
}

/// An action frozen by an interruption.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParkedAction {
    pub action_index: usize,
    pub phase:        ActionPhase,
    /// Time left in `phase` when the wait was cancelled.
    pub remaining:    Millis,
    pub second_half:  Millis,
}

/// Everything needed to return to the mode that was interrupted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResumeSnapshot {
    pub prior:  BehaviorMode,
    pub action: Option<ParkedAction>,
}

/// The live record mutated every tick.
#[derive(Clone, Debug, Default)]
pub struct BehaviorState {
    pub(crate) mode:              BehaviorMode,
    pub(crate) actions_remaining: u32,
    pub(crate) snapshot:          Option<ResumeSnapshot>,
}

impl BehaviorState {
    #[inline]
    pub fn mode(&self) -> BehaviorMode {
        self.mode
    }

    #[inline]
    pub fn actions_remaining(&self) -> u32 {
        self.actions_remaining
    }

    #[inline]
    pub fn snapshot(&self) -> Option<&ResumeSnapshot> {
        self.snapshot.as_ref()
    }

    #[inline]
    pub fn was_interrupted(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Checkpoint the NPC is at or heading to, looking through an
    /// interruption to the mode it will resume.
    pub fn current_checkpoint(&self) -> Option<usize> {
        self.mode
            .checkpoint()
            .or_else(|| self.snapshot.and_then(|s| s.prior.checkpoint()))
    }
}
