//! In-memory service implementations.
//!
//! These back the demo binary and the unit tests.  Each one records what the
//! core asked of it so callers can assert on the exact call sequence.

use std::collections::HashMap;

use npc_core::{ClipId, DialogueId, HookId, Millis, NpcId, QuestId};
use tracing::warn;

use crate::{Animation, DialogueService, HookSink, QuestService, QuestState};

// ── ClipTable ─────────────────────────────────────────────────────────────────

/// An [`Animation`] body backed by a table of known clip lengths.
///
/// Every `play` call is recorded, including plays of unknown clips (which a
/// real animator would also accept and ignore).
#[derive(Clone, Debug, Default)]
pub struct ClipTable {
    lengths:    HashMap<ClipId, Millis>,
    pub played: Vec<ClipId>,
}

impl ClipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: register `clip` with `length`.
    pub fn with_clip(mut self, clip: impl Into<ClipId>, length: Millis) -> Self {
        self.lengths.insert(clip.into(), length);
        self
    }

    pub fn insert(&mut self, clip: ClipId, length: Millis) {
        self.lengths.insert(clip, length);
    }

    pub fn last_played(&self) -> Option<&ClipId> {
        self.played.last()
    }

    /// How many times `clip` was started.
    pub fn play_count(&self, clip: &str) -> usize {
        self.played.iter().filter(|c| c.as_str() == clip).count()
    }
}

impl Animation for ClipTable {
    fn play(&mut self, clip: &ClipId, _blend: Millis) {
        self.played.push(clip.clone());
    }

    fn clip_length(&self, clip: &ClipId) -> Option<Millis> {
        self.lengths.get(clip).copied()
    }
}

// ── QuestLog ──────────────────────────────────────────────────────────────────

/// A [`QuestService`] holding quest states in a map.
#[derive(Clone, Debug, Default)]
pub struct QuestLog {
    states: HashMap<QuestId, QuestState>,
}

impl QuestLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a state (setup and tests).
    pub fn set(&mut self, quest: QuestId, state: QuestState) {
        self.states.insert(quest, state);
    }
}

impl QuestService for QuestLog {
    fn state(&self, quest: &QuestId) -> QuestState {
        self.states.get(quest).copied().unwrap_or_default()
    }

    fn begin(&mut self, quest: &QuestId) {
        match self.state(quest) {
            QuestState::NotStarted => {
                self.states.insert(quest.clone(), QuestState::Incomplete);
            }
            other => warn!(%quest, state = ?other, "begin ignored: quest already started"),
        }
    }

    fn complete(&mut self, quest: &QuestId) {
        self.states.insert(quest.clone(), QuestState::Complete);
    }

    fn fail(&mut self, quest: &QuestId) {
        self.states.insert(quest.clone(), QuestState::Failed);
    }
}

// ── DialogueLog ───────────────────────────────────────────────────────────────

/// A [`DialogueService`] that records every started dialogue.
#[derive(Clone, Debug, Default)]
pub struct DialogueLog {
    pub started: Vec<(NpcId, DialogueId)>,
}

impl DialogueService for DialogueLog {
    fn start_dialogue(&mut self, npc: NpcId, dialogue: &DialogueId) {
        self.started.push((npc, dialogue.clone()));
    }
}

// ── HookLog ───────────────────────────────────────────────────────────────────

/// A [`HookSink`] that records every fired hook in order.
#[derive(Clone, Debug, Default)]
pub struct HookLog {
    pub fired: Vec<(NpcId, HookId)>,
}

impl HookLog {
    /// How many times `hook` fired, across all NPCs.
    pub fn count(&self, hook: &str) -> usize {
        self.fired.iter().filter(|(_, h)| h.as_str() == hook).count()
    }
}

impl HookSink for HookLog {
    fn fire(&mut self, npc: NpcId, hook: &HookId) {
        self.fired.push((npc, hook.clone()));
    }
}
