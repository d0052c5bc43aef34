//! Per-NPC interaction settings and quest-state dialogue lookup.

use npc_core::{DialogueId, Millis, QuestId};
use npc_services::QuestState;

/// Time an NPC takes to turn and face the player.
pub const DEFAULT_TURN_DURATION: Millis = Millis(400);

/// One dialogue per quest state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueSet {
    pub first:    DialogueId,
    pub repeat:   DialogueId,
    pub complete: DialogueId,
    pub fail:     DialogueId,
}

impl DialogueSet {
    /// The same dialogue for every state (NPCs without a quest).
    pub fn single(dialogue: impl Into<DialogueId>) -> Self {
        let d = dialogue.into();
        Self { first: d.clone(), repeat: d.clone(), complete: d.clone(), fail: d }
    }

    pub fn for_state(&self, state: QuestState) -> &DialogueId {
        match state {
            QuestState::NotStarted => &self.first,
            QuestState::Incomplete => &self.repeat,
            QuestState::Complete => &self.complete,
            QuestState::Failed => &self.fail,
        }
    }
}

/// How one NPC responds to the player.
#[derive(Clone, Debug)]
pub struct InteractionProfile {
    /// Quest whose state selects the dialogue.  `None` always uses `first`.
    pub quest:     Option<QuestId>,
    pub dialogues: DialogueSet,

    pub turn_duration: Millis,

    /// Hand the NPC back to its driver when its dialogue ends.  When `false`
    /// the NPC stays parked until the player interacts again.
    pub release_on_dialogue_end: bool,

    /// Begin `quest` when its first dialogue starts.
    pub begins_quest: bool,
}

impl InteractionProfile {
    pub fn new(dialogues: DialogueSet) -> Self {
        Self {
            quest: None,
            dialogues,
            turn_duration: DEFAULT_TURN_DURATION,
            release_on_dialogue_end: true,
            begins_quest: false,
        }
    }

    pub fn with_quest(mut self, quest: impl Into<QuestId>, begins: bool) -> Self {
        self.quest = Some(quest.into());
        self.begins_quest = begins;
        self
    }
}
