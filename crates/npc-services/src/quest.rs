//! Quest / objective state.

use npc_core::QuestId;

/// Progress of one quest or objective.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum QuestState {
    #[default]
    NotStarted,
    Incomplete,
    Complete,
    Failed,
}

/// Quest tracker the interaction layer reads to pick a dialogue and calls on
/// player-driven triggers.
pub trait QuestService {
    /// Current state; unknown quests are `NotStarted`.
    fn state(&self, quest: &QuestId) -> QuestState;

    fn begin(&mut self, quest: &QuestId);

    fn complete(&mut self, quest: &QuestId);

    fn fail(&mut self, quest: &QuestId);
}
