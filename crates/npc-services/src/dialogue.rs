//! Dialogue and hook collaborators.

use npc_core::{DialogueId, HookId, NpcId};

/// Starts conversations.  The matching "dialogue ended" notification comes
/// back to the core as an external signal routed by the world.
pub trait DialogueService {
    fn start_dialogue(&mut self, npc: NpcId, dialogue: &DialogueId);
}

/// Receives the authored game events tied to actions, checkpoints, and
/// custom steps.
pub trait HookSink {
    fn fire(&mut self, npc: NpcId, hook: &HookId);
}
