//! Checkpoints and patrol routes.

use npc_core::{ActionSelector, HookId, Position, RandomSource, SelectionCursor};

use crate::ActionPool;

/// A named place an NPC patrols to, with the actions it performs there.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checkpoint {
    pub name:      String,
    pub position:  Position,
    pub pool:      ActionPool,
    /// Fired on every arrival that is not a resumption.
    pub on_arrive: Option<HookId>,
}

impl Checkpoint {
    pub fn new(name: impl Into<String>, position: Position, pool: ActionPool) -> Self {
        Self { name: name.into(), position, pool, on_arrive: None }
    }
}

/// The checkpoints one NPC cycles through, and the policy that orders them.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatrolRoute {
    checkpoints:  Vec<Checkpoint>,
    pub selector: ActionSelector,
    cursor:       SelectionCursor,
}

impl PatrolRoute {
    pub fn new(checkpoints: Vec<Checkpoint>, selector: ActionSelector) -> Self {
        Self { checkpoints, selector, cursor: SelectionCursor::new() }
    }

    /// A route with no checkpoints.  NPCs on it stay idle.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Treat `index` as already visited, so the next pick continues from it.
    pub fn starting_at(mut self, index: usize) -> Self {
        self.cursor = SelectionCursor::at(index);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn checkpoint(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    pub fn checkpoint_mut(&mut self, index: usize) -> Option<&mut Checkpoint> {
        self.checkpoints.get_mut(index)
    }

    /// Index of the checkpoint last picked.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor.current()
    }

    /// Pick the next checkpoint, or `None` for an empty route.
    pub fn next_checkpoint<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        self.cursor.advance(self.selector, self.checkpoints.len(), rng)
    }
}
