//! Actions and action pools.
//!
//! An [`ActionPool`] is authored once per checkpoint and never changes at
//! runtime except for its selection cursor, which only
//! [`ActionPool::next_action`] moves.

use npc_core::{ActionSelector, ClipId, HookId, Millis, RandomSource, SelectionCursor};

use crate::{PlanError, PlanResult};

// ── ActionSpec ────────────────────────────────────────────────────────────────

/// One thing an NPC can do at a checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionSpec {
    /// Label for logs and route files.
    pub name: String,

    /// Clip played for the action.  `None` (or a clip the animator does not
    /// know) skips playback but keeps the action's timing and hooks.
    pub clip: Option<ClipId>,

    /// Fired once when the action starts.
    pub on_start: Option<HookId>,

    /// Fired once when the action finishes.
    pub on_end: Option<HookId>,
}

impl ActionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_clip(mut self, clip: impl Into<ClipId>) -> Self {
        self.clip = Some(clip.into());
        self
    }

    pub fn with_hooks(mut self, on_start: Option<&str>, on_end: Option<&str>) -> Self {
        self.on_start = on_start.map(HookId::from);
        self.on_end = on_end.map(HookId::from);
        self
    }
}

// ── Timing ────────────────────────────────────────────────────────────────────

/// Fallback duration for actions whose clip length is unknown.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    Instant,
    Short,
    #[default]
    Medium,
    Long,
    Custom(Millis),
}

impl Timing {
    pub fn delay(self) -> Millis {
        match self {
            Timing::Instant => Millis::ZERO,
            Timing::Short => Millis(1_000),
            Timing::Medium => Millis(2_500),
            Timing::Long => Millis(5_000),
            Timing::Custom(ms) => ms,
        }
    }

    /// Parse a route-file value: a named preset or a plain millisecond count.
    pub fn parse(s: &str) -> Option<Timing> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "instant" => Some(Timing::Instant),
            "short" => Some(Timing::Short),
            "medium" => Some(Timing::Medium),
            "long" => Some(Timing::Long),
            _ => s.parse::<u64>().ok().map(|ms| Timing::Custom(Millis(ms))),
        }
    }
}

// ── ActionPool ────────────────────────────────────────────────────────────────

/// The ordered actions available at one checkpoint.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionPool {
    actions:         Vec<ActionSpec>,
    pub selector:    ActionSelector,
    pub timing:      Timing,
    min_actions:     u32,
    max_actions:     u32,
    cursor:          SelectionCursor,
}

impl ActionPool {
    /// Build a pool.  Fails if `min_actions > max_actions`.
    pub fn new(
        actions:     Vec<ActionSpec>,
        selector:    ActionSelector,
        timing:      Timing,
        min_actions: u32,
        max_actions: u32,
    ) -> PlanResult<Self> {
        if min_actions > max_actions {
            return Err(PlanError::InvalidCounts { min: min_actions, max: max_actions });
        }
        Ok(Self {
            actions,
            selector,
            timing,
            min_actions,
            max_actions,
            cursor: SelectionCursor::new(),
        })
    }

    /// A pool with no actions.  NPCs arriving at its checkpoint go idle.
    pub fn empty() -> Self {
        Self {
            actions:     Vec::new(),
            selector:    ActionSelector::default(),
            timing:      Timing::default(),
            min_actions: 0,
            max_actions: 0,
            cursor:      SelectionCursor::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn actions(&self) -> &[ActionSpec] {
        &self.actions
    }

    pub fn action(&self, index: usize) -> Option<&ActionSpec> {
        self.actions.get(index)
    }

    pub fn count_range(&self) -> (u32, u32) {
        (self.min_actions, self.max_actions)
    }

    /// Index of the last dispensed action.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor.current()
    }

    /// Dispense the next action and move the cursor onto it.
    pub fn next_action<R: RandomSource + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<(usize, &ActionSpec)> {
        let index = self.cursor.advance(self.selector, self.actions.len(), rng)?;
        Some((index, &self.actions[index]))
    }

    /// How many actions to perform on this visit, uniform in `[min, max]`.
    pub fn roll_action_count<R: RandomSource + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.inclusive(self.min_actions, self.max_actions)
    }

    /// Duration of `spec`: the clip length reported by `clip_length`, or the
    /// pool's timing delay when there is no clip or the clip is unknown.
    pub fn duration_for<F>(&self, spec: &ActionSpec, clip_length: F) -> Millis
    where
        F: FnOnce(&ClipId) -> Option<Millis>,
    {
        spec.clip
            .as_ref()
            .and_then(clip_length)
            .unwrap_or_else(|| self.timing.delay())
    }
}
