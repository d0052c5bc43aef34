//! Authored sequence steps.

use std::fmt;
use std::sync::Arc;

use npc_core::{ClipId, DialogueId, Millis, Position};
use npc_services::NpcContext;

/// Rotation time for a turn step built with [`SequenceStep::turn_to_face`].
pub const DEFAULT_TURN: Millis = Millis(400);

/// Game-specific code run by a [`StepKind::Custom`] step.
#[derive(Clone)]
pub struct StepCallback(Arc<dyn Fn(&mut NpcContext<'_>) + Send + Sync>);

impl StepCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut NpcContext<'_>) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    #[inline]
    pub fn call(&self, ctx: &mut NpcContext<'_>) {
        (self.0)(ctx)
    }
}

impl fmt::Debug for StepCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StepCallback(..)")
    }
}

/// What a step does and when it counts as complete.
#[derive(Clone, Debug)]
pub enum StepKind {
    /// Completes once the NPC is within its stopping distance.
    Walk { destination: Position },

    /// Completes immediately, or after the clip's length when `blocking`.
    /// Looping clips never block.
    Animate { clip: ClipId, looping: bool, blocking: bool },

    /// Completes after `duration`.
    Wait { duration: Millis },

    /// Rotates (yaw only) to face `target` over `duration`.
    TurnToFace { target: Position, duration: Millis },

    /// Completes when the dialogue-ended signal arrives.
    Dialogue { dialogue: DialogueId },

    /// Runs the callback and completes immediately.
    Custom(StepCallback),
}

impl StepKind {
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Walk { .. } => "walk",
            StepKind::Animate { .. } => "animate",
            StepKind::Wait { .. } => "wait",
            StepKind::TurnToFace { .. } => "turn",
            StepKind::Dialogue { .. } => "dialogue",
            StepKind::Custom(_) => "custom",
        }
    }
}

/// One step of a scripted sequence.
#[derive(Clone, Debug)]
pub struct SequenceStep {
    pub kind: StepKind,

    /// Start the following step as soon as this one completes.  Steps left
    /// `false` wait for an external `start_next_sequence`.
    pub auto_advance: bool,
}

impl SequenceStep {
    pub fn new(kind: StepKind, auto_advance: bool) -> Self {
        Self { kind, auto_advance }
    }

    pub fn walk(destination: Position) -> Self {
        Self::new(StepKind::Walk { destination }, true)
    }

    pub fn animate(clip: impl Into<ClipId>, looping: bool) -> Self {
        Self::new(StepKind::Animate { clip: clip.into(), looping, blocking: false }, true)
    }

    pub fn animate_blocking(clip: impl Into<ClipId>) -> Self {
        Self::new(StepKind::Animate { clip: clip.into(), looping: false, blocking: true }, true)
    }

    pub fn wait(duration: Millis) -> Self {
        Self::new(StepKind::Wait { duration }, true)
    }

    /// Turn steps do not auto-advance unless asked to.
    pub fn turn_to_face(target: Position) -> Self {
        Self::new(StepKind::TurnToFace { target, duration: DEFAULT_TURN }, false)
    }

    /// Dialogue steps do not auto-advance: the conversation may run long.
    pub fn dialogue(dialogue: impl Into<DialogueId>) -> Self {
        Self::new(StepKind::Dialogue { dialogue: dialogue.into() }, false)
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&mut NpcContext<'_>) + Send + Sync + 'static,
    {
        Self::new(StepKind::Custom(StepCallback::new(f)), true)
    }

    /// Builder-style override of the auto-advance flag.
    pub fn advancing(mut self, auto_advance: bool) -> Self {
        self.auto_advance = auto_advance;
        self
    }
}
