use npc_behavior::BehaviorError;
use npc_core::NpcId;
use npc_interact::InteractError;
use npc_plan::PlanError;
use npc_sequence::SequenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world configuration error: {0}")]
    Config(String),

    #[error("npc {0} not found")]
    UnknownNpc(NpcId),

    #[error("npc {npc} is not driven by a {expected}")]
    WrongDriver {
        npc:      NpcId,
        expected: &'static str,
    },

    #[error("npc {0} has no interaction profile")]
    NoArbiter(NpcId),

    #[error("plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("sequence error: {0}")]
    Sequence(#[from] SequenceError),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("interaction error: {0}")]
    Interact(#[from] InteractError),
}

pub type WorldResult<T> = Result<T, WorldError>;
