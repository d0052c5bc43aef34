use npc_core::WaitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("behavior configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Wait(#[from] WaitError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
