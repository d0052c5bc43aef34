use npc_core::WaitError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("step index {index} out of range for a sequence of {len} steps")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("sequence has no steps")]
    Empty,

    #[error(transparent)]
    Wait(#[from] WaitError),
}

pub type SequenceResult<T> = Result<T, SequenceError>;
