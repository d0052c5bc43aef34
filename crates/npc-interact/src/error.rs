use npc_core::{NpcId, WaitError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InteractError {
    #[error("{0} is already parked by something other than this arbiter")]
    DriverBusy(NpcId),

    #[error(transparent)]
    Wait(#[from] WaitError),
}

pub type InteractResult<T> = Result<T, InteractError>;
