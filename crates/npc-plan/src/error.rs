use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("route parse error: {0}")]
    Parse(String),

    #[error("min_actions {min} exceeds max_actions {max}")]
    InvalidCounts { min: u32, max: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;
