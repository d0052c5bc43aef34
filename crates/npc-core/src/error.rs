//! Core error types.
//!
//! Sub-crates define their own error enums and wrap `WaitError` as one
//! variant via `From`.

use thiserror::Error;

/// Misuse of a [`WaitScope`][crate::WaitScope] token.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WaitError {
    #[error("wait token was cancelled and cannot start a new wait")]
    TokenCancelled,

    #[error("wait token was superseded by a newer arming of its scope")]
    StaleToken,
}
