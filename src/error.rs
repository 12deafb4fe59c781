//! Error types for timer operations

use thiserror::Error;

/// Errors returned by the timer state holder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// A countdown is already in progress
    #[error("countdown is already running")]
    AlreadyRunning,

    /// No countdown is in progress
    #[error("countdown is not running")]
    NotRunning,

    /// Fields cannot be edited while the countdown runs
    #[error("cannot edit {0} while the countdown is running")]
    Busy(&'static str),

    /// A lock guarding shared state was poisoned
    #[error("failed to lock {what}: {reason}")]
    Poisoned { what: &'static str, reason: String },
}

impl TimerError {
    pub(crate) fn poisoned(what: &'static str, reason: impl ToString) -> Self {
        Self::Poisoned {
            what,
            reason: reason.to_string(),
        }
    }

    /// Whether the error comes from calling an operation in the wrong state
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyRunning | Self::NotRunning | Self::Busy(_))
    }
}
