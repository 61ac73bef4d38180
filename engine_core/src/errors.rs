//! Definitions for error types used throughout the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum EngineError {
    /// Bracket shapes are only defined for 2 to 8 groups
    #[error("unsupported group count: {0}")]
    UnsupportedGroupCount(usize),

    /// Team total does not fit the requested format
    #[error("unsupported team count: {0}")]
    UnsupportedTeamCount(usize),

    /// Group standings are required but have not been initialized
    #[error("missing group standings")]
    MissingGroupStandings,

    /// Score payload rejected before it reaches a match
    #[error("invalid score: {0}")]
    InvalidScore(String),

    /// Match id does not exist in the addressed tournament
    #[error("match not found: {0}")]
    MatchNotFound(Uuid),

    /// Tournament id does not exist
    #[error("tournament not found: {0}")]
    TournamentNotFound(Uuid),

    /// Container id does not exist
    #[error("container not found: {0}")]
    ContainerNotFound(Uuid),

    /// Command precondition not met in the current status
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Internal invariant breached; the reduce step aborts and the prior
    /// state stays intact so callers can report the bug
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Only invariant breaches are fatal; everything else is a
    /// recoverable no-op for the caller.
    pub fn is_fatal(&self) -> bool {
        matches!(self, EngineError::InvariantViolation(_))
    }
}
