//! Error types.
//!
//! Commands validate before they mutate, so any `CommandError` leaves the
//! game exactly as it was.

use thiserror::Error;

use super::state::Phase;

/// A command was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("game is over")]
    GameOver,

    #[error("action {action} is not legal in {phase:?}")]
    IllegalAction { action: String, phase: Phase },

    #[error("{zone} index {index} out of range (size {len})")]
    IndexOutOfRange {
        zone: &'static str,
        index: usize,
        len: usize,
    },

    #[error("no card awaiting a Mindbug decision")]
    NoPendingCard,

    #[error("no attacker awaiting a block decision")]
    NoPendingAttacker,

    #[error("no Mindbug tokens left")]
    NoMindbugs,

    #[error("no selection request is open")]
    NoActiveRequest,

    #[error("a selection request is already open")]
    RequestAlreadyOpen,

    #[error("target is not a candidate of the open request")]
    InvalidSelection,

    #[error(transparent)]
    Parse(#[from] ParseActionError),
}

/// An action string could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("unknown action kind: {0}")]
    UnknownKind(String),

    #[error("action {kind} needs a non-negative index, got {index}")]
    NegativeIndex { kind: String, index: i32 },
}

/// Card data could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid card record {name:?}: {reason}")]
    InvalidRecord { name: String, reason: String },
}

impl LoadError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        LoadError::InvalidRecord {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// A state snapshot could not be written or read.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot encoding error: {0}")]
    Bincode(#[from] bincode::Error),
}
