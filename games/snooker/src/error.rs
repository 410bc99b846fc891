//! Errors raised at the host boundary: match setup and config loading.
//!
//! Nothing in the tick path returns these. Stale entity references inside a
//! frame are logged and skipped instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnookerError {
    /// A player name is empty once surrounding whitespace is trimmed.
    #[error("player {seat} needs a name")]
    EmptyPlayerName { seat: usize },

    /// Both players entered the same name, ignoring case.
    #[error("players must have different names (both are {name:?})")]
    DuplicatePlayerNames { name: String },

    #[error("invalid config JSON: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// A config value parsed but cannot drive the simulation.
    #[error("config field `{field}` out of range: {value}")]
    ConfigOutOfRange { field: &'static str, value: f64 },
}
