//! Error types for the superweapon core.
//!
//! The per-tick passes never fail: malformed collaborator data is skipped.
//! These errors cover everything around them - loading rules and scenarios,
//! host lookups and snapshots.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for the superweapon core.
#[derive(Debug, Error)]
pub enum GameError {
    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Rules data failed validation.
    #[error("Invalid rules: {}", .0.join("; "))]
    InvalidRules(Vec<String>),

    /// A structure type identifier is not registered.
    #[error("Unknown structure type: {0}")]
    UnknownStructureType(String),

    /// A unit type identifier is not registered.
    #[error("Unknown unit type: {0}")]
    UnknownUnitType(String),

    /// A faction identifier is not part of the simulation.
    #[error("Unknown faction: {0}")]
    UnknownFaction(u32),

    /// A superweapon slot is outside the faction's collection.
    #[error("Invalid superweapon slot: {0}")]
    InvalidSlot(usize),

    /// Invalid entity reference.
    #[error("Entity not found: {0}")]
    EntityNotFound(u64),

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
