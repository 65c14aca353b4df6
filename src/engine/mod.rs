//! Swiss pairing and scoring engine.
//!
//! Pure, synchronous operations over a caller-supplied [`Section`]:
//!
//! - **pair**: produce the next round's pairings with color assignments
//! - **apply**: record or correct a game result
//! - **overrides**: director edits on a single pairing
//! - **roster**: registration and withdrawal
//!
//! The engine does no I/O and never logs; every failure is returned as a
//! typed [`EngineError`] and a failed call leaves the Section unchanged.
//! Given identical input, pairing is deterministic across platforms: all
//! orderings below are total and no floating-point values are compared.

mod apply;
mod color;
mod groups;
mod overrides;
mod pair;
mod roster;

pub use apply::apply_result;
pub use color::assign_colors;
pub use overrides::{td_force_color, td_replace, td_swap};
pub use pair::pair_next_round;
pub use roster::{register_player, withdraw_player};

use thiserror::Error;

use crate::models::{Player, PlayerId, Section};

/// Roster lookup that promotes a dangling reference to [`EngineError::PlayerMissing`].
pub(crate) fn player_or_missing<'a>(
    section: &'a Section,
    id: &PlayerId,
) -> Result<&'a Player, EngineError> {
    section
        .player(id)
        .ok_or_else(|| EngineError::PlayerMissing(id.clone()))
}

/// Errors returned by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid result token: {0:?}")]
    InvalidResultToken(String),

    #[error("unknown player id: {0}")]
    UnknownPlayerId(PlayerId),

    #[error("section is not locked")]
    SectionNotLocked,

    #[error("section is locked; the roster is frozen")]
    SectionLocked,

    #[error("all {0} planned rounds have been started")]
    AllRoundsStarted(u32),

    #[error("round {0} not found")]
    RoundNotFound(u32),

    #[error("board {board} not found in round {round}")]
    BoardNotFound { round: u32, board: u32 },

    #[error("player {0} is paired but missing from the roster")]
    PlayerMissing(PlayerId),

    #[error("duplicate player: {0}")]
    DuplicatePlayer(String),

    #[error("pairing state corrupt: {0}")]
    PairingStateCorrupt(String),
}
