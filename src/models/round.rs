//! Rounds - ordered sequences of board pairings.

use serde::{Deserialize, Serialize};

use super::Pairing;

/// One round of the tournament.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// 1-based round number, equal to the round's position in the section
    pub number: u32,

    /// Pairings in board order
    #[serde(default)]
    pub pairings: Vec<Pairing>,
}

impl Round {
    /// Create an empty round.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            pairings: Vec::new(),
        }
    }

    /// Look up a pairing by board number.
    pub fn board(&self, board: u32) -> Option<&Pairing> {
        self.pairings.iter().find(|p| p.board == board)
    }

    /// Mutable lookup by board number.
    pub fn board_mut(&mut self, board: u32) -> Option<&mut Pairing> {
        self.pairings.iter_mut().find(|p| p.board == board)
    }
}
