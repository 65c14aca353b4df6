//! Board pairings within a round.

use serde::{Deserialize, Serialize};

use super::{GameResult, PlayerId};

/// A single board in a round: two players, or one player receiving a bye.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    /// 1-based board number within the round
    pub board: u32,

    /// Player holding the white pieces (the bye recipient for a bye)
    pub white_id: PlayerId,

    /// Player holding the black pieces; None iff this is a bye
    #[serde(default)]
    pub black_id: Option<PlayerId>,

    /// Whether this board is a bye
    #[serde(default)]
    pub is_bye: bool,

    /// Recorded result, if any
    #[serde(default)]
    pub result: Option<GameResult>,

    /// Director annotations accumulated by override edits
    #[serde(default)]
    pub td_note: Option<String>,
}

impl Pairing {
    /// Create a game pairing with no result yet.
    pub fn game(board: u32, white_id: PlayerId, black_id: PlayerId) -> Self {
        Self {
            board,
            white_id,
            black_id: Some(black_id),
            is_bye: false,
            result: None,
            td_note: None,
        }
    }

    /// Create a full-point bye for `player_id`.
    ///
    /// The result starts out set: a bye is credited at pairing time.
    pub fn bye(board: u32, player_id: PlayerId) -> Self {
        Self {
            board,
            white_id: player_id,
            black_id: None,
            is_bye: true,
            result: Some(GameResult::WhiteWins),
            td_note: Some("auto-bye".to_string()),
        }
    }

    /// Append a director note, separated from any existing notes.
    pub fn push_note(&mut self, note: &str) {
        match &mut self.td_note {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(note);
            }
            None => self.td_note = Some(note.to_string()),
        }
    }

    /// Whether `player_id` occupies either side of this board.
    pub fn involves(&self, player_id: &PlayerId) -> bool {
        self.white_id == *player_id || self.black_id.as_ref() == Some(player_id)
    }
}
