//! Game result tokens and point arithmetic.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Points;

/// The outcome of a single game, from White's perspective.
///
/// Serializes as the canonical token string. The glyph form `½-½` is
/// accepted on input and normalized to `0.5-0.5` on storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "0.5-0.5", alias = "½-½")]
    Draw,
}

impl GameResult {
    /// Parse a result token. Returns None for anything outside the closed set.
    pub fn parse(token: &str) -> Option<GameResult> {
        match token {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "0.5-0.5" | "½-½" => Some(GameResult::Draw),
            _ => None,
        }
    }

    /// Canonical token string.
    pub fn as_token(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "0.5-0.5",
        }
    }

    /// Point split as (white, black).
    pub fn points(&self) -> (Points, Points) {
        match self {
            GameResult::WhiteWins => (Points::ONE, Points::ZERO),
            GameResult::BlackWins => (Points::ZERO, Points::ONE),
            GameResult::Draw => (Points::HALF, Points::HALF),
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}
