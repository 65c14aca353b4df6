//! Result application with correction support.

use crate::models::{Color, GameRecord, GameResult, Player, PlayerId, Section};

use super::EngineError;

/// Record `token` as the result of `(round_number, board)`.
///
/// If the pairing already holds a result this is a correction: the prior
/// credit is retracted (scores decremented, the matching history entries
/// removed) before the new one is applied. Applying the same token twice is
/// a no-op overall. Every lookup happens before the first mutation, so a
/// failing call leaves the Section exactly as it was.
pub fn apply_result(
    section: &mut Section,
    round_number: u32,
    board: u32,
    token: &str,
) -> Result<(), EngineError> {
    let new_result = GameResult::parse(token)
        .ok_or_else(|| EngineError::InvalidResultToken(token.to_string()))?;

    let round_idx = section
        .rounds
        .iter()
        .position(|r| r.number == round_number)
        .ok_or(EngineError::RoundNotFound(round_number))?;
    let pairing_idx = section.rounds[round_idx]
        .pairings
        .iter()
        .position(|p| p.board == board)
        .ok_or(EngineError::BoardNotFound {
            round: round_number,
            board,
        })?;
    let pairing = section.rounds[round_idx].pairings[pairing_idx].clone();

    let white_id = pairing.white_id.clone();
    let black_id = pairing.black_id.clone();

    let white = section
        .player(&white_id)
        .ok_or_else(|| EngineError::PlayerMissing(white_id.clone()))?;
    let black = match &black_id {
        Some(id) => Some(
            section
                .player(id)
                .ok_or_else(|| EngineError::PlayerMissing(id.clone()))?,
        ),
        None => None,
    };

    // Locate the entries a retraction would remove before touching anything.
    let mut white_retract = None;
    let mut black_retract = None;
    if pairing.result.is_some() {
        white_retract = Some(locate_entry(
            white,
            round_number,
            black_id.as_ref(),
            pairing.is_bye,
        )?);
        if let Some(black) = black {
            black_retract = Some(locate_entry(black, round_number, Some(&white_id), false)?);
        }
    }

    // All lookups done; mutations from here on cannot fail.
    if let Some(prev_result) = pairing.result {
        let (w_prev, b_prev) = prev_result.points();
        if let Some(idx) = white_retract {
            let white = section
                .player_mut(&white_id)
                .ok_or_else(|| EngineError::PlayerMissing(white_id.clone()))?;
            white.score -= w_prev;
            white.results.remove(idx);
        }
        if let (Some(idx), Some(black_id)) = (black_retract, &black_id) {
            let black = section
                .player_mut(black_id)
                .ok_or_else(|| EngineError::PlayerMissing(black_id.clone()))?;
            black.score -= b_prev;
            black.results.remove(idx);
        }
    }

    section.rounds[round_idx].pairings[pairing_idx].result = Some(new_result);

    let (w_new, b_new) = new_result.points();
    let white = section
        .player_mut(&white_id)
        .ok_or_else(|| EngineError::PlayerMissing(white_id.clone()))?;
    white.score += w_new;
    white.results.push(GameRecord {
        round: round_number,
        opponent_id: black_id.clone(),
        points: w_new,
        is_bye: pairing.is_bye,
    });
    white.sync_bye_flag();
    if let Some(black_id) = &black_id {
        // Idempotent: the pairer already recorded the matchup unless a
        // director replaced a player after pairing.
        if !white.has_played(black_id) {
            white.record_game(black_id.clone(), Color::White);
        }

        let black = section
            .player_mut(black_id)
            .ok_or_else(|| EngineError::PlayerMissing(black_id.clone()))?;
        black.score += b_new;
        black.results.push(GameRecord {
            round: round_number,
            opponent_id: Some(white_id.clone()),
            points: b_new,
            is_bye: false,
        });
        if !black.has_played(&white_id) {
            black.record_game(white_id.clone(), Color::Black);
        }
    }

    Ok(())
}

/// Find the history entry this pairing wrote for `player`, by
/// `(round, opponent)` for games or `(round, is_bye)` for byes.
fn locate_entry(
    player: &Player,
    round_number: u32,
    opponent: Option<&PlayerId>,
    is_bye: bool,
) -> Result<usize, EngineError> {
    player
        .results
        .iter()
        .position(|r| {
            r.round == round_number
                && if is_bye {
                    r.is_bye
                } else {
                    r.opponent_id.as_ref() == opponent
                }
        })
        .ok_or_else(|| {
            EngineError::PairingStateCorrupt(format!(
                "no round {} result entry to retract for player {}",
                round_number, player.id
            ))
        })
}
