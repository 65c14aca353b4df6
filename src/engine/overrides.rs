//! Director override edits on a single pairing.
//!
//! These edit who sits where on a board; they never touch scores or
//! history. `colors`/`opponents` arrays record what was actually played,
//! so an override before a result simply changes who the eventual result
//! will credit.

use crate::models::{Color, Pairing, PlayerId, Section};

use super::EngineError;

fn pairing_mut<'a>(
    section: &'a mut Section,
    round_number: u32,
    board: u32,
) -> Result<&'a mut Pairing, EngineError> {
    let round = section
        .round_mut(round_number)
        .ok_or(EngineError::RoundNotFound(round_number))?;
    round.board_mut(board).ok_or(EngineError::BoardNotFound {
        round: round_number,
        board,
    })
}

/// Exchange the two sides of a board.
pub fn td_swap(section: &mut Section, round_number: u32, board: u32) -> Result<(), EngineError> {
    let pairing = pairing_mut(section, round_number, board)?;
    match pairing.black_id.take() {
        Some(black) => {
            let old_white = std::mem::replace(&mut pairing.white_id, black);
            pairing.black_id = Some(old_white);
            pairing.push_note("colors swapped");
            Ok(())
        }
        None => Err(EngineError::PairingStateCorrupt(
            "cannot swap colors on a bye".to_string(),
        )),
    }
}

/// Put `new_player_id` on one side of a board.
pub fn td_replace(
    section: &mut Section,
    round_number: u32,
    board: u32,
    side: Color,
    new_player_id: PlayerId,
) -> Result<(), EngineError> {
    if section.player(&new_player_id).is_none() {
        return Err(EngineError::UnknownPlayerId(new_player_id));
    }

    let pairing = pairing_mut(section, round_number, board)?;
    match side {
        Color::White => {
            let note = format!("white replaced: {} -> {}", pairing.white_id, new_player_id);
            pairing.white_id = new_player_id;
            pairing.push_note(&note);
        }
        Color::Black => {
            let old = pairing.black_id.as_ref().ok_or_else(|| {
                EngineError::PairingStateCorrupt("cannot replace black on a bye".to_string())
            })?;
            let note = format!("black replaced: {} -> {}", old, new_player_id);
            pairing.black_id = Some(new_player_id);
            pairing.push_note(&note);
        }
    }
    Ok(())
}

/// Ensure `white_player_id` holds White on a board, swapping if needed.
pub fn td_force_color(
    section: &mut Section,
    round_number: u32,
    board: u32,
    white_player_id: PlayerId,
) -> Result<(), EngineError> {
    if section.player(&white_player_id).is_none() {
        return Err(EngineError::UnknownPlayerId(white_player_id));
    }

    let pairing = pairing_mut(section, round_number, board)?;

    if pairing.white_id == white_player_id {
        return Ok(());
    }
    if pairing.black_id.as_ref() != Some(&white_player_id) {
        return Err(EngineError::PairingStateCorrupt(format!(
            "player {} is not on board {} of round {}",
            white_player_id, board, round_number
        )));
    }

    pairing.black_id = Some(std::mem::replace(&mut pairing.white_id, white_player_id));
    let note = format!("white forced: {}", pairing.white_id);
    pairing.push_note(&note);
    Ok(())
}
