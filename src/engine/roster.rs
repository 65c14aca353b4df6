//! Roster registration and withdrawal.

use crate::models::{Player, PlayerId, Section};

use super::EngineError;

/// Register a player. The section must still be open.
pub fn register_player(section: &mut Section, player: Player) -> Result<(), EngineError> {
    if section.locked {
        return Err(EngineError::SectionLocked);
    }
    if section.player(&player.id).is_some() {
        return Err(EngineError::DuplicatePlayer(player.name));
    }
    section.players.push(player);
    Ok(())
}

/// Mark a player withdrawn. Their recorded results stand, but they are
/// excluded from future pairings.
pub fn withdraw_player(section: &mut Section, id: &PlayerId) -> Result<(), EngineError> {
    match section.player_mut(id) {
        Some(player) => {
            player.withdrawn = true;
            Ok(())
        }
        None => Err(EngineError::UnknownPlayerId(id.clone())),
    }
}
