//! Score-group construction and within-group pairing.

use crate::models::{Color, Pairing, PlayerId, Section};

use super::{assign_colors, player_or_missing, EngineError};

/// Sort player ids for pairing: score descending, rating descending,
/// name ascending. This order is total (names are unique per section), so
/// pairing is reproducible from roster state alone.
pub(crate) fn sort_for_pairing(
    section: &Section,
    ids: &mut [PlayerId],
) -> Result<(), EngineError> {
    // Pre-resolve keys so the comparator itself cannot fail.
    let mut keyed: Vec<(PlayerId, i64, u32, String)> = Vec::with_capacity(ids.len());
    for id in ids.iter() {
        let p = player_or_missing(section, id)?;
        keyed.push((id.clone(), p.score.millis(), p.rating, p.name.clone()));
    }
    keyed.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.3.cmp(&b.3))
    });
    for (slot, (id, _, _, _)) in ids.iter_mut().zip(keyed) {
        *slot = id;
    }
    Ok(())
}

/// Partition an already-sorted id list into contiguous equal-score groups,
/// highest score first. Equal-score runs are already in seed order (rating
/// descending, name ascending) from the pairing sort.
pub(crate) fn build_score_groups(
    section: &Section,
    ordered: &[PlayerId],
) -> Result<Vec<Vec<PlayerId>>, EngineError> {
    let mut groups: Vec<Vec<PlayerId>> = Vec::new();
    let mut current_score = None;

    for id in ordered {
        let score = player_or_missing(section, id)?.score;
        match groups.last_mut() {
            Some(group) if current_score == Some(score) => group.push(id.clone()),
            _ => {
                groups.push(vec![id.clone()]);
                current_score = Some(score);
            }
        }
    }

    Ok(groups)
}

/// Pair one score group top-half against bottom-half.
///
/// `members` is the group in seed order with any floats from the previous
/// group already prepended. Chosen pairs are emitted immediately (boards in
/// emission order) and both players' histories are updated in place, so
/// later scans in this and lower groups observe them. Returns the players
/// who could not be paired, in float order.
pub(crate) fn pair_group(
    section: &mut Section,
    members: &[PlayerId],
    pairings: &mut Vec<Pairing>,
) -> Result<Vec<PlayerId>, EngineError> {
    let top_count = members.len().div_ceil(2);
    let (top, bottom) = members.split_at(top_count);

    let mut used = vec![false; bottom.len()];
    let mut floats: Vec<PlayerId> = Vec::new();

    for (i, seeker) in top.iter().enumerate() {
        if i >= bottom.len() {
            floats.push(seeker.clone());
            continue;
        }

        let seeker_player = player_or_missing(section, seeker)?;

        // First pass: unused partners from the mirrored position down,
        // skipping anyone already faced.
        let mut chosen = (i..bottom.len())
            .find(|&j| !used[j] && !seeker_player.has_played(&bottom[j]));

        // Fallback: first unused partner anywhere, rematch or not.
        if chosen.is_none() {
            chosen = (0..bottom.len()).find(|&j| !used[j]);
        }

        match chosen {
            Some(j) => {
                used[j] = true;
                emit_game(section, seeker, &bottom[j], pairings)?;
            }
            None => floats.push(seeker.clone()),
        }
    }

    for (j, partner) in bottom.iter().enumerate() {
        if !used[j] {
            floats.push(partner.clone());
        }
    }

    Ok(floats)
}

/// Emit a game pairing for `(a, b)`: run color selection, append the
/// pairing at the next board, and record the matchup in both histories.
pub(crate) fn emit_game(
    section: &mut Section,
    a: &PlayerId,
    b: &PlayerId,
    pairings: &mut Vec<Pairing>,
) -> Result<(), EngineError> {
    let pa = player_or_missing(section, a)?;
    let pb = player_or_missing(section, b)?;
    let (white_id, black_id) = assign_colors(pa, pb);

    let board = pairings.len() as u32 + 1;
    pairings.push(Pairing::game(board, white_id.clone(), black_id.clone()));

    section
        .player_mut(&white_id)
        .ok_or_else(|| EngineError::PlayerMissing(white_id.clone()))?
        .record_game(black_id.clone(), Color::White);
    section
        .player_mut(&black_id)
        .ok_or_else(|| EngineError::PlayerMissing(black_id.clone()))?
        .record_game(white_id, Color::Black);

    Ok(())
}
