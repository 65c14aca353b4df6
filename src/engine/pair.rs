//! Pair Next Round.

use crate::models::{GameRecord, Pairing, PlayerId, Points, Round, Section};

use super::groups::{build_score_groups, emit_game, pair_group, sort_for_pairing};
use super::{player_or_missing, EngineError};

/// Produce the next round's pairings and append the round to the section.
///
/// Players are filtered to the non-withdrawn roster, sorted by (score desc,
/// rating desc, name asc) and partitioned into equal-score groups. Each
/// group pairs its top half against its bottom half; players a group cannot
/// place float down into the next one. On an odd field the bye recipient is
/// withheld first: lowest score, then lowest rating, then earliest name,
/// preferring players without a prior bye. The bye is a full point,
/// credited here rather than at result time, and sits on the last board.
///
/// Histories (`opponents`/`colors`, bye credit) are updated in place as
/// pairings are chosen, so a repeated call continues from the new state.
pub fn pair_next_round(section: &mut Section) -> Result<&Round, EngineError> {
    if !section.locked {
        return Err(EngineError::SectionNotLocked);
    }
    if section.rounds.len() as u32 >= section.planned_rounds {
        return Err(EngineError::AllRoundsStarted(section.planned_rounds));
    }

    let round_number = section.rounds.len() as u32 + 1;

    let mut active = section.active_player_ids();
    sort_for_pairing(section, &mut active)?;

    // Odd field: withhold the bye recipient before grouping.
    let mut bye_recipient = None;
    if active.len() % 2 == 1 {
        let chosen = select_bye_recipient(section, &active)?;
        active.retain(|id| *id != chosen);
        bye_recipient = Some(chosen);
    }

    let groups = build_score_groups(section, &active)?;

    let mut pairings: Vec<Pairing> = Vec::new();
    let mut floats: Vec<PlayerId> = Vec::new();
    for group in &groups {
        // Floats enter at the head of the next group, keeping their order.
        let mut members = std::mem::take(&mut floats);
        members.extend(group.iter().cloned());
        floats = pair_group(section, &members, &mut pairings)?;
    }

    // Leftover queue: section floats first, then anyone the groups missed.
    let mut queue = floats;
    for id in &active {
        let already_queued = queue.contains(id);
        let already_paired = pairings.iter().any(|p| p.involves(id));
        if !already_queued && !already_paired {
            queue.push(id.clone());
        }
    }

    while queue.len() >= 2 {
        let a = queue.remove(0);
        let seeker = player_or_missing(section, &a)?;
        let partner_pos = queue
            .iter()
            .position(|b| !seeker.has_played(b))
            .unwrap_or(0);
        let b = queue.remove(partner_pos);
        emit_game(section, &a, &b, &mut pairings)?;
    }

    // A single unpaired survivor can only occur when no bye was withheld.
    if bye_recipient.is_none() {
        bye_recipient = queue.pop();
    }

    if let Some(id) = bye_recipient {
        let board = pairings.len() as u32 + 1;
        pairings.push(Pairing::bye(board, id.clone()));

        let player = section
            .player_mut(&id)
            .ok_or_else(|| EngineError::PlayerMissing(id.clone()))?;
        player.score += Points::ONE;
        player.results.push(GameRecord {
            round: round_number,
            opponent_id: None,
            points: Points::ONE,
            is_bye: true,
        });
        player.had_bye = true;
    }

    section.rounds.push(Round {
        number: round_number,
        pairings,
    });
    let last = section.rounds.len() - 1;
    Ok(&section.rounds[last])
}

/// Choose the bye recipient from the active field.
///
/// Minimum by (score, rating, name) among players who have not yet had a
/// bye; if everyone has, minimum over the whole field.
fn select_bye_recipient(
    section: &Section,
    active: &[PlayerId],
) -> Result<PlayerId, EngineError> {
    // Pre-resolved keys keep the comparator infallible.
    let mut keyed: Vec<(PlayerId, i64, u32, String, bool)> = Vec::with_capacity(active.len());
    for id in active {
        let p = player_or_missing(section, id)?;
        keyed.push((
            id.clone(),
            p.score.millis(),
            p.rating,
            p.name.clone(),
            p.had_bye,
        ));
    }
    keyed.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.2.cmp(&b.2)).then_with(|| a.3.cmp(&b.3)));

    keyed
        .iter()
        .find(|k| !k.4)
        .or_else(|| keyed.first())
        .map(|k| k.0.clone())
        .ok_or_else(|| EngineError::PairingStateCorrupt("no bye candidate in an odd field".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Player;

    fn section_with(ratings: &[(&str, u32)], planned_rounds: u32) -> Section {
        let mut section = Section::new("Open", planned_rounds);
        for (name, rating) in ratings {
            section
                .players
                .push(Player::new("Open", *name).with_rating(*rating));
        }
        section.lock();
        section
    }

    fn white_name(section: &Section, round: u32, board: u32) -> String {
        let pairing = section.round(round).unwrap().board(board).unwrap();
        section.player(&pairing.white_id).unwrap().name.clone()
    }

    fn black_name(section: &Section, round: u32, board: u32) -> String {
        let pairing = section.round(round).unwrap().board(board).unwrap();
        let black = pairing.black_id.as_ref().unwrap();
        section.player(black).unwrap().name.clone()
    }

    #[test]
    fn test_requires_locked_section() {
        let mut section = section_with(&[("Alice", 1800), ("Bob", 1600)], 4);
        section.locked = false;

        assert_eq!(
            pair_next_round(&mut section).unwrap_err(),
            EngineError::SectionNotLocked
        );
    }

    #[test]
    fn test_respects_planned_rounds() {
        let mut section = section_with(&[("Alice", 1800), ("Bob", 1600)], 1);
        pair_next_round(&mut section).unwrap();

        assert_eq!(
            pair_next_round(&mut section).unwrap_err(),
            EngineError::AllRoundsStarted(1)
        );
    }

    #[test]
    fn test_four_player_round_one() {
        let mut section = section_with(
            &[("Alice", 1800), ("Bob", 1600), ("Carol", 1400), ("Dave", 1200)],
            4,
        );
        pair_next_round(&mut section).unwrap();

        // Top half vs bottom half, first player White on empty histories
        assert_eq!(white_name(&section, 1, 1), "Alice");
        assert_eq!(black_name(&section, 1, 1), "Carol");
        assert_eq!(white_name(&section, 1, 2), "Bob");
        assert_eq!(black_name(&section, 1, 2), "Dave");
    }

    #[test]
    fn test_five_player_bye_goes_to_lowest_rated() {
        let mut section = section_with(
            &[
                ("Alice", 1800),
                ("Bob", 1600),
                ("Carol", 1400),
                ("Dave", 1200),
                ("Eve", 1000),
            ],
            4,
        );
        pair_next_round(&mut section).unwrap();

        let round = section.round(1).unwrap();
        assert_eq!(round.pairings.len(), 3);

        // The bye is withheld before grouping, so A-D pair as two halves
        assert_eq!(white_name(&section, 1, 1), "Alice");
        assert_eq!(black_name(&section, 1, 1), "Carol");
        assert_eq!(white_name(&section, 1, 2), "Bob");
        assert_eq!(black_name(&section, 1, 2), "Dave");

        let bye = round.board(3).unwrap();
        assert!(bye.is_bye);
        assert_eq!(section.player(&bye.white_id).unwrap().name, "Eve");

        let eve = section.player_by_name("Eve").unwrap();
        assert!(eve.had_bye);
        assert_eq!(eve.score, Points::ONE);
        assert_eq!(eve.results.len(), 1);
        assert!(eve.results[0].is_bye);
    }

    #[test]
    fn test_round_two_colors_after_decisive_round_one() {
        let mut section = section_with(
            &[("Alice", 1800), ("Bob", 1600), ("Carol", 1400), ("Dave", 1200)],
            4,
        );
        pair_next_round(&mut section).unwrap();
        crate::engine::apply_result(&mut section, 1, 1, "1-0").unwrap();
        crate::engine::apply_result(&mut section, 1, 2, "1-0").unwrap();

        pair_next_round(&mut section).unwrap();

        // One-point group {Alice, Bob}: equal 1W0B histories, higher-rated
        // Alice takes Black. Zero group {Carol, Dave}: both 0W1B, Dave White.
        assert_eq!(white_name(&section, 2, 1), "Bob");
        assert_eq!(black_name(&section, 2, 1), "Alice");
        assert_eq!(white_name(&section, 2, 2), "Dave");
        assert_eq!(black_name(&section, 2, 2), "Carol");
    }

    #[test]
    fn test_bye_prefers_players_without_prior_bye() {
        let mut section = section_with(
            &[("Alice", 1800), ("Bob", 1600), ("Eve", 1000)],
            4,
        );
        let eve_id = section.player_by_name("Eve").unwrap().id.clone();
        section.player_mut(&eve_id).unwrap().had_bye = true;

        pair_next_round(&mut section).unwrap();

        let round = section.round(1).unwrap();
        let bye = round.pairings.iter().find(|p| p.is_bye).unwrap();
        // Eve already had one; Bob is the lowest-ranked without
        assert_eq!(section.player(&bye.white_id).unwrap().name, "Bob");
    }

    #[test]
    fn test_bye_fallback_when_everyone_had_one() {
        let mut section = section_with(&[("Alice", 1800), ("Bob", 1600), ("Eve", 1000)], 4);
        for player in &mut section.players {
            player.had_bye = true;
        }

        pair_next_round(&mut section).unwrap();

        let round = section.round(1).unwrap();
        let bye = round.pairings.iter().find(|p| p.is_bye).unwrap();
        assert_eq!(section.player(&bye.white_id).unwrap().name, "Eve");
    }

    #[test]
    fn test_roster_of_one_gets_bye_only() {
        let mut section = section_with(&[("Alice", 1800)], 4);
        pair_next_round(&mut section).unwrap();

        let round = section.round(1).unwrap();
        assert_eq!(round.pairings.len(), 1);
        assert!(round.pairings[0].is_bye);
    }

    #[test]
    fn test_empty_roster_pairs_nothing() {
        let mut section = section_with(&[], 4);
        pair_next_round(&mut section).unwrap();

        assert!(section.round(1).unwrap().pairings.is_empty());
    }

    #[test]
    fn test_all_withdrawn_pairs_nothing() {
        let mut section = section_with(&[("Alice", 1800), ("Bob", 1600)], 4);
        for player in &mut section.players {
            player.withdrawn = true;
        }
        pair_next_round(&mut section).unwrap();

        assert!(section.round(1).unwrap().pairings.is_empty());
    }

    #[test]
    fn test_withdrawn_players_are_skipped() {
        let mut section = section_with(
            &[("Alice", 1800), ("Bob", 1600), ("Carol", 1400), ("Dave", 1200)],
            4,
        );
        let dave_id = section.player_by_name("Dave").unwrap().id.clone();
        section.player_mut(&dave_id).unwrap().withdrawn = true;

        pair_next_round(&mut section).unwrap();

        let round = section.round(1).unwrap();
        assert!(round.pairings.iter().all(|p| !p.involves(&dave_id)));
        assert!(round.pairings.iter().any(|p| p.is_bye));
    }

    #[test]
    fn test_forced_rematch_in_two_player_field() {
        let mut section = section_with(&[("Alice", 1800), ("Bob", 1600)], 4);
        pair_next_round(&mut section).unwrap();
        crate::engine::apply_result(&mut section, 1, 1, "1-0").unwrap();
        pair_next_round(&mut section).unwrap();

        // Scores differ, each is its own group; the leader floats down and
        // the fallback scan accepts the rematch since no alternative exists.
        let round = section.round(2).unwrap();
        assert_eq!(round.pairings.len(), 1);
        assert!(!round.pairings[0].is_bye);
    }

    #[test]
    fn test_at_most_one_bye_per_round() {
        let mut section = section_with(
            &[
                ("Alice", 1800),
                ("Bob", 1700),
                ("Carol", 1600),
                ("Dave", 1500),
                ("Eve", 1400),
                ("Frank", 1300),
                ("Grace", 1200),
            ],
            6,
        );
        for _ in 0..3 {
            let (number, board_count) = {
                let round = pair_next_round(&mut section).unwrap();
                let byes = round.pairings.iter().filter(|p| p.is_bye).count();
                assert_eq!(byes, 1);
                (round.number, round.pairings.len() as u32)
            };
            for board in 1..=board_count {
                let is_bye = section.round(number).unwrap().board(board).unwrap().is_bye;
                if !is_bye {
                    crate::engine::apply_result(&mut section, number, board, "0.5-0.5").unwrap();
                }
            }
        }
    }

    #[test]
    fn test_no_duplicate_players_within_a_round() {
        let mut section = section_with(
            &[
                ("Alice", 1800),
                ("Bob", 1700),
                ("Carol", 1600),
                ("Dave", 1500),
                ("Eve", 1400),
            ],
            4,
        );
        pair_next_round(&mut section).unwrap();

        let mut seen = Vec::new();
        for pairing in &section.round(1).unwrap().pairings {
            seen.push(pairing.white_id.clone());
            if let Some(black) = &pairing.black_id {
                seen.push(black.clone());
            }
        }
        let mut deduped = seen.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(seen.len(), deduped.len());
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_pairing_is_deterministic() {
        let build = || {
            let mut section = section_with(
                &[
                    ("Alice", 1800),
                    ("Bob", 1700),
                    ("Carol", 1600),
                    ("Dave", 1500),
                    ("Eve", 1400),
                    ("Frank", 1300),
                ],
                5,
            );
            pair_next_round(&mut section).unwrap();
            crate::engine::apply_result(&mut section, 1, 1, "1-0").unwrap();
            crate::engine::apply_result(&mut section, 1, 2, "0-1").unwrap();
            crate::engine::apply_result(&mut section, 1, 3, "0.5-0.5").unwrap();
            pair_next_round(&mut section).unwrap();
            section.round(2).unwrap().clone()
        };

        assert_eq!(build(), build());
    }

    #[test]
    fn test_floats_pair_into_next_group() {
        // Three players at 1.0 and one at 0.0: the one-point group floats
        // its odd player down into the zero group.
        let mut section = section_with(
            &[("Alice", 1800), ("Bob", 1600), ("Carol", 1400), ("Dave", 1200)],
            4,
        );
        for name in ["Alice", "Bob", "Carol"] {
            let id = section.player_by_name(name).unwrap().id.clone();
            section.player_mut(&id).unwrap().score = Points::ONE;
        }

        pair_next_round(&mut section).unwrap();

        // Group [Alice, Bob, Carol]: top [Alice, Bob] vs bottom [Carol];
        // Alice takes Carol, Bob has no mirror partner and floats to Dave.
        let round = section.round(1).unwrap();
        assert_eq!(round.pairings.len(), 2);
        let bob_id = section.player_by_name("Bob").unwrap().id.clone();
        let dave_id = section.player_by_name("Dave").unwrap().id.clone();
        assert!(round.pairings[1].involves(&bob_id));
        assert!(round.pairings[1].involves(&dave_id));
    }
}
