//! Tiebreak computation and standings.
//!
//! Computes the ordering measures from stored results:
//! - Buchholz (Solkoff): sum of opponents' current scores
//! - Modified Median: Buchholz without the best and worst opponent
//! - Sonneborn-Berger: opponents' scores weighted by the result achieved
//! - Cumulative: sum of the running score after each round
//!
//! All measures are recomputed on demand from the Section; nothing is
//! cached between calls.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::{Player, PlayerId, Points, Section};

/// The four tiebreak measures, in comparison order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tiebreaks {
    pub buchholz: Points,
    pub median: Points,
    pub sonneborn_berger: Points,
    pub cumulative: Points,
}

/// One row of the final standings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    pub rank: u32,
    pub player_id: PlayerId,
    pub name: String,
    pub rating: u32,
    pub score: Points,
    pub tiebreaks: Tiebreaks,
}

/// Compute the tiebreaks for one player from current Section state.
///
/// Bye rows contribute to no measure except Cumulative. Withdrawn
/// opponents drop out of the Buchholz family but still count for
/// Sonneborn-Berger, whose weights reflect games actually won or drawn.
pub fn tiebreaks_for(section: &Section, player: &Player) -> Tiebreaks {
    let mut opponent_scores: Vec<Points> = Vec::new();
    let mut sonneborn_berger = Points::ZERO;

    for record in &player.results {
        if record.is_bye {
            continue;
        }
        let Some(opponent_id) = &record.opponent_id else {
            continue;
        };
        let Some(opponent) = section.player(opponent_id) else {
            continue;
        };

        if record.points == Points::ONE {
            sonneborn_berger += opponent.score;
        } else if record.points == Points::HALF {
            sonneborn_berger += opponent.score.halved();
        }

        if opponent.withdrawn {
            continue;
        }
        opponent_scores.push(opponent.score);
    }

    let buchholz: Points = opponent_scores.iter().copied().sum();
    let median = if opponent_scores.len() > 2 {
        let best = opponent_scores.iter().copied().max().unwrap_or(Points::ZERO);
        let worst = opponent_scores.iter().copied().min().unwrap_or(Points::ZERO);
        buchholz - best - worst
    } else {
        buchholz
    };

    let mut by_round = player.results.clone();
    by_round.sort_by_key(|r| r.round);
    let mut running = Points::ZERO;
    let mut cumulative = Points::ZERO;
    for record in &by_round {
        running += record.points;
        cumulative += running;
    }

    Tiebreaks {
        buchholz,
        median,
        sonneborn_berger,
        cumulative,
    }
}

/// Head-to-head comparison: `Less` when `a` beat `b`.
///
/// The first decisive meeting in `a`'s history decides; draws are neutral.
fn direct_encounter(a: &Player, b: &Player) -> Ordering {
    for record in &a.results {
        if record.is_bye {
            continue;
        }
        if record.opponent_id.as_ref() == Some(&b.id) {
            if record.points == Points::ONE {
                return Ordering::Less;
            }
            if record.points == Points::ZERO {
                return Ordering::Greater;
            }
        }
    }
    Ordering::Equal
}

/// Rank the non-withdrawn roster.
///
/// Descending-better lexicographic order: score, Buchholz, Median,
/// Sonneborn-Berger, direct encounter, Cumulative, rating, then name
/// ascending. Names are unique per section, so the order is total.
pub fn compute_standings(section: &Section) -> Vec<StandingRow> {
    let mut entries: Vec<(&Player, Tiebreaks)> = section
        .players
        .iter()
        .filter(|p| !p.withdrawn)
        .map(|p| (p, tiebreaks_for(section, p)))
        .collect();

    entries.sort_by(|(pa, ta), (pb, tb)| {
        pb.score
            .cmp(&pa.score)
            .then_with(|| tb.buchholz.cmp(&ta.buchholz))
            .then_with(|| tb.median.cmp(&ta.median))
            .then_with(|| tb.sonneborn_berger.cmp(&ta.sonneborn_berger))
            .then_with(|| direct_encounter(pa, pb))
            .then_with(|| tb.cumulative.cmp(&ta.cumulative))
            .then_with(|| pb.rating.cmp(&pa.rating))
            .then_with(|| pa.name.cmp(&pb.name))
    });

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (player, tiebreaks))| StandingRow {
            rank: i as u32 + 1,
            player_id: player.id.clone(),
            name: player.name.clone(),
            rating: player.rating,
            score: player.score,
            tiebreaks,
        })
        .collect()
}
