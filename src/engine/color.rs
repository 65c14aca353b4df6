//! Color assignment for a candidate pairing.

use crate::models::{Color, Player, PlayerId};

/// Decide colors for a candidate pair. Returns `(white_id, black_id)`.
///
/// The first matching rule wins:
///
/// 1. A player whose last two games were both White (and whose opponent's
///    were not) gets Black; both-Black gets White.
/// 2. Color balance: the player with the heavier White history gets Black,
///    unless both are equally due.
/// 3. Higher-rated player gets Black, once either player has a history.
/// 4. Default: the first player gets White.
pub fn assign_colors(a: &Player, b: &Player) -> (PlayerId, PlayerId) {
    let a_two_white = a.last_two_were(Color::White);
    let b_two_white = b.last_two_were(Color::White);
    let a_two_black = a.last_two_were(Color::Black);
    let b_two_black = b.last_two_were(Color::Black);

    if a_two_white && !b_two_white {
        return (b.id.clone(), a.id.clone());
    }
    if a_two_black && !b_two_black {
        return (a.id.clone(), b.id.clone());
    }
    if b_two_white && !a_two_white {
        return (a.id.clone(), b.id.clone());
    }
    if b_two_black && !a_two_black {
        return (b.id.clone(), a.id.clone());
    }

    let (a_whites, a_blacks) = a.color_counts();
    let (b_whites, b_blacks) = b.color_counts();

    // Balance clauses cancel when both fire (equally White-heavy pairs).
    let a_due_white = a_whites >= a_blacks && b_whites > b_blacks;
    let b_due_white = b_whites >= b_blacks && a_whites > a_blacks;
    if a_due_white && !b_due_white {
        return (a.id.clone(), b.id.clone());
    }
    if b_due_white && !a_due_white {
        return (b.id.clone(), a.id.clone());
    }

    // Higher-rated player plays Black; skipped while both histories are
    // empty so that round-one pairs fall through to the default.
    if !a.colors.is_empty() || !b.colors.is_empty() {
        if a.rating > b.rating {
            return (b.id.clone(), a.id.clone());
        }
        if b.rating > a.rating {
            return (a.id.clone(), b.id.clone());
        }
    }

    (a.id.clone(), b.id.clone())
}
