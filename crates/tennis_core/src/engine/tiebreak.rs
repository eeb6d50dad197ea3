//! Tiebreak point counting and serve rotation

use crate::models::{MatchConfig, Player, TieBreakScore};

/// Points needed to win the tiebreak being played
pub fn required_points(config: &MatchConfig, is_final_set_tie_break: bool, final_set_points: u32) -> u32 {
    if is_final_set_tie_break {
        final_set_points
    } else {
        config.tie_break_rules.required_points()
    }
}

/// Award one tiebreak point to `scorer`.
///
/// The returned `server` is who serves the *next* point. Serve follows the
/// 1-2-2-2 pattern: the opening server takes point 1 alone, then each player
/// serves two in a row. A completed tiebreak is returned unchanged.
pub fn add_point_to_tie_break(
    score: &TieBreakScore,
    scorer: Player,
    config: &MatchConfig,
    is_final_set_tie_break: bool,
    final_set_points: u32,
) -> TieBreakScore {
    let mut next = *score;
    if score.is_complete {
        return next;
    }

    let required = required_points(config, is_final_set_tie_break, final_set_points);
    let played_before = score.total_points();

    match scorer {
        Player::Player1 => next.player1_points = next.player1_points.saturating_add(1),
        Player::Player2 => next.player2_points = next.player2_points.saturating_add(1),
    }

    let mine = next.points(scorer);
    let theirs = next.points(scorer.opponent());
    if mine >= required && mine.saturating_sub(theirs) >= 2 {
        next.is_complete = true;
        next.winner = Some(scorer);
    }

    // Number of the point after this one; serve changes before every even point
    let next_point_number = played_before + 2;
    if next_point_number % 2 == 0 {
        next.server = score.server.opponent();
    }

    next
}
