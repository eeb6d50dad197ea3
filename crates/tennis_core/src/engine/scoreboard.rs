//! Display strings for scoreboards and summaries

use super::controller::format_scoreline;
use crate::models::{Match, MatchFormat, Player, TennisPoint};

/// Scoreboard label for one side of a normal game.
///
/// A side at love shows blank while the other side holds advantage.
pub fn point_label(point: TennisPoint, opponent_point: TennisPoint) -> &'static str {
    match point {
        TennisPoint::Love if opponent_point == TennisPoint::Advantage => "",
        TennisPoint::Love => "0",
        TennisPoint::Fifteen => "15",
        TennisPoint::Thirty => "30",
        TennisPoint::Forty => "40",
        TennisPoint::Advantage => "Ad",
        TennisPoint::Game => "Game!",
    }
}

/// Label for `player` in the game or tiebreak currently in play
pub fn current_score_label(state: &Match, player: Player) -> String {
    match (state.is_tie_break, state.tie_break_score) {
        (true, Some(tb)) => tb.points(player).to_string(),
        _ => {
            let game = &state.current_game_score;
            point_label(game.points(player), game.points(player.opponent())).to_string()
        }
    }
}

/// Number of set columns a scoreboard shows for the format
pub fn set_column_count(format: MatchFormat) -> usize {
    format.max_sets()
}

/// Completed sets winner-first, followed by the open set's games from
/// player1's side
pub fn live_scoreline(state: &Match) -> String {
    let mut parts = Vec::new();
    let completed = format_scoreline(&state.sets);
    if !completed.is_empty() {
        parts.push(completed);
    }

    if let Some(set) = state.current_set_score().filter(|set| !set.is_complete) {
        parts.push(format!("{}-{}", set.player1_games, set.player2_games));
    }

    parts.join(", ")
}
