pub mod controller;
pub mod game; // Point progression within a normal game
pub mod reducer;
pub mod scoreboard;
pub mod set;
pub mod situation; // Match/set/break point detection
pub mod tiebreak;

pub use controller::{
    adjust_games, create_match, format_scoreline, pause, remove_point, resume, score_point,
    set_server,
};
pub use game::{add_point_to_game, remove_point_from_game};
pub use reducer::{reduce, replay, MatchEvent};
pub use scoreboard::{current_score_label, live_scoreline, point_label, set_column_count};
pub use set::{is_set_won, is_tie_break_needed};
pub use situation::{situations, Situation};
pub use tiebreak::{add_point_to_tie_break, required_points};
