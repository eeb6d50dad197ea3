//! Pressure-point detection for scoreboard banners

use serde::{Deserialize, Serialize};
use std::fmt;

use super::controller::score_point;
use crate::models::{HistoryEntry, Match, MatchStatus, Player};

/// A point that would decide something if `player` wins it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "player", rename_all = "camelCase")]
pub enum Situation {
    MatchPoint(Player),
    SetPoint(Player),
    BreakPoint(Player),
}

impl Situation {
    pub fn player(&self) -> Player {
        match *self {
            Situation::MatchPoint(p) | Situation::SetPoint(p) | Situation::BreakPoint(p) => p,
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            Situation::MatchPoint(_) => "MATCH POINT",
            Situation::SetPoint(_) => "SET POINT",
            Situation::BreakPoint(_) => "BREAK POINT",
        }
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.banner(), self.player())
    }
}

/// Situations in play on the next point, at most one per player.
///
/// Each player gets the most significant one: match point over set point
/// over break point. Paused or completed matches have none.
pub fn situations(state: &Match) -> Vec<Situation> {
    if state.status != MatchStatus::InProgress {
        return Vec::new();
    }

    [Player::Player1, Player::Player2]
        .into_iter()
        .filter_map(|player| situation_for(state, player))
        .collect()
}

fn situation_for(state: &Match, player: Player) -> Option<Situation> {
    let after = score_point(state, player);
    if after == *state {
        return None;
    }

    if after.is_completed() {
        return Some(Situation::MatchPoint(player));
    }
    if after.sets_won(player) > state.sets_won(player) {
        return Some(Situation::SetPoint(player));
    }

    let receiving = !state.is_tie_break && state.current_game_score.server != player;
    let won_game = after.game_history.len() > state.game_history.len()
        && matches!(after.game_history.last(), Some(HistoryEntry::Game(game)) if game.winner == player);
    (receiving && won_game).then_some(Situation::BreakPoint(player))
}
