use serde::{Deserialize, Serialize};

use super::controller;
use crate::models::{Match, Player};

/// Everything a scorekeeper can do to a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MatchEvent {
    PointWon { player: Player },
    PointRemoved { player: Player },
    ServerSet { player: Player },
    GamesAdjusted { player: Player, delta: i32 },
    Paused,
    Resumed,
}

impl MatchEvent {
    /// Whether the event changes the score (as opposed to administrative state)
    pub fn is_scoring(&self) -> bool {
        matches!(
            self,
            MatchEvent::PointWon { .. } | MatchEvent::PointRemoved { .. } | MatchEvent::GamesAdjusted { .. }
        )
    }
}

/// Single entry point for every caller: `reduce(state, event) -> state`
pub fn reduce(state: &Match, event: &MatchEvent) -> Match {
    match *event {
        MatchEvent::PointWon { player } => controller::score_point(state, player),
        MatchEvent::PointRemoved { player } => controller::remove_point(state, player),
        MatchEvent::ServerSet { player } => controller::set_server(state, player),
        MatchEvent::GamesAdjusted { player, delta } => controller::adjust_games(state, player, delta),
        MatchEvent::Paused => controller::pause(state),
        MatchEvent::Resumed => controller::resume(state),
    }
}

/// Fold a sequence of events over a starting state
pub fn replay<'a>(state: &Match, events: impl IntoIterator<Item = &'a MatchEvent>) -> Match {
    events.into_iter().fold(state.clone(), |acc, event| reduce(&acc, event))
}
