use serde::{Deserialize, Serialize};

use super::config::MatchConfig;
use super::history::HistoryEntry;
use super::score::{GameScore, Player, SetScore, TieBreakScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "paused")]
    Paused,
}

/// Full live state of one match.
///
/// Only the controller functions in `engine` mutate it; everything else reads
/// it or passes it through storage untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub config: MatchConfig,
    pub status: MatchStatus,
    /// 1-based index into `sets`
    pub current_set: usize,
    /// 1-based, restarts every set
    pub game_number: u32,
    pub sets: Vec<SetScore>,
    pub current_game_score: GameScore,
    pub is_tie_break: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_break_score: Option<TieBreakScore>,
    #[serde(default)]
    pub game_history: Vec<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_winner: Option<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_scoreline: Option<String>,
}

impl Match {
    /// Fresh match: one empty set, 0-0, player1 serving.
    ///
    /// The configuration is assumed to be validated already.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            status: MatchStatus::InProgress,
            current_set: 1,
            game_number: 1,
            sets: vec![SetScore::default()],
            current_game_score: GameScore::new(Player::Player1),
            is_tie_break: false,
            tie_break_score: None,
            game_history: Vec::new(),
            match_winner: None,
            final_scoreline: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn current_set_score(&self) -> Option<&SetScore> {
        self.current_set.checked_sub(1).and_then(|idx| self.sets.get(idx))
    }

    pub(crate) fn current_set_score_mut(&mut self) -> Option<&mut SetScore> {
        self.current_set.checked_sub(1).and_then(move |idx| self.sets.get_mut(idx))
    }

    /// Completed sets won by `player`
    pub fn sets_won(&self, player: Player) -> usize {
        self.sets.iter().filter(|set| set.is_complete && set.winner == Some(player)).count()
    }

    /// Whether the current set is the deciding set played as a lone tiebreak
    pub fn is_final_set_tie_break(&self) -> bool {
        self.config.has_final_set_tie_break() && self.current_set == self.config.match_format.max_sets()
    }

    /// Name of a player as configured
    pub fn player_name(&self, player: Player) -> &str {
        match player {
            Player::Player1 => &self.config.player1_name,
            Player::Player2 => &self.config.player2_name,
        }
    }

    /// Whoever serves the next point
    pub fn current_server(&self) -> Player {
        match (&self.tie_break_score, self.is_tie_break) {
            (Some(tb), true) => tb.server,
            _ => self.current_game_score.server,
        }
    }
}
