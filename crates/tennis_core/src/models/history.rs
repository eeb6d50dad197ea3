//! Append-only match history
//!
//! Each entry is a fact about the match that never changes once written.
//! Serialized internally tagged (`"type": "game" | "tiebreak" | "setWin" |
//! "matchComplete"`) so viewers can render the log without guessing shapes.

use serde::{Deserialize, Serialize};

use super::score::Player;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HistoryEntry {
    Game(GameResult),
    #[serde(rename = "tiebreak")]
    TieBreak(TieBreakResult),
    SetWin(SetWin),
    MatchComplete(MatchComplete),
}

/// A normal game that has just been decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    /// 1-based set index
    pub set: usize,
    /// 1-based game number within the set
    pub game_number: u32,
    pub server: Player,
    pub winner: Player,
    /// Running game tally after this game
    pub player1_games: u32,
    pub player2_games: u32,
}

impl GameResult {
    /// Whether the receiver took the game
    pub fn is_break(&self) -> bool {
        self.winner != self.server
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieBreakResult {
    pub set: usize,
    pub player1_points: u32,
    pub player2_points: u32,
    pub winner: Player,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWin {
    pub set: usize,
    pub winner: Player,
    pub player1_games: u32,
    pub player2_games: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchComplete {
    pub winner: Player,
    pub final_scoreline: String,
}

impl HistoryEntry {
    /// Set the entry belongs to; match completion is not tied to one set
    pub fn set(&self) -> Option<usize> {
        match self {
            HistoryEntry::Game(game) => Some(game.set),
            HistoryEntry::TieBreak(tb) => Some(tb.set),
            HistoryEntry::SetWin(win) => Some(win.set),
            HistoryEntry::MatchComplete(_) => None,
        }
    }

    /// Human-readable line for history panels
    pub fn describe(&self, player1_name: &str, player2_name: &str) -> String {
        let name = |player: Player| match player {
            Player::Player1 => player1_name,
            Player::Player2 => player2_name,
        };

        match self {
            HistoryEntry::Game(game) => format!(
                "Set {} Game {}: {} won ({} served) {}-{}{}",
                game.set,
                game.game_number,
                name(game.winner),
                name(game.server),
                game.player1_games,
                game.player2_games,
                if game.is_break() { " [break]" } else { "" }
            ),
            HistoryEntry::TieBreak(tb) => format!(
                "Set {} Tiebreak: {} won {}-{}",
                tb.set,
                name(tb.winner),
                tb.player1_points.max(tb.player2_points),
                tb.player1_points.min(tb.player2_points)
            ),
            HistoryEntry::SetWin(win) => format!(
                "Set {}: {} won {}-{}",
                win.set,
                name(win.winner),
                win.player1_games.max(win.player2_games),
                win.player1_games.min(win.player2_games)
            ),
            HistoryEntry::MatchComplete(done) => {
                format!("Match: {} won {}", name(done.winner), done.final_scoreline)
            }
        }
    }
}
