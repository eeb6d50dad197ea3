use serde::{Deserialize, Serialize};
use std::fmt;

/// One side of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[serde(rename = "player1")]
    Player1,
    #[serde(rename = "player2")]
    Player2,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Player::Player1 => "player1",
            Player::Player2 => "player2",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "player1" | "p1" | "1" => Ok(Player::Player1),
            "player2" | "p2" | "2" => Ok(Player::Player2),
            other => Err(format!("unknown player '{other}', expected player1 or player2")),
        }
    }
}

/// Point value within a normal game.
///
/// Always serialized as a string so "40" is never confused with a raw count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TennisPoint {
    #[serde(rename = "0")]
    Love,
    #[serde(rename = "15")]
    Fifteen,
    #[serde(rename = "30")]
    Thirty,
    #[serde(rename = "40")]
    Forty,
    #[serde(rename = "advantage")]
    Advantage,
    #[serde(rename = "game")]
    Game,
}

impl TennisPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            TennisPoint::Love => "0",
            TennisPoint::Fifteen => "15",
            TennisPoint::Thirty => "30",
            TennisPoint::Forty => "40",
            TennisPoint::Advantage => "advantage",
            TennisPoint::Game => "game",
        }
    }
}

impl fmt::Display for TennisPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameScore {
    pub player1_points: TennisPoint,
    pub player2_points: TennisPoint,
    pub server: Player,
}

impl GameScore {
    pub fn new(server: Player) -> Self {
        Self { player1_points: TennisPoint::Love, player2_points: TennisPoint::Love, server }
    }

    pub fn points(&self, player: Player) -> TennisPoint {
        match player {
            Player::Player1 => self.player1_points,
            Player::Player2 => self.player2_points,
        }
    }

    pub fn set_points(&mut self, player: Player, point: TennisPoint) {
        match player {
            Player::Player1 => self.player1_points = point,
            Player::Player2 => self.player2_points = point,
        }
    }

    /// The side that has reached `game`, if any
    pub fn winner(&self) -> Option<Player> {
        if self.player1_points == TennisPoint::Game {
            Some(Player::Player1)
        } else if self.player2_points == TennisPoint::Game {
            Some(Player::Player2)
        } else {
            None
        }
    }

    pub fn is_deuce(&self) -> bool {
        self.player1_points == TennisPoint::Forty && self.player2_points == TennisPoint::Forty
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieBreakScore {
    pub player1_points: u32,
    pub player2_points: u32,
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
    /// Who serves the next point
    pub server: Player,
}

impl TieBreakScore {
    pub fn new(server: Player) -> Self {
        Self { player1_points: 0, player2_points: 0, is_complete: false, winner: None, server }
    }

    pub fn points(&self, player: Player) -> u32 {
        match player {
            Player::Player1 => self.player1_points,
            Player::Player2 => self.player2_points,
        }
    }

    pub fn total_points(&self) -> u32 {
        self.player1_points + self.player2_points
    }

    pub fn tally(&self) -> TieBreakTally {
        TieBreakTally { player1_points: self.player1_points, player2_points: self.player2_points }
    }
}

/// Final point count of a finished tiebreak, kept on the set for scorelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieBreakTally {
    pub player1_points: u32,
    pub player2_points: u32,
}

impl TieBreakTally {
    pub fn points(&self, player: Player) -> u32 {
        match player {
            Player::Player1 => self.player1_points,
            Player::Player2 => self.player2_points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScore {
    pub player1_games: u32,
    pub player2_games: u32,
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_break_score: Option<TieBreakTally>,
}

impl SetScore {
    pub fn games(&self, player: Player) -> u32 {
        match player {
            Player::Player1 => self.player1_games,
            Player::Player2 => self.player2_games,
        }
    }

    pub(crate) fn games_mut(&mut self, player: Player) -> &mut u32 {
        match player {
            Player::Player1 => &mut self.player1_games,
            Player::Player2 => &mut self.player2_games,
        }
    }

    pub fn has_started(&self) -> bool {
        self.player1_games > 0 || self.player2_games > 0
    }

    /// "winner-loser" games, plus "(w-l)" tiebreak points when one decided the set.
    ///
    /// Sets without a winner are shown from player1's side.
    pub fn scoreline(&self) -> String {
        let first = self.winner.unwrap_or(Player::Player1);
        let second = first.opponent();
        let mut line = format!("{}-{}", self.games(first), self.games(second));
        if let Some(tally) = self.tie_break_score {
            line.push_str(&format!("({}-{})", tally.points(first), tally.points(second)));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn test_point_wire_values() {
        let game = GameScore {
            player1_points: TennisPoint::Forty,
            player2_points: TennisPoint::Advantage,
            server: Player::Player1,
        };

        assert_json_snapshot!(game, @r###"
        {
          "player1Points": "40",
          "player2Points": "advantage",
          "server": "player1"
        }
        "###);

        let love: TennisPoint = serde_json::from_str("\"0\"").unwrap();
        assert_eq!(love, TennisPoint::Love);
        assert!(serde_json::from_str::<TennisPoint>("40").is_err());
    }

    #[test]
    fn test_player_parsing() {
        assert_eq!("player1".parse::<Player>(), Ok(Player::Player1));
        assert_eq!("P2".parse::<Player>(), Ok(Player::Player2));
        assert!("player3".parse::<Player>().is_err());
        assert_eq!(Player::Player1.opponent(), Player::Player2);
    }

    #[test]
    fn test_set_scoreline_uses_winner_perspective() {
        let set = SetScore {
            player1_games: 6,
            player2_games: 7,
            is_complete: true,
            winner: Some(Player::Player2),
            tie_break_score: Some(TieBreakTally { player1_points: 5, player2_points: 7 }),
        };
        assert_eq!(set.scoreline(), "7-6(7-5)");

        let open = SetScore { player1_games: 2, player2_games: 4, ..Default::default() };
        assert_eq!(open.scoreline(), "2-4");
    }

    #[test]
    fn test_game_winner() {
        let mut game = GameScore::new(Player::Player2);
        assert_eq!(game.winner(), None);
        game.set_points(Player::Player2, TennisPoint::Game);
        assert_eq!(game.winner(), Some(Player::Player2));
    }
}
