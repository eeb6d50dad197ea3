pub mod config;
pub mod history;
pub mod match_state;
pub mod score;

pub use config::{
    ConfigError, FinalSetTieBreakPoints, MatchConfig, MatchFormat, ScoringSystem, SetDuration,
    TieBreakRules,
};
pub use history::{GameResult, HistoryEntry, MatchComplete, SetWin, TieBreakResult};
pub use match_state::{Match, MatchStatus};
pub use score::{GameScore, Player, SetScore, TennisPoint, TieBreakScore, TieBreakTally};
