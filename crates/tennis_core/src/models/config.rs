//! Match configuration
//!
//! `MatchConfig` is fixed for the lifetime of a match. The closed sets of
//! allowed values (scoring system, format, set length, tiebreak rules) are
//! enforced by the types themselves at deserialization time; the remaining
//! checks (player names) run in [`MatchConfig::validate`] before a match is
//! created.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted length of a player name (characters)
pub const MAX_PLAYER_NAME_LEN: usize = 50;

/// Points needed to take a final-set tiebreak when none is configured
pub const DEFAULT_FINAL_SET_TIEBREAK_POINTS: FinalSetTieBreakPoints = FinalSetTieBreakPoints::Ten;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringSystem {
    #[serde(rename = "ad")]
    Ad,
    #[serde(rename = "no-ad")]
    NoAd,
}

impl ScoringSystem {
    pub fn label(&self) -> &'static str {
        match self {
            ScoringSystem::Ad => "Ad",
            ScoringSystem::NoAd => "No-Ad",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchFormat {
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "best-of-3")]
    BestOf3,
    #[serde(rename = "best-of-5")]
    BestOf5,
}

impl MatchFormat {
    /// Maximum number of sets that can be played
    pub fn max_sets(&self) -> usize {
        match self {
            MatchFormat::Single => 1,
            MatchFormat::BestOf3 => 3,
            MatchFormat::BestOf5 => 5,
        }
    }

    /// Completed sets a player needs to take the match
    pub fn sets_to_win(&self) -> usize {
        match self {
            MatchFormat::Single => 1,
            MatchFormat::BestOf3 => 2,
            MatchFormat::BestOf5 => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchFormat::Single => "Single Set",
            MatchFormat::BestOf3 => "Best of 3",
            MatchFormat::BestOf5 => "Best of 5",
        }
    }
}

/// Games needed to win a set that does not go to a tiebreak.
///
/// Serialized as a bare number (4, 6 or 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SetDuration {
    Four,
    Six,
    Eight,
}

impl SetDuration {
    pub fn games(&self) -> u32 {
        match self {
            SetDuration::Four => 4,
            SetDuration::Six => 6,
            SetDuration::Eight => 8,
        }
    }
}

impl TryFrom<u8> for SetDuration {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(SetDuration::Four),
            6 => Ok(SetDuration::Six),
            8 => Ok(SetDuration::Eight),
            other => Err(format!("set duration must be 4, 6 or 8, got {other}")),
        }
    }
}

impl From<SetDuration> for u8 {
    fn from(value: SetDuration) -> Self {
        value.games() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TieBreakRules {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "7-point")]
    SevenPoint,
    #[serde(rename = "10-point")]
    TenPoint,
}

impl TieBreakRules {
    /// Points needed to take a regular (non final-set) tiebreak
    pub fn required_points(&self) -> u32 {
        match self {
            TieBreakRules::TenPoint => 10,
            TieBreakRules::None | TieBreakRules::SevenPoint => 7,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TieBreakRules::None => "None",
            TieBreakRules::SevenPoint => "7-Point",
            TieBreakRules::TenPoint => "10-Point",
        }
    }
}

/// Length of a tiebreak that replaces the deciding set (7 or 10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FinalSetTieBreakPoints {
    Seven,
    Ten,
}

impl FinalSetTieBreakPoints {
    pub fn points(&self) -> u32 {
        match self {
            FinalSetTieBreakPoints::Seven => 7,
            FinalSetTieBreakPoints::Ten => 10,
        }
    }
}

impl TryFrom<u8> for FinalSetTieBreakPoints {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            7 => Ok(FinalSetTieBreakPoints::Seven),
            10 => Ok(FinalSetTieBreakPoints::Ten),
            other => Err(format!("final set tiebreak points must be 7 or 10, got {other}")),
        }
    }
}

impl From<FinalSetTieBreakPoints> for u8 {
    fn from(value: FinalSetTieBreakPoints) -> Self {
        value.points() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    pub scoring_system: ScoringSystem,
    pub match_format: MatchFormat,
    pub set_duration: SetDuration,
    pub tie_break_rules: TieBreakRules,
    pub player1_name: String,
    pub player2_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_set_tie_break: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_set_tie_break_points: Option<FinalSetTieBreakPoints>,
}

impl MatchConfig {
    /// Standard best-of-3, six-game sets, ad scoring, 7-point tiebreaks
    pub fn new(player1_name: impl Into<String>, player2_name: impl Into<String>) -> Self {
        Self {
            scoring_system: ScoringSystem::Ad,
            match_format: MatchFormat::BestOf3,
            set_duration: SetDuration::Six,
            tie_break_rules: TieBreakRules::SevenPoint,
            player1_name: player1_name.into(),
            player2_name: player2_name.into(),
            final_set_tie_break: None,
            final_set_tie_break_points: None,
        }
    }

    /// Whether the deciding set is replaced by a single tiebreak.
    ///
    /// Only meaningful for multi-set formats; a single-set match always
    /// plays a full set.
    pub fn has_final_set_tie_break(&self) -> bool {
        self.final_set_tie_break.unwrap_or(false) && self.match_format != MatchFormat::Single
    }

    pub fn final_set_points(&self) -> u32 {
        self.final_set_tie_break_points.unwrap_or(DEFAULT_FINAL_SET_TIEBREAK_POINTS).points()
    }

    /// Check the parts of the configuration the types cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_name(&self.player1_name)?;
        Self::validate_name(&self.player2_name)
    }

    fn validate_name(name: &str) -> Result<(), ConfigError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyPlayerName);
        }

        let len = trimmed.chars().count();
        if len > MAX_PLAYER_NAME_LEN {
            return Err(ConfigError::PlayerNameTooLong { len, max: MAX_PLAYER_NAME_LEN });
        }

        Ok(())
    }

    /// One-line description for scoreboards, e.g. "Best of 3 · 6 games · Ad · 7-Point"
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} · {} games · {} · {}",
            self.match_format.label(),
            self.set_duration.games(),
            self.scoring_system.label(),
            self.tie_break_rules.label()
        );
        if self.has_final_set_tie_break() {
            summary.push_str(&format!(" · Final Set: {}-Point Tiebreak Only", self.final_set_points()));
        }
        summary
    }
}

/// Configuration rejected at match creation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyPlayerName,
    PlayerNameTooLong { len: usize, max: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPlayerName => write!(f, "Player name cannot be empty"),
            ConfigError::PlayerNameTooLong { len, max } => {
                write!(f, "Player name is {} characters, maximum is {}", len, max)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
