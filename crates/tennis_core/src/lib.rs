//! # tennis_core - Tennis Match Scoring Engine
//!
//! Pure state machine for scoring a tennis match point by point, with a
//! storage-agnostic service and JSON API on top.
//!
//! ## Features
//! - Ad / no-ad games, 4/6/8-game sets, 7- or 10-point tiebreaks
//! - Single set, best of 3 and best of 5, optional final-set tiebreak
//! - Every transition is `(state, event) -> state`; no I/O in the engine
//! - Injectable storage with optimistic concurrency (in-memory or files)
//! - JSON API for easy integration

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod store;

// Re-export main API functions
pub use api::{
    apply_event_json, create_match_json, get_match_json, list_matches_json, replay_json,
    ApiError, ApiResponse, MatchService, ServiceError, ServiceSettings,
};
pub use error::{MatchError, Result};

// Re-export the state machine
pub use engine::{
    adjust_games, create_match, format_scoreline, pause, reduce, remove_point, resume,
    score_point, set_server, situations, MatchEvent, Situation,
};
pub use models::{
    ConfigError, GameScore, HistoryEntry, Match, MatchConfig, MatchFormat, MatchStatus, Player,
    ScoringSystem, SetDuration, SetScore, TennisPoint, TieBreakRules, TieBreakScore,
};

// Re-export storage
pub use store::{FileStore, InMemoryStore, MatchRecord, MatchStore, MatchView, StoreError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

/// Parse a `MatchConfig` from JSON and validate it
pub fn parse_config(json: &str) -> Result<MatchConfig> {
    let config: MatchConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}
