//! Tennis scorekeeper CLI
//!
//! Creates matches in the file store and applies scoring events to them.

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tennis_core::engine::replay;
use tennis_core::models::FinalSetTieBreakPoints;
use tennis_core::{
    parse_config, FileStore, Match, MatchConfig, MatchEvent, MatchFormat, MatchService, Player,
    ScoringSystem, ServiceSettings, SetDuration, TieBreakRules,
};

#[derive(Parser)]
#[command(name = "tennis")]
#[command(about = "Score tennis matches point by point", long_about = None)]
struct Cli {
    /// Match storage directory (overrides the settings file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new match
    New {
        #[arg(long)]
        player1: String,

        #[arg(long)]
        player2: String,

        /// single, best-of-3 or best-of-5
        #[arg(long, default_value = "best-of-3", value_parser = parse_wire::<MatchFormat>)]
        format: MatchFormat,

        /// Games per set: 4, 6 or 8
        #[arg(long, default_value = "6", value_parser = parse_set_duration)]
        games: SetDuration,

        /// ad or no-ad
        #[arg(long, default_value = "ad", value_parser = parse_wire::<ScoringSystem>)]
        scoring: ScoringSystem,

        /// none, 7-point or 10-point
        #[arg(long, default_value = "7-point", value_parser = parse_wire::<TieBreakRules>)]
        tiebreak: TieBreakRules,

        /// Play the deciding set as a single tiebreak to 7 or 10 points
        #[arg(long, value_parser = parse_final_set_points)]
        final_set_tiebreak: Option<FinalSetTieBreakPoints>,
    },

    /// Award a point
    Point {
        id: String,
        player: Player,
        #[arg(long)]
        token: String,
    },

    /// Take back a point in the current game
    Undo {
        id: String,
        player: Player,
        #[arg(long)]
        token: String,
    },

    /// Set who is serving
    Server {
        id: String,
        player: Player,
        #[arg(long)]
        token: String,
    },

    /// Add or remove games in the current set
    Adjust {
        id: String,
        player: Player,
        #[arg(allow_negative_numbers = true)]
        delta: i32,
        #[arg(long)]
        token: String,
    },

    Pause {
        id: String,
        #[arg(long)]
        token: String,
    },

    Resume {
        id: String,
        #[arg(long)]
        token: String,
    },

    /// Print the scoreboard
    Show {
        id: String,

        /// Also print the last N history entries
        #[arg(long, default_value = "0")]
        history: usize,

        /// Print the raw JSON view instead
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List stored matches
    List,

    /// Delete a match
    Delete {
        id: String,
        #[arg(long)]
        token: String,
    },

    /// Score a match offline from a config file and a point sequence
    Replay {
        /// MatchConfig JSON file
        #[arg(long)]
        config: PathBuf,

        /// Point winners in order, e.g. "1122" or "p1,p2,p2"
        #[arg(long)]
        points: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir;
    let open = || open_service(data_dir.clone());

    match cli.command {
        Commands::Replay { config, points } => run_replay(&config, &points)?,

        Commands::New { player1, player2, format, games, scoring, tiebreak, final_set_tiebreak } => {
            let config = MatchConfig {
                scoring_system: scoring,
                match_format: format,
                set_duration: games,
                tie_break_rules: tiebreak,
                player1_name: player1,
                player2_name: player2,
                final_set_tie_break: final_set_tiebreak.map(|_| true),
                final_set_tie_break_points: final_set_tiebreak,
            };
            let record = open()?.create_match(config)?;
            info!(id = %record.id, "match created");

            println!("Match created");
            println!("   Id:        {}", record.id);
            println!("   Token:     {}", record.admin_token);
            println!("   Share URL: {}", record.share_url);
            println!("   Format:    {}", record.state.config.summary());
        }

        Commands::Point { id, player, token } => {
            apply(&open()?, &id, &token, MatchEvent::PointWon { player })?;
        }
        Commands::Undo { id, player, token } => {
            apply(&open()?, &id, &token, MatchEvent::PointRemoved { player })?;
        }
        Commands::Server { id, player, token } => {
            apply(&open()?, &id, &token, MatchEvent::ServerSet { player })?;
        }
        Commands::Adjust { id, player, delta, token } => {
            apply(&open()?, &id, &token, MatchEvent::GamesAdjusted { player, delta })?;
        }
        Commands::Pause { id, token } => apply(&open()?, &id, &token, MatchEvent::Paused)?,
        Commands::Resume { id, token } => apply(&open()?, &id, &token, MatchEvent::Resumed)?,

        Commands::Show { id, history, json } => {
            let view = open()?.get_match(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::scoreboard(&view.state));
                if history > 0 {
                    println!("\n{}", render::history(&view.state, history));
                }
            }
        }

        Commands::List => {
            let views = open()?.list_matches()?;
            if views.is_empty() {
                println!("No matches");
            }
            for view in views {
                let state = &view.state;
                let score = state
                    .final_scoreline
                    .clone()
                    .unwrap_or_else(|| tennis_core::engine::live_scoreline(state));
                println!(
                    "{}  {} vs {}  [{:?}]  {}",
                    view.id, state.config.player1_name, state.config.player2_name, state.status, score
                );
            }
        }

        Commands::Delete { id, token } => {
            open()?.delete_match(&id, &token)?;
            info!(id = %id, "match deleted");
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

/// File-backed service; `data_dir` overrides the settings file
fn open_service(data_dir: Option<PathBuf>) -> Result<MatchService<FileStore>> {
    let mut settings = ServiceSettings::from_env()?;
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }
    debug!(data_dir = %settings.data_dir.display(), "opening file store");
    let store = FileStore::open(&settings.data_dir)
        .with_context(|| format!("opening match store at {}", settings.data_dir.display()))?;
    Ok(MatchService::new(store, settings))
}

fn apply(service: &MatchService<FileStore>, id: &str, token: &str, event: MatchEvent) -> Result<()> {
    let view = service.apply(id, token, &event)?;
    info!(id, version = view.version, ?event, "event applied");
    print!("{}", render::scoreboard(&view.state));
    Ok(())
}

fn run_replay(config_path: &Path, points: &str) -> Result<()> {
    let json = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let config = parse_config(&json)?;
    let events: Vec<MatchEvent> =
        parse_points(points)?.into_iter().map(|player| MatchEvent::PointWon { player }).collect();

    debug!(points = events.len(), "replaying");
    let state = replay(&Match::new(config), &events);
    print!("{}", render::scoreboard(&state));
    Ok(())
}

/// Accepts compact digits ("1212") or separated names ("p1,p2 player1")
fn parse_points(points: &str) -> Result<Vec<Player>> {
    let separated = points.contains(|c: char| c == ',' || c.is_whitespace());
    let tokens: Vec<String> = if separated {
        points.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()).map(str::to_string).collect()
    } else {
        points.chars().map(|c| c.to_string()).collect()
    };

    if tokens.is_empty() {
        bail!("no points given");
    }
    tokens
        .iter()
        .map(|token| token.parse::<Player>().map_err(anyhow::Error::msg))
        .collect()
}

/// Parse an enum from its JSON wire name (e.g. "best-of-3")
fn parse_wire<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|e| e.to_string())
}

fn parse_set_duration(value: &str) -> Result<SetDuration, String> {
    let games: u8 = value.parse().map_err(|_| format!("not a number: {value}"))?;
    SetDuration::try_from(games)
}

fn parse_final_set_points(value: &str) -> Result<FinalSetTieBreakPoints, String> {
    let points: u8 = value.parse().map_err(|_| format!("not a number: {value}"))?;
    FinalSetTieBreakPoints::try_from(points)
}
