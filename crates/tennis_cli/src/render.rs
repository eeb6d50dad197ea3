//! Plain-text scoreboard

use std::fmt::Write;

use tennis_core::engine::{current_score_label, set_column_count, situations};
use tennis_core::{Match, MatchStatus, Player};

/// Multi-line scoreboard: header, one row per player, then any banners
pub fn scoreboard(state: &Match) -> String {
    let mut out = String::new();
    let columns = set_column_count(state.config.match_format);
    let name_width = [Player::Player1, Player::Player2]
        .iter()
        .map(|p| state.player_name(*p).chars().count())
        .max()
        .unwrap_or(0)
        .max(6);

    let _ = writeln!(
        out,
        "{} vs {}  ({})",
        state.player_name(Player::Player1),
        state.player_name(Player::Player2),
        state.config.summary()
    );
    let _ = writeln!(out, "Status: {}", status_label(state.status));

    let mut header = format!("  {:<width$}", "", width = name_width);
    for set in 1..=columns {
        let _ = write!(header, " {:>5}", format!("S{set}"));
    }
    let _ = write!(header, " {:>6}", if state.is_tie_break { "TB" } else { "Game" });
    let _ = writeln!(out, "{}", header.trim_end());

    for player in [Player::Player1, Player::Player2] {
        let marker = if !state.is_completed() && state.current_server() == player { "*" } else { " " };
        let mut row = format!("{} {:<width$}", marker, state.player_name(player), width = name_width);

        for idx in 0..columns {
            let cell = match state.sets.get(idx) {
                Some(set) if set.is_complete || idx + 1 == state.current_set => match set.tie_break_score {
                    Some(tally) if set.winner != Some(player) => {
                        format!("{}({})", set.games(player), tally.points(player))
                    }
                    _ => set.games(player).to_string(),
                },
                _ => "-".to_string(),
            };
            let _ = write!(row, " {:>5}", cell);
        }

        let current = if state.is_completed() { String::new() } else { current_score_label(state, player) };
        let _ = write!(row, " {:>6}", current);
        let _ = writeln!(out, "{}", row.trim_end());
    }

    if let (Some(winner), Some(line)) = (state.match_winner, &state.final_scoreline) {
        let _ = writeln!(out, "Winner: {} ({})", state.player_name(winner), line);
    }
    for situation in situations(state) {
        let _ = writeln!(out, "{} - {}", situation.banner(), state.player_name(situation.player()));
    }

    out
}

/// Last `count` history entries, oldest first
pub fn history(state: &Match, count: usize) -> String {
    let (p1, p2) = (state.player_name(Player::Player1), state.player_name(Player::Player2));
    let skip = state.game_history.len().saturating_sub(count);
    state
        .game_history
        .iter()
        .skip(skip)
        .map(|entry| entry.describe(p1, p2))
        .collect::<Vec<_>>()
        .join("\n")
}

fn status_label(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::InProgress => "in progress",
        MatchStatus::Completed => "completed",
        MatchStatus::Paused => "paused",
    }
}
