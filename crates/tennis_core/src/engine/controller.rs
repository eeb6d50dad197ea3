//! Match controller
//!
//! Sequences the scoring engine over the whole `Match` aggregate: a point can
//! cascade into a game win, a set win or tiebreak, and finally the match win.
//! All public functions take the current state by reference and return the
//! next state; nothing here touches I/O.
//!
//! Events that arrive out of sequence (match completed, current set already
//! complete, match paused) leave the state untouched.

use tracing::debug;

use super::game::{add_point_to_game, remove_point_from_game};
use super::set::{is_set_won, is_tie_break_needed};
use super::tiebreak::add_point_to_tie_break;
use crate::models::{
    GameResult, GameScore, HistoryEntry, Match, MatchComplete, MatchConfig, MatchStatus, Player,
    SetScore, TieBreakResult, TieBreakScore,
};

/// Start a new match from a validated configuration
pub fn create_match(config: MatchConfig) -> Match {
    Match::new(config)
}

/// Award a point to `player` and apply every transition it triggers
pub fn score_point(current: &Match, player: Player) -> Match {
    let mut next = current.clone();
    apply_point(&mut next, player);
    next
}

/// Correct an erroneous point in the current normal game.
///
/// Not available during a tiebreak; completed games are never reopened.
pub fn remove_point(current: &Match, player: Player) -> Match {
    let mut next = current.clone();
    if !accepts_scoring(&next) || next.is_tie_break {
        return next;
    }

    next.current_game_score = remove_point_from_game(&next.current_game_score, player, &next.config);
    next
}

/// Override who is serving without touching the score
pub fn set_server(current: &Match, player: Player) -> Match {
    let mut next = current.clone();
    if next.is_completed() {
        return next;
    }

    match (next.is_tie_break, next.tie_break_score.as_mut()) {
        (true, Some(tb)) => tb.server = player,
        _ => next.current_game_score.server = player,
    }
    next
}

/// Manually add or remove games for `player` in the current set.
///
/// Floors at zero and never completes a set on its own; the next game won
/// through normal scoring re-evaluates the set. A count is capped one game
/// above the set length or the opponent's count, whichever is higher.
pub fn adjust_games(current: &Match, player: Player, delta: i32) -> Match {
    let mut next = current.clone();
    if !accepts_scoring(&next) {
        return next;
    }

    let required = next.config.set_duration.games();
    if let Some(set) = next.current_set_score_mut() {
        let ceiling = required.max(set.games(player.opponent())).saturating_add(1);
        let games = set.games_mut(player);
        *games = games.saturating_add_signed(delta).min(ceiling);
    }
    next
}

pub fn pause(current: &Match) -> Match {
    let mut next = current.clone();
    if next.status == MatchStatus::InProgress {
        next.status = MatchStatus::Paused;
    }
    next
}

pub fn resume(current: &Match) -> Match {
    let mut next = current.clone();
    if next.status == MatchStatus::Paused {
        next.status = MatchStatus::InProgress;
    }
    next
}

/// Completed sets as "winner-loser" with tiebreak points in parentheses,
/// joined by ", "
pub fn format_scoreline(sets: &[SetScore]) -> String {
    sets.iter().filter(|set| set.is_complete).map(SetScore::scoreline).collect::<Vec<_>>().join(", ")
}

fn accepts_scoring(state: &Match) -> bool {
    state.status == MatchStatus::InProgress
        && state.current_set_score().map_or(false, |set| !set.is_complete)
}

pub(crate) fn apply_point(state: &mut Match, player: Player) {
    if state.status != MatchStatus::InProgress {
        return;
    }

    // Sets are grown lazily; a missing current set is an empty one
    while state.sets.len() < state.current_set {
        state.sets.push(SetScore::default());
    }
    if !accepts_scoring(state) {
        return;
    }

    if state.is_tie_break {
        apply_tie_break_point(state, player);
    } else {
        apply_game_point(state, player);
    }
}

fn apply_tie_break_point(state: &mut Match, player: Player) {
    let current = state.tie_break_score.unwrap_or_else(|| TieBreakScore::new(state.current_game_score.server));
    let is_final = state.is_final_set_tie_break();
    let final_points = state.config.final_set_points();

    let updated = add_point_to_tie_break(&current, player, &state.config, is_final, final_points);
    let Some(winner) = updated.winner.filter(|_| updated.is_complete) else {
        state.tie_break_score = Some(updated);
        return;
    };

    let set_number = state.current_set;
    state.game_history.push(HistoryEntry::TieBreak(TieBreakResult {
        set: set_number,
        player1_points: updated.player1_points,
        player2_points: updated.player2_points,
        winner,
    }));

    if let Some(set) = state.current_set_score_mut() {
        let games = set.games_mut(winner);
        *games = games.saturating_add(1);
        set.is_complete = true;
        set.winner = Some(winner);
        set.tie_break_score = Some(updated.tally());
    }
    debug!(
        set = set_number,
        winner = %winner,
        points = %format!("{}-{}", updated.player1_points, updated.player2_points),
        "tiebreak won"
    );

    state.is_tie_break = false;
    state.tie_break_score = None;

    if !check_match_completion(state) {
        // The player who served the last tiebreak point receives first next set
        advance_to_next_set(state, current.server.opponent());
    }
}

fn apply_game_point(state: &mut Match, player: Player) {
    let updated = add_point_to_game(&state.current_game_score, player, &state.config);
    let Some(winner) = updated.winner() else {
        state.current_game_score = updated;
        return;
    };

    let set_number = state.current_set;
    let game_number = state.game_number;
    let server = updated.server;

    let Some(set) = state.current_set_score_mut() else {
        return;
    };
    let games = set.games_mut(winner);
        *games = games.saturating_add(1);
    let (player1_games, player2_games) = (set.player1_games, set.player2_games);

    state.game_history.push(HistoryEntry::Game(GameResult {
        set: set_number,
        game_number,
        server,
        winner,
        player1_games,
        player2_games,
    }));
    debug!(set = set_number, game = game_number, winner = %winner, "game won {}-{}", player1_games, player2_games);

    state.game_number += 1;
    let next_server = server.opponent();
    state.current_game_score = GameScore::new(next_server);

    let set_snapshot = match state.current_set_score() {
        Some(set) => set.clone(),
        None => return,
    };

    if is_tie_break_needed(&set_snapshot, &state.config) {
        debug!(set = set_number, "entering tiebreak");
        state.is_tie_break = true;
        state.tie_break_score = Some(TieBreakScore::new(next_server));
        return;
    }

    if is_set_won(&set_snapshot, &state.config) {
        // Manual adjustments can leave the leader different from the game winner
        let set_winner = if set_snapshot.player1_games > set_snapshot.player2_games {
            Player::Player1
        } else {
            Player::Player2
        };
        if let Some(set) = state.current_set_score_mut() {
            set.is_complete = true;
            set.winner = Some(set_winner);
        }
        debug!(set = set_number, winner = %set_winner, "set won");

        if !check_match_completion(state) {
            advance_to_next_set(state, next_server);
        }
    }
}

/// Evaluate the match-complete condition and finalize the match if reached.
///
/// Returns whether the match is now complete.
fn check_match_completion(state: &mut Match) -> bool {
    let format = state.config.match_format;
    let player1_sets = state.sets_won(Player::Player1);
    let player2_sets = state.sets_won(Player::Player2);

    let needed = format.sets_to_win();
    if player1_sets < needed && player2_sets < needed {
        return false;
    }

    // Equal counts cannot happen with correct set counting; player1 takes ties
    let winner = if player1_sets >= player2_sets { Player::Player1 } else { Player::Player2 };
    let scoreline = format_scoreline(&state.sets);

    state.status = MatchStatus::Completed;
    state.match_winner = Some(winner);
    state.final_scoreline = Some(scoreline.clone());
    state.is_tie_break = false;
    state.tie_break_score = None;
    state.game_history.push(HistoryEntry::MatchComplete(MatchComplete {
        winner,
        final_scoreline: scoreline.clone(),
    }));

    debug!(winner = %winner, scoreline = %scoreline, "match complete");
    true
}

fn advance_to_next_set(state: &mut Match, server: Player) {
    state.current_set += 1;
    while state.sets.len() < state.current_set {
        state.sets.push(SetScore::default());
    }
    state.game_number = 1;
    state.current_game_score = GameScore::new(server);
    state.is_tie_break = false;
    state.tie_break_score = None;

    if state.is_final_set_tie_break() {
        debug!(set = state.current_set, "final set played as tiebreak");
        state.is_tie_break = true;
        state.tie_break_score = Some(TieBreakScore::new(server));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        MatchFormat, ScoringSystem, SetDuration, TennisPoint, TieBreakRules, TieBreakTally,
    };

    fn config(format: MatchFormat, duration: SetDuration, tie_break: TieBreakRules) -> MatchConfig {
        let mut config = MatchConfig::new("Nicky", "Opponent");
        config.match_format = format;
        config.set_duration = duration;
        config.tie_break_rules = tie_break;
        config
    }

    fn win_game(state: &Match, player: Player) -> Match {
        let mut next = state.clone();
        for _ in 0..4 {
            next = score_point(&next, player);
        }
        next
    }

    fn win_games(state: &Match, player: Player, count: usize) -> Match {
        (0..count).fold(state.clone(), |acc, _| win_game(&acc, player))
    }

    /// Play alternating games starting with `first` until both have `each` games
    fn trade_games(state: &Match, first: Player, each: usize) -> Match {
        let mut next = state.clone();
        for _ in 0..each {
            next = win_game(&next, first);
            next = win_game(&next, first.opponent());
        }
        next
    }

    fn win_points(state: &Match, player: Player, count: usize) -> Match {
        (0..count).fold(state.clone(), |acc, _| score_point(&acc, player))
    }

    #[test]
    fn test_single_set_end_to_end() {
        let mut config = config(MatchFormat::Single, SetDuration::Four, TieBreakRules::None);
        config.scoring_system = ScoringSystem::Ad;
        let start = create_match(config);

        let after_first = win_game(&start, Player::Player1);
        assert_eq!(after_first.sets[0].player1_games, 1);
        assert_eq!(after_first.game_number, 2);
        assert_eq!(after_first.current_game_score.server, Player::Player2);

        let done = win_games(&after_first, Player::Player1, 3);
        assert_eq!(
            done.sets[0],
            SetScore {
                player1_games: 4,
                player2_games: 0,
                is_complete: true,
                winner: Some(Player::Player1),
                tie_break_score: None,
            }
        );
        assert_eq!(done.status, MatchStatus::Completed);
        assert_eq!(done.match_winner, Some(Player::Player1));
        assert_eq!(done.final_scoreline.as_deref(), Some("4-0"));
        assert_eq!(done.sets.len(), 1);

        let game_entries =
            done.game_history.iter().filter(|e| matches!(e, HistoryEntry::Game(_))).count();
        assert_eq!(game_entries, 4);
        assert!(matches!(done.game_history.last(), Some(HistoryEntry::MatchComplete(_))));
    }

    #[test]
    fn test_best_of_three_straight_sets() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Six, TieBreakRules::SevenPoint));

        // 6-4: trade four games each way then two more to player1
        let mut state = trade_games(&start, Player::Player1, 4);
        state = win_games(&state, Player::Player1, 2);
        assert!(state.sets[0].is_complete);
        assert_eq!(state.current_set, 2);
        assert_eq!(state.game_number, 1);
        assert_eq!(state.sets.len(), 2);

        // 6-3
        state = trade_games(&state, Player::Player1, 3);
        state = win_games(&state, Player::Player1, 3);

        assert_eq!(state.status, MatchStatus::Completed);
        assert_eq!(state.match_winner, Some(Player::Player1));
        assert_eq!(state.final_scoreline.as_deref(), Some("6-4, 6-3"));
    }

    #[test]
    fn test_tie_break_decides_set() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Six, TieBreakRules::SevenPoint));
        let state = trade_games(&start, Player::Player1, 6);

        assert_eq!((state.sets[0].player1_games, state.sets[0].player2_games), (6, 6));
        assert!(state.is_tie_break);
        let tb = state.tie_break_score.expect("tiebreak state");
        assert_eq!((tb.player1_points, tb.player2_points), (0, 0));
        assert_eq!(state.current_game_score.player1_points, TennisPoint::Love);

        // 7-5 to player1
        let mut state = state;
        for _ in 0..5 {
            state = score_point(&state, Player::Player1);
            state = score_point(&state, Player::Player2);
        }
        state = win_points(&state, Player::Player1, 2);

        let set = &state.sets[0];
        assert!(set.is_complete);
        assert_eq!(set.winner, Some(Player::Player1));
        assert_eq!((set.player1_games, set.player2_games), (7, 6));
        assert_eq!(set.tie_break_score, Some(TieBreakTally { player1_points: 7, player2_points: 5 }));
        assert_eq!(set.scoreline(), "7-6(7-5)");

        assert!(!state.is_tie_break);
        assert!(state.tie_break_score.is_none());
        assert_eq!(state.current_set, 2);
        assert!(matches!(
            state.game_history.last(),
            Some(HistoryEntry::TieBreak(TieBreakResult { set: 1, player1_points: 7, player2_points: 5, .. }))
        ));
    }

    #[test]
    fn test_tie_break_scoreline_loser_points_second() {
        let start = create_match(config(MatchFormat::Single, SetDuration::Four, TieBreakRules::SevenPoint));
        let mut state = trade_games(&start, Player::Player2, 4);
        assert!(state.is_tie_break);

        // player2 takes it 7-5
        for _ in 0..5 {
            state = score_point(&state, Player::Player1);
            state = score_point(&state, Player::Player2);
        }
        state = win_points(&state, Player::Player2, 2);

        assert_eq!(state.status, MatchStatus::Completed);
        assert_eq!(state.match_winner, Some(Player::Player2));
        assert_eq!(state.final_scoreline.as_deref(), Some("5-4(7-5)"));
    }

    #[test]
    fn test_no_tie_break_set_runs_on() {
        let start = create_match(config(MatchFormat::Single, SetDuration::Six, TieBreakRules::None));
        let mut state = trade_games(&start, Player::Player1, 6);
        assert!(!state.is_tie_break);

        state = win_game(&state, Player::Player1);
        assert!(!state.sets[0].is_complete);
        state = win_game(&state, Player::Player1);
        assert_eq!(state.final_scoreline.as_deref(), Some("8-6"));
    }

    #[test]
    fn test_final_set_tie_break_replaces_deciding_set() {
        let mut config = config(MatchFormat::BestOf3, SetDuration::Four, TieBreakRules::SevenPoint);
        config.final_set_tie_break = Some(true);
        let start = create_match(config);

        let mut state = win_games(&start, Player::Player1, 4);
        state = win_games(&state, Player::Player2, 4);
        assert_eq!(state.current_set, 3);
        assert!(state.is_tie_break, "deciding set starts straight in a tiebreak");
        assert!(state.tie_break_score.is_some());

        // 10-point default: 9 points is not enough
        state = win_points(&state, Player::Player2, 9);
        assert_eq!(state.status, MatchStatus::InProgress);
        state = score_point(&state, Player::Player2);

        assert_eq!(state.status, MatchStatus::Completed);
        assert_eq!(state.match_winner, Some(Player::Player2));
        assert_eq!(state.final_scoreline.as_deref(), Some("4-0, 4-0, 1-0(10-0)"));
    }

    #[test]
    fn test_completed_match_is_idempotent() {
        let start = create_match(config(MatchFormat::Single, SetDuration::Four, TieBreakRules::None));
        let done = win_games(&start, Player::Player1, 4);
        assert!(done.is_completed());

        assert_eq!(score_point(&done, Player::Player2), done);
        assert_eq!(remove_point(&done, Player::Player1), done);
        assert_eq!(set_server(&done, Player::Player2), done);
        assert_eq!(adjust_games(&done, Player::Player2, 1), done);
    }

    #[test]
    fn test_completed_current_set_rejects_points() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Four, TieBreakRules::None));
        let mut stuck = start.clone();
        stuck.sets[0].is_complete = true;
        stuck.sets[0].winner = Some(Player::Player1);

        assert_eq!(score_point(&stuck, Player::Player2), stuck);
    }

    #[test]
    fn test_remove_point_and_tie_break_limitation() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Six, TieBreakRules::SevenPoint));
        let state = win_points(&start, Player::Player1, 2);
        let undone = remove_point(&state, Player::Player1);
        assert_eq!(undone.current_game_score.player1_points, TennisPoint::Fifteen);

        let tb_state = score_point(&trade_games(&start, Player::Player1, 6), Player::Player1);
        assert!(tb_state.is_tie_break);
        assert_eq!(remove_point(&tb_state, Player::Player1), tb_state);
    }

    #[test]
    fn test_set_server_targets_active_score() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Six, TieBreakRules::SevenPoint));
        let moved = set_server(&start, Player::Player2);
        assert_eq!(moved.current_game_score.server, Player::Player2);
        assert_eq!(moved.current_game_score.player1_points, TennisPoint::Love);

        let tb_state = trade_games(&start, Player::Player1, 6);
        let before = tb_state.tie_break_score.expect("tiebreak").server;
        let moved = set_server(&tb_state, before.opponent());
        assert_eq!(moved.tie_break_score.map(|tb| tb.server), Some(before.opponent()));
        assert_eq!(moved.current_server(), before.opponent());
    }

    #[test]
    fn test_server_alternates_each_game() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Six, TieBreakRules::SevenPoint));
        let state = win_game(&start, Player::Player2);
        match &state.game_history[0] {
            HistoryEntry::Game(game) => {
                assert_eq!(game.server, Player::Player1);
                assert!(game.is_break());
                assert_eq!((game.player1_games, game.player2_games), (0, 1));
            }
            other => panic!("unexpected entry {other:?}"),
        }
        assert_eq!(state.current_game_score.server, Player::Player2);
    }

    #[test]
    fn test_next_set_server_after_tie_break() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Six, TieBreakRules::SevenPoint));
        let mut state = trade_games(&start, Player::Player1, 6);
        // 12 games played, player1 opens the tiebreak
        assert_eq!(state.current_server(), Player::Player1);

        // 7-0: last point (7th) is served by player2 in the 1-2-2 rotation
        state = win_points(&state, Player::Player1, 7);
        assert_eq!(state.current_set, 2);
        assert_eq!(state.current_game_score.server, Player::Player1);
    }

    #[test]
    fn test_pause_blocks_scoring() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Six, TieBreakRules::SevenPoint));
        let paused = pause(&start);
        assert_eq!(paused.status, MatchStatus::Paused);
        assert_eq!(score_point(&paused, Player::Player1), paused);

        let resumed = resume(&paused);
        assert_eq!(resumed.status, MatchStatus::InProgress);
        assert_eq!(score_point(&resumed, Player::Player1).current_game_score.player1_points, TennisPoint::Fifteen);
    }

    #[test]
    fn test_adjust_games_floors_and_does_not_cascade() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Six, TieBreakRules::SevenPoint));
        let adjusted = adjust_games(&start, Player::Player1, 6);
        assert_eq!(adjusted.sets[0].player1_games, 6);
        assert!(!adjusted.sets[0].is_complete);

        let floored = adjust_games(&adjusted, Player::Player2, -3);
        assert_eq!(floored.sets[0].player2_games, 0);

        // The next game re-evaluates the set
        let next = win_game(&adjusted, Player::Player1);
        assert!(next.sets[0].is_complete);
        assert_eq!(next.current_set, 2);
    }

    #[test]
    fn test_adjust_games_capped_near_set_length() {
        let start = create_match(config(MatchFormat::BestOf3, SetDuration::Six, TieBreakRules::SevenPoint));

        let mut state = adjust_games(&start, Player::Player2, i32::MAX);
        state = adjust_games(&state, Player::Player2, i32::MAX);
        assert_eq!(state.sets[0].player2_games, 7);

        state = adjust_games(&state, Player::Player1, 6);
        assert_eq!(state.sets[0].player1_games, 6);

        // 7-7 after the game; no overflow and no set awarded
        state = win_game(&state, Player::Player1);
        assert_eq!((state.sets[0].player1_games, state.sets[0].player2_games), (7, 7));
        assert!(!state.sets[0].is_complete);
        assert_eq!(state.status, MatchStatus::InProgress);
    }

    #[test]
    fn test_best_of_five_needs_three_sets() {
        let format = MatchFormat::BestOf5;
        assert_eq!(format.sets_to_win(), 3);
        assert_eq!(format.max_sets(), 5);

        let start = create_match(config(format, SetDuration::Six, TieBreakRules::SevenPoint));
        let mut state = win_games(&start, Player::Player1, 12);
        state = win_games(&state, Player::Player2, 6);

        assert_eq!(state.sets_won(Player::Player1), 2);
        assert_eq!(state.sets_won(Player::Player2), 1);
        assert_eq!(state.status, MatchStatus::InProgress);
        assert_eq!(state.current_set, 4);
        assert!(state.match_winner.is_none());

        state = win_games(&state, Player::Player1, 6);
        assert_eq!(state.status, MatchStatus::Completed);
        assert_eq!(state.match_winner, Some(Player::Player1));
        assert_eq!(state.final_scoreline.as_deref(), Some("6-0, 6-0, 6-0, 6-0"));
        assert_eq!(state.sets.len(), 4);
    }

    #[test]
    fn test_best_of_five_final_set_tie_break_is_fifth_set() {
        let mut config = config(MatchFormat::BestOf5, SetDuration::Four, TieBreakRules::SevenPoint);
        config.final_set_tie_break = Some(true);
        let start = create_match(config);

        let mut state = win_games(&start, Player::Player1, 4);
        state = win_games(&state, Player::Player2, 4);
        assert_eq!(state.current_set, 3);
        assert!(!state.is_tie_break, "set 3 is a normal set in best of 5");

        state = win_games(&state, Player::Player1, 4);
        state = win_games(&state, Player::Player2, 4);
        assert_eq!(state.current_set, 5);
        assert!(state.is_tie_break);

        state = win_points(&state, Player::Player1, 10);
        assert_eq!(state.status, MatchStatus::Completed);
        assert_eq!(state.match_winner, Some(Player::Player1));
        assert_eq!(state.final_scoreline.as_deref(), Some("4-0, 4-0, 4-0, 4-0, 1-0(10-0)"));
    }

    #[test]
    fn test_format_scoreline_skips_open_sets() {
        let sets = vec![
            SetScore { player1_games: 6, player2_games: 3, is_complete: true, winner: Some(Player::Player1), tie_break_score: None },
            SetScore { player1_games: 2, player2_games: 1, ..Default::default() },
        ];
        assert_eq!(format_scoreline(&sets), "6-3");
    }
}
