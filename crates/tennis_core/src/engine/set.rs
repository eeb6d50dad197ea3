use crate::models::{MatchConfig, SetScore, TieBreakRules};

/// True when either side has reached the set length with a two-game lead.
///
/// Only raw game counts are considered; sets decided by a tiebreak are marked
/// complete by the controller directly.
pub fn is_set_won(set: &SetScore, config: &MatchConfig) -> bool {
    let required = config.set_duration.games();
    let (p1, p2) = (set.player1_games, set.player2_games);

    (p1 >= required && p1.saturating_sub(p2) >= 2) || (p2 >= required && p2.saturating_sub(p1) >= 2)
}

/// True when games are level at exactly the set length and tiebreaks are on
pub fn is_tie_break_needed(set: &SetScore, config: &MatchConfig) -> bool {
    if config.tie_break_rules == TieBreakRules::None {
        return false;
    }

    let required = config.set_duration.games();
    set.player1_games == required && set.player2_games == required
}
