//! Point progression inside a normal game

use crate::models::{GameScore, MatchConfig, Player, ScoringSystem, TennisPoint};

/// Award one point to `scorer`.
///
/// A game that already shows `game` for either side is returned unchanged;
/// the controller rotates to a fresh `GameScore` before that can happen.
pub fn add_point_to_game(score: &GameScore, scorer: Player, config: &MatchConfig) -> GameScore {
    let mut next = *score;
    if score.winner().is_some() {
        return next;
    }

    let opponent = scorer.opponent();
    let mine = score.points(scorer);
    let theirs = score.points(opponent);

    match mine {
        TennisPoint::Love => next.set_points(scorer, TennisPoint::Fifteen),
        TennisPoint::Fifteen => next.set_points(scorer, TennisPoint::Thirty),
        TennisPoint::Thirty => next.set_points(scorer, TennisPoint::Forty),
        TennisPoint::Forty => match (config.scoring_system, theirs) {
            (ScoringSystem::NoAd, _) => next.set_points(scorer, TennisPoint::Game),
            (ScoringSystem::Ad, TennisPoint::Forty) => {
                next.set_points(scorer, TennisPoint::Advantage)
            }
            // Opponent loses the advantage; back to deuce
            (ScoringSystem::Ad, TennisPoint::Advantage) => {
                next.set_points(opponent, TennisPoint::Forty)
            }
            (ScoringSystem::Ad, _) => next.set_points(scorer, TennisPoint::Game),
        },
        TennisPoint::Advantage => next.set_points(scorer, TennisPoint::Game),
        TennisPoint::Game => {}
    }

    next
}

/// Take one point back from `player`, the inverse of [`add_point_to_game`].
///
/// Floors at 0. `advantage` always returns both sides to 40.
pub fn remove_point_from_game(score: &GameScore, player: Player, config: &MatchConfig) -> GameScore {
    let mut next = *score;
    let opponent = player.opponent();

    match score.points(player) {
        TennisPoint::Love => {}
        TennisPoint::Fifteen => next.set_points(player, TennisPoint::Love),
        TennisPoint::Thirty => next.set_points(player, TennisPoint::Fifteen),
        TennisPoint::Forty => {
            next.set_points(player, TennisPoint::Thirty);
            // 40-Ad minus a point from the 40 side is 30-40, not 30-Ad
            if score.points(opponent) == TennisPoint::Advantage {
                next.set_points(opponent, TennisPoint::Forty);
            }
        }
        TennisPoint::Advantage => {
            next.set_points(player, TennisPoint::Forty);
            next.set_points(opponent, TennisPoint::Forty);
        }
        TennisPoint::Game => {
            let restored = match config.scoring_system {
                ScoringSystem::Ad if score.points(opponent) == TennisPoint::Forty => {
                    TennisPoint::Advantage
                }
                _ => TennisPoint::Forty,
            };
            next.set_points(player, restored);
        }
    }

    next
}
