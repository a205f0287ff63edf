//! ELO rating engine: simultaneous update from pre-match ratings, and snapshot-based reversal.

use crate::models::{Player, RatingSnapshot, Side};

/// Expected score of a player rated `rating` against an opponent rated `opponent`.
pub fn expected_score(rating: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / 400.0))
}

/// Compute both new ratings for a decided match. Draws cannot happen (the validator forbids them).
pub fn rate_match(player_1: f64, player_2: f64, winner: Side, k_factor: f64) -> RatingSnapshot {
    let expected_1 = expected_score(player_1, player_2);
    let expected_2 = expected_score(player_2, player_1);
    let (actual_1, actual_2) = match winner {
        Side::One => (1.0, 0.0),
        Side::Two => (0.0, 1.0),
    };
    RatingSnapshot {
        player_1_before: player_1,
        player_1_after: player_1 + k_factor * (actual_1 - expected_1),
        player_2_before: player_2,
        player_2_after: player_2 + k_factor * (actual_2 - expected_2),
    }
}

/// Rating a player should return to when a match is undone.
///
/// If nothing has moved the player since the match, this is the recorded `before` value exactly.
/// Otherwise later matches are kept and only this match's delta is taken off.
pub fn reverted_rating(current: f64, before: f64, after: f64) -> f64 {
    if current == after {
        before
    } else {
        current - (after - before)
    }
}

/// Write a snapshot's `after` ratings to both players.
pub fn apply_snapshot(player_1: &mut Player, player_2: &mut Player, snapshot: &RatingSnapshot) {
    player_1.rating = snapshot.player_1_after;
    player_2.rating = snapshot.player_2_after;
}

/// Undo a snapshot previously applied with [`apply_snapshot`].
pub fn revert_snapshot(player_1: &mut Player, player_2: &mut Player, snapshot: &RatingSnapshot) {
    player_1.rating = reverted_rating(
        player_1.rating,
        snapshot.player_1_before,
        snapshot.player_1_after,
    );
    player_2.rating = reverted_rating(
        player_2.rating,
        snapshot.player_2_before,
        snapshot.player_2_after,
    );
}
