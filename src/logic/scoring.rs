//! Scoring: record a validated result on a match and move ratings, or take a result back.

use crate::logic::rating::{apply_snapshot, rate_match, revert_snapshot};
use crate::logic::validation::{validate_raw_scores, ValidScore};
use crate::models::{MatchId, RatingSnapshot, Side, Tracker, TrackerError};
use chrono::Utc;
use serde_json::Value;

/// Fail unless the session owning `match_id` is open.
pub(crate) fn ensure_match_editable(tracker: &Tracker, match_id: MatchId) -> Result<(), TrackerError> {
    let game = tracker.game(match_id)?;
    if !tracker.session(game.session_id)?.is_open() {
        return Err(TrackerError::SessionCompleted);
    }
    Ok(())
}

/// Parse, validate and record raw scores for a match. See [`record_score`].
pub fn submit_score(
    tracker: &mut Tracker,
    match_id: MatchId,
    player_1_score: &Value,
    player_2_score: &Value,
    notes: Option<String>,
) -> Result<RatingSnapshot, TrackerError> {
    let score = validate_raw_scores(player_1_score, player_2_score)?;
    record_score(tracker, match_id, score, notes)
}

/// Record an already validated score on a match and update both players.
///
/// The owning session must be open. A match that was scored before is reversed first, so a
/// re-submission replaces the earlier result instead of stacking on top of it.
pub fn record_score(
    tracker: &mut Tracker,
    match_id: MatchId,
    score: ValidScore,
    notes: Option<String>,
) -> Result<RatingSnapshot, TrackerError> {
    ensure_match_editable(tracker, match_id)?;
    let (p1, p2) = {
        let game = tracker.game(match_id)?;
        (game.player_1, game.player_2)
    };
    // Both players must resolve before anything is changed.
    tracker.player_pair_mut(p1, p2)?;

    if tracker.game(match_id)?.is_completed() {
        log::debug!("Match {} re-scored; reversing previous result", match_id);
        reverse_match(tracker, match_id)?;
    }

    let winner = score.winner();
    let k_factor = tracker.rules.k_factor;
    let (player_1, player_2) = tracker.player_pair_mut(p1, p2)?;
    let snapshot = rate_match(player_1.rating, player_2.rating, winner, k_factor);
    apply_snapshot(player_1, player_2, &snapshot);
    player_1.record_result(winner == Side::One);
    player_2.record_result(winner == Side::Two);

    let game = tracker.game_mut(match_id)?;
    game.player_1_score = Some(score.player_1);
    game.player_2_score = Some(score.player_2);
    game.winner = Some(winner);
    game.rating = Some(snapshot);
    game.completed_at = Some(Utc::now());
    if let Some(notes) = notes {
        game.notes = normalized_notes(&notes);
    }
    Ok(snapshot)
}

/// Blank notes clear the field.
fn normalized_notes(notes: &str) -> Option<String> {
    let notes = notes.trim();
    (!notes.is_empty()).then(|| notes.to_string())
}

/// Replace a match's notes without touching its score or ratings. The owning session must be open.
pub fn update_notes(tracker: &mut Tracker, match_id: MatchId, notes: &str) -> Result<(), TrackerError> {
    ensure_match_editable(tracker, match_id)?;
    tracker.game_mut(match_id)?.notes = normalized_notes(notes);
    Ok(())
}

/// Undo a match's rating effect and counters, leaving the match pending.
///
/// Fails with [`TrackerError::MatchNotCompleted`] if the match carries no recorded result, so
/// one result can never be reversed twice.
pub fn reverse_match(tracker: &mut Tracker, match_id: MatchId) -> Result<(), TrackerError> {
    let game = tracker.game(match_id)?;
    let (snapshot, winner) = match (game.rating, game.winner) {
        (Some(snapshot), Some(winner)) => (snapshot, winner),
        _ => return Err(TrackerError::MatchNotCompleted),
    };
    let (p1, p2) = (game.player_1, game.player_2);

    let (player_1, player_2) = tracker.player_pair_mut(p1, p2)?;
    revert_snapshot(player_1, player_2, &snapshot);
    player_1.unrecord_result(winner == Side::One);
    player_2.unrecord_result(winner == Side::Two);

    let game = tracker.game_mut(match_id)?;
    game.player_1_score = None;
    game.player_2_score = None;
    game.winner = None;
    game.rating = None;
    game.completed_at = None;
    Ok(())
}
