//! Highlights: the latest completed matches with their rating swings, plus a few summary stats.

use crate::models::{GameMatch, MatchId, PlayerId, SessionId, Tracker};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One player's side of a highlighted match.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerResult {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub rating_before: f64,
    pub rating_after: f64,
    pub rating_change: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchHighlight {
    pub match_id: MatchId,
    pub session_id: SessionId,
    pub completed_at: DateTime<Utc>,
    pub player_1: PlayerResult,
    pub player_2: PlayerResult,
    pub winner_name: String,
}

/// Largest single-match rating move for one player.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RatingSwing {
    pub player_name: String,
    pub rating_change: f64,
    pub opponent: String,
    /// "own-opponent", e.g. "11-7".
    pub score: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HighlightStats {
    /// Matches completed on the current UTC date (all matches, not only the visible window).
    pub matches_today: usize,
    pub biggest_gain: Option<RatingSwing>,
    pub biggest_loss: Option<RatingSwing>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Highlights {
    pub recent_matches: Vec<MatchHighlight>,
    pub stats: HighlightStats,
}

fn player_name(tracker: &Tracker, id: PlayerId) -> String {
    tracker
        .player(id)
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

fn highlight(tracker: &Tracker, game: &GameMatch) -> Option<MatchHighlight> {
    let snapshot = game.rating?;
    let completed_at = game.completed_at?;
    let player_1 = PlayerResult {
        id: game.player_1,
        name: player_name(tracker, game.player_1),
        score: game.player_1_score?,
        rating_before: snapshot.player_1_before,
        rating_after: snapshot.player_1_after,
        rating_change: snapshot.player_1_delta(),
    };
    let player_2 = PlayerResult {
        id: game.player_2,
        name: player_name(tracker, game.player_2),
        score: game.player_2_score?,
        rating_before: snapshot.player_2_before,
        rating_after: snapshot.player_2_after,
        rating_change: snapshot.player_2_delta(),
    };
    let winner_name = game
        .winner_id()
        .map(|id| player_name(tracker, id))
        .unwrap_or_default();
    Some(MatchHighlight {
        match_id: game.id,
        session_id: game.session_id,
        completed_at,
        player_1,
        player_2,
        winner_name,
    })
}

fn swing(own: &PlayerResult, opponent: &PlayerResult) -> RatingSwing {
    RatingSwing {
        player_name: own.name.clone(),
        rating_change: own.rating_change,
        opponent: opponent.name.clone(),
        score: format!("{}-{}", own.score, opponent.score),
    }
}

/// Build highlights from the `limit` most recently completed matches. `now` decides "today".
pub fn highlights(tracker: &Tracker, limit: usize, now: DateTime<Utc>) -> Highlights {
    // Newest-created first so equal timestamps still list the later match first.
    let mut completed: Vec<&GameMatch> = tracker
        .matches
        .iter()
        .rev()
        .filter(|m| m.is_completed() && m.completed_at.is_some())
        .collect();
    let today = now.date_naive();
    let matches_today = completed
        .iter()
        .filter(|m| m.completed_at.is_some_and(|t| t.date_naive() == today))
        .count();

    completed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    let recent_matches: Vec<MatchHighlight> = completed
        .into_iter()
        .take(limit)
        .filter_map(|m| highlight(tracker, m))
        .collect();

    let mut biggest_gain: Option<RatingSwing> = None;
    let mut biggest_loss: Option<RatingSwing> = None;
    for h in &recent_matches {
        for (own, opponent) in [(&h.player_1, &h.player_2), (&h.player_2, &h.player_1)] {
            let change = own.rating_change;
            if change > 0.0 && biggest_gain.as_ref().map_or(true, |g| change > g.rating_change) {
                biggest_gain = Some(swing(own, opponent));
            }
            if change < 0.0 && biggest_loss.as_ref().map_or(true, |l| change < l.rating_change) {
                biggest_loss = Some(swing(own, opponent));
            }
        }
    }

    Highlights {
        recent_matches,
        stats: HighlightStats {
            matches_today,
            biggest_gain,
            biggest_loss,
        },
    }
}
