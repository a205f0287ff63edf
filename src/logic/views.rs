//! Read-side views of sessions and matches with player names resolved (for API responses).

use crate::models::{
    GameMatch, MatchId, PlayerId, RatingSnapshot, SessionId, SessionState, Side, Tracker,
    TrackerError,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchView {
    pub id: MatchId,
    pub session_id: SessionId,
    pub player_1: PlayerId,
    pub player_2: PlayerId,
    pub player_1_name: String,
    pub player_2_name: String,
    pub player_1_score: Option<u32>,
    pub player_2_score: Option<u32>,
    pub winner: Option<Side>,
    pub winner_name: Option<String>,
    pub rating: Option<RatingSnapshot>,
    pub player_1_rating_change: Option<f64>,
    pub player_2_rating_change: Option<f64>,
    pub is_completed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionView {
    pub id: SessionId,
    pub state: SessionState,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub participants: Vec<PlayerId>,
    pub matches: Vec<MatchView>,
}

fn name_of(tracker: &Tracker, id: PlayerId) -> String {
    tracker
        .player(id)
        .map(|p| p.name.clone())
        .unwrap_or_default()
}

pub fn match_view(tracker: &Tracker, game: &GameMatch) -> MatchView {
    MatchView {
        id: game.id,
        session_id: game.session_id,
        player_1: game.player_1,
        player_2: game.player_2,
        player_1_name: name_of(tracker, game.player_1),
        player_2_name: name_of(tracker, game.player_2),
        player_1_score: game.player_1_score,
        player_2_score: game.player_2_score,
        winner: game.winner,
        winner_name: game.winner_id().map(|id| name_of(tracker, id)),
        rating: game.rating,
        player_1_rating_change: game.rating.map(|s| s.player_1_delta()),
        player_2_rating_change: game.rating.map(|s| s.player_2_delta()),
        is_completed: game.is_completed(),
        notes: game.notes.clone(),
        created_at: game.created_at,
        completed_at: game.completed_at,
    }
}

pub fn session_view(tracker: &Tracker, id: SessionId) -> Result<SessionView, TrackerError> {
    let session = tracker.session(id)?;
    let matches = tracker
        .session_matches(id)?
        .into_iter()
        .map(|m| match_view(tracker, m))
        .collect();
    Ok(SessionView {
        id: session.id,
        state: session.state,
        completed: session.state == SessionState::Completed,
        created_at: session.created_at,
        completed_at: session.completed_at,
        notes: session.notes.clone(),
        participants: session.participants.clone(),
        matches,
    })
}

/// All sessions, newest first.
pub fn session_views(tracker: &Tracker) -> Result<Vec<SessionView>, TrackerError> {
    let mut sessions: Vec<_> = tracker.sessions.iter().collect();
    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sessions
        .into_iter()
        .map(|s| session_view(tracker, s.id))
        .collect()
}
