//! Match (game) between two players, and the rating snapshot recorded when it is scored.

use crate::models::player::PlayerId;
use crate::models::session::SessionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side of the match (player_1 or player_2).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

/// Ratings of both players immediately before and after a match was scored.
///
/// Reversal restores from this record instead of running the formula backwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub player_1_before: f64,
    pub player_1_after: f64,
    pub player_2_before: f64,
    pub player_2_after: f64,
}

impl RatingSnapshot {
    pub fn player_1_delta(&self) -> f64 {
        self.player_1_after - self.player_1_before
    }

    pub fn player_2_delta(&self) -> f64 {
        self.player_2_after - self.player_2_before
    }
}

/// A single 1v1 squash match inside a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub session_id: SessionId,
    pub player_1: PlayerId,
    pub player_2: PlayerId,
    /// None until the match is scored.
    pub player_1_score: Option<u32>,
    pub player_2_score: Option<u32>,
    pub winner: Option<Side>,
    pub rating: Option<RatingSnapshot>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl GameMatch {
    pub fn new(session_id: SessionId, player_1: PlayerId, player_2: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            player_1,
            player_2,
            player_1_score: None,
            player_2_score: None,
            winner: None,
            rating: None,
            notes: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Both scores are set.
    pub fn is_completed(&self) -> bool {
        self.player_1_score.is_some() && self.player_2_score.is_some()
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player_1 == player || self.player_2 == player
    }

    pub fn winner_id(&self) -> Option<PlayerId> {
        self.winner.map(|side| match side {
            Side::One => self.player_1,
            Side::Two => self.player_2,
        })
    }
}
