//! Session: a group of matches played together on one occasion.

use crate::models::game::MatchId;
use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Lifecycle state. Completed sessions accept no match changes until reopened.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Open,
    Completed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub state: SessionState,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// Match ids in creation order.
    pub matches: Vec<MatchId>,
    /// Distinct players taking part, in selection order.
    pub participants: Vec<PlayerId>,
}

impl Session {
    pub fn new(participants: Vec<PlayerId>, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Open,
            created_at: Utc::now(),
            completed_at: None,
            notes,
            matches: Vec::new(),
            participants,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// Add a player to the participant list if not already there.
    pub fn add_participant(&mut self, player: PlayerId) {
        if !self.participants.contains(&player) {
            self.participants.push(player);
        }
    }
}
