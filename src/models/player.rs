//! Player and PlayerStats data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Rating every new player starts with.
pub const DEFAULT_RATING: f64 = 1200.0;

/// League points awarded per result (used for `total_points`).
pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_LOSS: u32 = 1;

/// Statistics view of a player (for API / display).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub total_points: u32,
}

impl PlayerStats {
    pub fn from_player(p: &Player) -> Self {
        Self {
            matches_played: p.matches_played,
            wins: p.wins,
            losses: p.matches_played.saturating_sub(p.wins),
            total_points: p.total_points,
        }
    }
}

/// A player on the roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Current ELO rating. Only the rating engine writes this.
    pub rating: f64,
    /// False once the player has been removed from the roster (soft delete).
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub matches_played: u32,
    pub wins: u32,
    /// 3 per win, 1 per loss.
    pub total_points: u32,
}

impl Player {
    /// Create a new active player with the given name and starting rating.
    pub fn new(name: impl Into<String>, rating: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rating,
            active: true,
            created_at: Utc::now(),
            matches_played: 0,
            wins: 0,
            total_points: 0,
        }
    }

    /// Current stats as a separate struct (for API responses).
    pub fn stats(&self) -> PlayerStats {
        PlayerStats::from_player(self)
    }

    /// Count a completed match for this player.
    pub fn record_result(&mut self, won: bool) {
        self.matches_played += 1;
        if won {
            self.wins += 1;
            self.total_points += POINTS_FOR_WIN;
        } else {
            self.total_points += POINTS_FOR_LOSS;
        }
    }

    /// Undo a result previously counted with [`Player::record_result`].
    pub fn unrecord_result(&mut self, won: bool) {
        self.matches_played = self.matches_played.saturating_sub(1);
        if won {
            self.wins = self.wins.saturating_sub(1);
            self.total_points = self.total_points.saturating_sub(POINTS_FOR_WIN);
        } else {
            self.total_points = self.total_points.saturating_sub(POINTS_FOR_LOSS);
        }
    }
}
