//! Tracker: the whole roster with its sessions and matches, plus the error type.

use crate::models::game::{GameMatch, MatchId};
use crate::models::player::{Player, PlayerId, DEFAULT_RATING};
use crate::models::session::{Session, SessionId};
use serde::Serialize;
use thiserror::Error;

/// Broad category of a [`TrackerError`], reported to API clients.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    State,
}

/// Errors that can occur during tracker operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TrackerError {
    /// Score pair rejected by the validator; the reason is human-readable.
    #[error("{0}")]
    InvalidScore(String),
    #[error("At least 2 players are required")]
    NotEnoughPlayers,
    #[error("Player {0} was selected more than once")]
    DuplicatePlayer(PlayerId),
    #[error("Players must be different")]
    SamePlayer,
    #[error("Player name is required")]
    EmptyName,
    #[error("Player with this name already exists")]
    DuplicatePlayerName,
    #[error("Player {0} is no longer active")]
    InactivePlayer(PlayerId),
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),
    #[error("Match {0} not found")]
    MatchNotFound(MatchId),
    /// Match changes require an open session.
    #[error("Session is completed; reopen it first")]
    SessionCompleted,
    #[error("Session is already completed")]
    SessionAlreadyCompleted,
    #[error("Session is not completed")]
    SessionNotCompleted,
    /// Reversal requested for a match with no recorded rating effect.
    #[error("Match has no recorded result to reverse")]
    MatchNotCompleted,
}

impl TrackerError {
    pub fn kind(&self) -> ErrorKind {
        use TrackerError::*;
        match self {
            InvalidScore(_) | NotEnoughPlayers | DuplicatePlayer(_) | SamePlayer | EmptyName
            | DuplicatePlayerName | InactivePlayer(_) => ErrorKind::Validation,
            PlayerNotFound(_) | SessionNotFound(_) | MatchNotFound(_) => ErrorKind::NotFound,
            SessionCompleted | SessionAlreadyCompleted | SessionNotCompleted
            | MatchNotCompleted => ErrorKind::State,
        }
    }
}

/// Tunable constants for ratings and match generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rules {
    /// Maximum rating points exchanged per match.
    pub k_factor: f64,
    pub initial_rating: f64,
    /// How many matches a new session starts with.
    pub matches_per_session: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            initial_rating: DEFAULT_RATING,
            matches_per_session: 5,
        }
    }
}

/// Full tracker state: players, sessions and matches, each in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tracker {
    pub players: Vec<Player>,
    pub sessions: Vec<Session>,
    pub matches: Vec<GameMatch>,
    pub rules: Rules,
}

impl Tracker {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, TrackerError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(TrackerError::PlayerNotFound(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player, TrackerError> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TrackerError::PlayerNotFound(id))
    }

    /// Mutable references to two different players at once (for rating updates).
    pub fn player_pair_mut(
        &mut self,
        a: PlayerId,
        b: PlayerId,
    ) -> Result<(&mut Player, &mut Player), TrackerError> {
        if a == b {
            return Err(TrackerError::SamePlayer);
        }
        let ia = self
            .players
            .iter()
            .position(|p| p.id == a)
            .ok_or(TrackerError::PlayerNotFound(a))?;
        let ib = self
            .players
            .iter()
            .position(|p| p.id == b)
            .ok_or(TrackerError::PlayerNotFound(b))?;
        if ia < ib {
            let (left, right) = self.players.split_at_mut(ib);
            Ok((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.players.split_at_mut(ia);
            Ok((&mut right[0], &mut left[ib]))
        }
    }

    /// Like [`Tracker::player`] but also rejects deactivated players.
    pub fn active_player(&self, id: PlayerId) -> Result<&Player, TrackerError> {
        let p = self.player(id)?;
        if !p.active {
            return Err(TrackerError::InactivePlayer(id));
        }
        Ok(p)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.active)
    }

    pub fn session(&self, id: SessionId) -> Result<&Session, TrackerError> {
        self.sessions
            .iter()
            .find(|s| s.id == id)
            .ok_or(TrackerError::SessionNotFound(id))
    }

    pub fn session_mut(&mut self, id: SessionId) -> Result<&mut Session, TrackerError> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TrackerError::SessionNotFound(id))
    }

    pub fn game(&self, id: MatchId) -> Result<&GameMatch, TrackerError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .ok_or(TrackerError::MatchNotFound(id))
    }

    pub fn game_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, TrackerError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(TrackerError::MatchNotFound(id))
    }

    /// Matches of a session in creation order.
    pub fn session_matches(&self, id: SessionId) -> Result<Vec<&GameMatch>, TrackerError> {
        let session = self.session(id)?;
        session.matches.iter().map(|&mid| self.game(mid)).collect()
    }

    /// Add a player to the roster. Names must be unique (case-insensitive) among all players.
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, TrackerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::EmptyName);
        }
        if self.players.iter().any(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(TrackerError::DuplicatePlayerName);
        }
        let player = Player::new(name, self.rules.initial_rating);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player from the roster. Their match history and rating are kept.
    pub fn deactivate_player(&mut self, id: PlayerId) -> Result<(), TrackerError> {
        self.player_mut(id)?.active = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_player_trims_and_rejects_duplicates() {
        let mut t = Tracker::default();
        let id = t.add_player("  Morten ").unwrap();
        assert_eq!(t.player(id).unwrap().name, "Morten");
        assert_eq!(t.player(id).unwrap().rating, DEFAULT_RATING);
        assert_eq!(t.add_player("morten"), Err(TrackerError::DuplicatePlayerName));
        assert_eq!(t.add_player("   "), Err(TrackerError::EmptyName));
    }

    #[test]
    fn deactivated_players_are_hidden_but_kept() {
        let mut t = Tracker::default();
        let id = t.add_player("Patrick").unwrap();
        t.deactivate_player(id).unwrap();
        assert_eq!(t.active_players().count(), 0);
        assert_eq!(t.active_player(id), Err(TrackerError::InactivePlayer(id)));
        assert!(t.player(id).is_ok());
    }

    #[test]
    fn error_kinds() {
        assert_eq!(TrackerError::SamePlayer.kind(), ErrorKind::Validation);
        assert_eq!(
            TrackerError::MatchNotFound(uuid::Uuid::nil()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(TrackerError::SessionCompleted.kind(), ErrorKind::State);
    }
}
