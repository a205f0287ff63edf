//! Squash match tracker: library with models, business logic, SQLite store and HTTP API.

pub mod api;
pub mod config;
pub mod db;
pub mod logic;
pub mod models;

pub use config::Config;
pub use logic::{
    add_match, complete_session, create_session, delete_session, highlights, leaderboard,
    record_score, remove_match, reopen_session, reverse_match, session_view, session_views,
    submit_score, update_notes, validate_scores, Highlights, LeaderboardEntry, SessionView,
    ValidScore,
};
pub use models::{
    ErrorKind, GameMatch, MatchId, Player, PlayerId, PlayerStats, RatingSnapshot, Rules, Session,
    SessionId, SessionState, Side, Tracker, TrackerError,
};
