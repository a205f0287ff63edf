//! Tracker business logic: score validation, ratings, session lifecycle and read-side views.

mod highlights;
mod leaderboard;
pub mod rating;
mod scoring;
mod session;
pub mod validation;
mod views;

pub use highlights::{highlights, HighlightStats, Highlights, MatchHighlight, PlayerResult, RatingSwing};
pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use scoring::{record_score, reverse_match, submit_score, update_notes};
pub use session::{
    add_match, complete_session, create_session, delete_session, generate_pairings, remove_match,
    reopen_session,
};
pub use validation::{validate_raw_scores, validate_scores, ValidScore};
pub use views::{match_view, session_view, session_views, MatchView, SessionView};
