//! Data structures for the squash tracker: players, sessions, matches, tracker state.

mod game;
mod player;
mod session;
mod tracker;

pub use game::{GameMatch, MatchId, RatingSnapshot, Side};
pub use player::{Player, PlayerId, PlayerStats, DEFAULT_RATING, POINTS_FOR_LOSS, POINTS_FOR_WIN};
pub use session::{Session, SessionId, SessionState};
pub use tracker::{ErrorKind, Rules, Tracker, TrackerError};
