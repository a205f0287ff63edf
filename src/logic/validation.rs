//! Score validation: decides whether a pair of scores is a legal finished squash game.

use crate::models::{Side, TrackerError};
use serde_json::Value;

pub const INVALID_SCORE: &str = "invalid score";
pub const WINNER_MUST_REACH_11: &str = "winner must reach 11";
pub const NO_TIE_ALLOWED: &str = "no tie allowed";
pub const MUST_WIN_BY_2: &str = "must win by 2";

/// Points the winner needs to reach.
pub const GAME_POINT: u32 = 11;
/// Required winning margin.
pub const MIN_MARGIN: u32 = 2;

/// A score pair that passed validation. Scores are ordered player_1, player_2.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ValidScore {
    pub player_1: u32,
    pub player_2: u32,
}

impl ValidScore {
    pub fn winner(&self) -> Side {
        if self.player_1 > self.player_2 {
            Side::One
        } else {
            Side::Two
        }
    }
}

fn reject(reason: &str) -> TrackerError {
    TrackerError::InvalidScore(reason.to_string())
}

/// Parse one raw score from a JSON value: a non-negative integer or a string holding one.
pub fn parse_score(value: &Value) -> Result<u32, TrackerError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| reject(INVALID_SCORE))
}

/// Validate a score pair.
///
/// Legal iff the higher score is at least 11, the scores differ and the margin is at least 2.
/// 11-0 is a shutout and always legal. Past 11 a short margin (12-12 included) is reported as
/// "must win by 2" before the tie check; at 11 a tie is reported as such.
pub fn validate_scores(player_1: u32, player_2: u32) -> Result<ValidScore, TrackerError> {
    let high = player_1.max(player_2);
    let low = player_1.min(player_2);
    if high < GAME_POINT {
        return Err(reject(WINNER_MUST_REACH_11));
    }
    if high == GAME_POINT && low == 0 {
        return Ok(ValidScore { player_1, player_2 });
    }
    if high > GAME_POINT && high - low < MIN_MARGIN {
        return Err(reject(MUST_WIN_BY_2));
    }
    if high == low {
        return Err(reject(NO_TIE_ALLOWED));
    }
    if high - low < MIN_MARGIN {
        return Err(reject(MUST_WIN_BY_2));
    }
    Ok(ValidScore { player_1, player_2 })
}

/// Parse and validate two raw JSON scores.
pub fn validate_raw_scores(player_1: &Value, player_2: &Value) -> Result<ValidScore, TrackerError> {
    let a = parse_score(player_1)?;
    let b = parse_score(player_2)?;
    validate_scores(a, b)
}
