//! Leaderboard: active players by rating, with derived per-player stats.

use crate::models::{PlayerId, Tracker};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub id: PlayerId,
    pub name: String,
    pub rating: f64,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    /// Percentage, one decimal.
    pub win_rate: f64,
    pub total_points: u32,
    /// Two decimals.
    pub points_per_match: f64,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Active players sorted by rating, highest first. Equal ratings keep roster order.
pub fn leaderboard(tracker: &Tracker) -> Vec<LeaderboardEntry> {
    let mut players: Vec<_> = tracker.active_players().collect();
    players.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    players
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let stats = p.stats();
            let (win_rate, points_per_match) = if stats.matches_played == 0 {
                (0.0, 0.0)
            } else {
                let played = f64::from(stats.matches_played);
                (
                    round_to(f64::from(stats.wins) / played * 100.0, 1),
                    round_to(f64::from(stats.total_points) / played, 2),
                )
            };
            LeaderboardEntry {
                rank: i + 1,
                id: p.id,
                name: p.name.clone(),
                rating: p.rating,
                matches_played: stats.matches_played,
                wins: stats.wins,
                losses: stats.losses,
                win_rate,
                total_points: stats.total_points,
                points_per_match,
            }
        })
        .collect()
}
