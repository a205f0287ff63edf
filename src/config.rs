//! Runtime configuration from environment variables.
//!
//! HOST, PORT, DATABASE_PATH, K_FACTOR, INITIAL_RATING, MATCHES_PER_SESSION, HIGHLIGHTS_LIMIT,
//! SEED_PLAYERS (comma-separated names added when the roster is empty).

use crate::models::Rules;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub rules: Rules,
    /// Default number of matches shown in highlights.
    pub highlights_limit: usize,
    pub seed_players: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_path: "squash_tracker.db".to_string(),
            rules: Rules::default(),
            highlights_limit: 5,
            seed_players: Vec::new(),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    checked(lookup, key, default, |_| true)
}

/// Parse `key` and keep it only if `valid` accepts it; otherwise warn and use `default`.
fn checked<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> T {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => value,
        _ => {
            log::warn!("Ignoring invalid {}={:?}; using default", key, raw);
            default
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (environment-like key/value source).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        // Ratings must stay finite; a session needs at least one generated match.
        let rules = Rules {
            k_factor: checked(&lookup, "K_FACTOR", defaults.rules.k_factor, |k: &f64| {
                k.is_finite() && *k > 0.0
            }),
            initial_rating: checked(
                &lookup,
                "INITIAL_RATING",
                defaults.rules.initial_rating,
                |r: &f64| r.is_finite(),
            ),
            matches_per_session: checked(
                &lookup,
                "MATCHES_PER_SESSION",
                defaults.rules.matches_per_session,
                |n: &usize| *n >= 1,
            ),
        };
        let seed_players = lookup("SEED_PLAYERS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT", defaults.port),
            database_path: lookup("DATABASE_PATH").unwrap_or(defaults.database_path),
            rules,
            highlights_limit: parsed(&lookup, "HIGHLIGHTS_LIMIT", defaults.highlights_limit),
            seed_players,
        }
    }
}
