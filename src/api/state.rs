//! Shared application state: the tracker in memory, written through to SQLite on every change.

use std::sync::RwLock;

use anyhow::Result;

use super::error::ApiError;
use crate::config::Config;
use crate::db::{self, DbPool};
use crate::models::{Tracker, TrackerError};

pub struct AppState {
    tracker: RwLock<Tracker>,
    pool: DbPool,
    pub highlights_limit: usize,
}

impl AppState {
    /// Prepare the schema, load stored state and seed the roster if it is empty.
    pub fn open(pool: DbPool, config: &Config) -> Result<Self> {
        let mut conn = db::get_connection(&pool)?;
        db::init_schema(&mut conn)?;
        let mut tracker = db::load(&mut conn, config.rules)?;

        if tracker.players.is_empty() && !config.seed_players.is_empty() {
            for name in &config.seed_players {
                if let Err(e) = tracker.add_player(name) {
                    log::warn!("Skipping seed player {:?}: {}", name, e);
                }
            }
            db::save(&mut conn, &tracker)?;
            log::info!("Seeded {} players", tracker.players.len());
        }

        Ok(Self {
            tracker: RwLock::new(tracker),
            pool,
            highlights_limit: config.highlights_limit,
        })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Run a read-only projection under the read lock.
    pub fn read<T>(
        &self,
        f: impl FnOnce(&Tracker) -> Result<T, TrackerError>,
    ) -> Result<T, ApiError> {
        let guard = self.tracker.read().map_err(|_| ApiError::Lock)?;
        Ok(f(&*guard)?)
    }

    /// Apply a mutation atomically.
    ///
    /// The mutation runs on a copy of the tracker. Only when it succeeds and the copy has been
    /// committed to the database does it replace the live state.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut Tracker) -> Result<T, TrackerError>,
    ) -> Result<T, ApiError> {
        let mut guard = self.tracker.write().map_err(|_| ApiError::Lock)?;
        let mut draft = (*guard).clone();
        let out = f(&mut draft).map_err(|e| {
            log::warn!("Rejected: {}", e);
            e
        })?;
        let mut conn = db::get_connection(&self.pool)?;
        db::save(&mut conn, &draft).map_err(|e| {
            log::error!("Failed to persist tracker: {:#}", e);
            e
        })?;
        *guard = draft;
        Ok(out)
    }
}
