use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use rusqlite::{params, Transaction};
use uuid::Uuid;

use super::connection::DbConn;
use crate::models::{
    GameMatch, Player, RatingSnapshot, Rules, Session, SessionState, Side, Tracker,
};

const PLAYER_COLUMNS: &str =
    "id, name, rating, active, created_at, matches_played, wins, total_points";
const SESSION_COLUMNS: &str = "id, state, created_at, completed_at, notes";
const MATCH_COLUMNS: &str = "id, session_id, player_1_id, player_2_id, player_1_score, \
     player_2_score, winner_side, player_1_rating_before, player_1_rating_after, \
     player_2_rating_before, player_2_rating_after, notes, created_at, completed_at";

fn state_to_sql(state: SessionState) -> &'static str {
    match state {
        SessionState::Open => "open",
        SessionState::Completed => "completed",
    }
}

fn state_from_sql(raw: &str) -> SessionState {
    if raw == "completed" {
        SessionState::Completed
    } else {
        SessionState::Open
    }
}

fn side_to_sql(side: Option<Side>) -> Option<i64> {
    side.map(|s| match s {
        Side::One => 1,
        Side::Two => 2,
    })
}

fn side_from_sql(raw: Option<i64>) -> Option<Side> {
    match raw {
        Some(1) => Some(Side::One),
        Some(2) => Some(Side::Two),
        _ => None,
    }
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        rating: row.get(2)?,
        active: row.get(3)?,
        created_at: row.get(4)?,
        matches_played: row.get(5)?,
        wins: row.get(6)?,
        total_points: row.get(7)?,
    })
}

fn parse_session_row(row: &rusqlite::Row) -> rusqlite::Result<Session> {
    let state: String = row.get(1)?;
    Ok(Session {
        id: row.get(0)?,
        state: state_from_sql(&state),
        created_at: row.get(2)?,
        completed_at: row.get(3)?,
        notes: row.get(4)?,
        matches: Vec::new(),
        participants: Vec::new(),
    })
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<GameMatch> {
    let before_1: Option<f64> = row.get(7)?;
    let after_1: Option<f64> = row.get(8)?;
    let before_2: Option<f64> = row.get(9)?;
    let after_2: Option<f64> = row.get(10)?;
    let rating = match (before_1, after_1, before_2, after_2) {
        (Some(player_1_before), Some(player_1_after), Some(player_2_before), Some(player_2_after)) => {
            Some(RatingSnapshot {
                player_1_before,
                player_1_after,
                player_2_before,
                player_2_after,
            })
        }
        _ => None,
    };
    Ok(GameMatch {
        id: row.get(0)?,
        session_id: row.get(1)?,
        player_1: row.get(2)?,
        player_2: row.get(3)?,
        player_1_score: row.get(4)?,
        player_2_score: row.get(5)?,
        winner: side_from_sql(row.get(6)?),
        rating,
        notes: row.get(11)?,
        created_at: row.get(12)?,
        completed_at: row.get(13)?,
    })
}

/// Load the whole tracker. Players and sessions come back in insertion order, each session's
/// matches and participants in their stored positions.
pub fn load(conn: &mut DbConn, rules: Rules) -> Result<Tracker> {
    let mut tracker = Tracker::new(rules);

    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    tracker.players = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load players")?;

    let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    tracker.sessions = stmt
        .query_map([], parse_session_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load sessions")?;

    let mut stmt = conn
        .prepare("SELECT session_id, player_id FROM session_players ORDER BY session_id, position")?;
    let participants = stmt
        .query_map([], |row| Ok((row.get::<_, Uuid>(0)?, row.get::<_, Uuid>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load session participants")?;

    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY rowid");
    let mut stmt = conn.prepare(&sql)?;
    tracker.matches = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load matches")?;

    let mut stmt = conn.prepare("SELECT session_id, id FROM matches ORDER BY session_id, position")?;
    let positions = stmt
        .query_map([], |row| Ok((row.get::<_, Uuid>(0)?, row.get::<_, Uuid>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to load match order")?;

    let index: HashMap<Uuid, usize> = tracker
        .sessions
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id, i))
        .collect();
    for (session_id, player_id) in participants {
        if let Some(&i) = index.get(&session_id) {
            tracker.sessions[i].participants.push(player_id);
        }
    }
    for (session_id, match_id) in positions {
        if let Some(&i) = index.get(&session_id) {
            tracker.sessions[i].matches.push(match_id);
        }
    }

    log::info!(
        "Loaded {} players, {} sessions, {} matches",
        tracker.players.len(),
        tracker.sessions.len(),
        tracker.matches.len()
    );
    Ok(tracker)
}

/// Write the whole tracker in one transaction: upsert every row and delete rows that no
/// longer exist. Either everything is written or nothing is.
pub fn save(conn: &mut DbConn, tracker: &Tracker) -> Result<()> {
    let tx = conn.transaction().context("Failed to begin transaction")?;
    save_players(&tx, tracker)?;
    save_sessions(&tx, tracker)?;
    save_matches(&tx, tracker)?;
    tx.commit().context("Failed to commit tracker state")
}

fn save_players(tx: &Transaction, tracker: &Tracker) -> Result<()> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO players (id, name, rating, active, created_at, matches_played, wins, total_points) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
         ON CONFLICT(id) DO UPDATE SET name = excluded.name, rating = excluded.rating, \
         active = excluded.active, matches_played = excluded.matches_played, \
         wins = excluded.wins, total_points = excluded.total_points",
    )?;
    for p in &tracker.players {
        stmt.execute(params![
            p.id,
            p.name,
            p.rating,
            p.active,
            p.created_at,
            p.matches_played,
            p.wins,
            p.total_points
        ])
        .with_context(|| format!("Failed to save player {}", p.name))?;
    }
    Ok(())
}

fn save_sessions(tx: &Transaction, tracker: &Tracker) -> Result<()> {
    let keep: HashSet<Uuid> = tracker.sessions.iter().map(|s| s.id).collect();
    delete_missing(tx, "sessions", &keep)?;

    let mut upsert = tx.prepare_cached(
        "INSERT INTO sessions (id, state, created_at, completed_at, notes) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         ON CONFLICT(id) DO UPDATE SET state = excluded.state, \
         completed_at = excluded.completed_at, notes = excluded.notes",
    )?;
    let mut clear = tx.prepare_cached("DELETE FROM session_players WHERE session_id = ?1")?;
    let mut add = tx.prepare_cached(
        "INSERT INTO session_players (session_id, player_id, position) VALUES (?1, ?2, ?3)",
    )?;
    for s in &tracker.sessions {
        upsert
            .execute(params![
                s.id,
                state_to_sql(s.state),
                s.created_at,
                s.completed_at,
                s.notes
            ])
            .with_context(|| format!("Failed to save session {}", s.id))?;
        clear.execute(params![s.id])?;
        for (pos, player_id) in s.participants.iter().enumerate() {
            add.execute(params![s.id, player_id, pos as i64])?;
        }
    }
    Ok(())
}

fn save_matches(tx: &Transaction, tracker: &Tracker) -> Result<()> {
    let keep: HashSet<Uuid> = tracker.matches.iter().map(|m| m.id).collect();
    delete_missing(tx, "matches", &keep)?;

    let positions: HashMap<Uuid, usize> = tracker
        .sessions
        .iter()
        .flat_map(|s| s.matches.iter().enumerate().map(|(pos, &id)| (id, pos)))
        .collect();

    let mut stmt = tx.prepare_cached(
        "INSERT INTO matches (id, session_id, position, player_1_id, player_2_id, player_1_score, \
         player_2_score, winner_side, player_1_rating_before, player_1_rating_after, \
         player_2_rating_before, player_2_rating_after, notes, created_at, completed_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15) \
         ON CONFLICT(id) DO UPDATE SET position = excluded.position, \
         player_1_score = excluded.player_1_score, player_2_score = excluded.player_2_score, \
         winner_side = excluded.winner_side, \
         player_1_rating_before = excluded.player_1_rating_before, \
         player_1_rating_after = excluded.player_1_rating_after, \
         player_2_rating_before = excluded.player_2_rating_before, \
         player_2_rating_after = excluded.player_2_rating_after, \
         notes = excluded.notes, completed_at = excluded.completed_at",
    )?;
    for m in &tracker.matches {
        let position = positions.get(&m.id).copied().unwrap_or_default() as i64;
        let snapshot = m.rating;
        stmt.execute(params![
            m.id,
            m.session_id,
            position,
            m.player_1,
            m.player_2,
            m.player_1_score,
            m.player_2_score,
            side_to_sql(m.winner),
            snapshot.map(|s| s.player_1_before),
            snapshot.map(|s| s.player_1_after),
            snapshot.map(|s| s.player_2_before),
            snapshot.map(|s| s.player_2_after),
            m.notes,
            m.created_at,
            m.completed_at
        ])
        .with_context(|| format!("Failed to save match {}", m.id))?;
    }
    Ok(())
}

/// Delete rows of `table` whose id is not in `keep`. Cascades clear dependent rows.
fn delete_missing(tx: &Transaction, table: &str, keep: &HashSet<Uuid>) -> Result<()> {
    let mut select = tx.prepare(&format!("SELECT id FROM {table}"))?;
    let stored = select
        .query_map([], |row| row.get::<_, Uuid>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    let mut delete = tx.prepare(&format!("DELETE FROM {table} WHERE id = ?1"))?;
    for id in stored.iter().filter(|id| !keep.contains(id)) {
        delete
            .execute(params![id])
            .with_context(|| format!("Failed to delete {id} from {table}"))?;
    }
    Ok(())
}
