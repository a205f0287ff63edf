//! Session lifecycle: create (with generated matches), add/remove matches, complete, reopen, delete.

use crate::logic::scoring::{ensure_match_editable, reverse_match};
use crate::models::{
    GameMatch, MatchId, PlayerId, Session, SessionId, SessionState, Tracker, TrackerError,
};
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;

/// Build the opening pairings for a session.
///
/// 1. Every unordered pair of `players` (round-robin).
/// 2. Shuffle and keep at most `count`.
/// 3. If fewer pairs exist than `count`, repeat random pairs until `count` is reached.
pub fn generate_pairings<R: Rng>(
    players: &[PlayerId],
    count: usize,
    rng: &mut R,
) -> Vec<(PlayerId, PlayerId)> {
    let mut pairs: Vec<(PlayerId, PlayerId)> = players
        .iter()
        .enumerate()
        .flat_map(|(i, &a)| players[i + 1..].iter().map(move |&b| (a, b)))
        .collect();
    if pairs.is_empty() {
        return pairs;
    }
    pairs.shuffle(rng);
    pairs.truncate(count);

    let distinct = pairs.len();
    while pairs.len() < count {
        let pick = pairs[rng.gen_range(0..distinct)];
        pairs.push(pick);
    }
    pairs
}

/// Create a session for the selected players, with its opening matches already generated.
///
/// Requires at least 2 distinct, existing, active players.
pub fn create_session(
    tracker: &mut Tracker,
    player_ids: &[PlayerId],
    notes: Option<String>,
) -> Result<SessionId, TrackerError> {
    if player_ids.len() < 2 {
        return Err(TrackerError::NotEnoughPlayers);
    }
    for (i, &id) in player_ids.iter().enumerate() {
        if player_ids[..i].contains(&id) {
            return Err(TrackerError::DuplicatePlayer(id));
        }
        tracker.active_player(id)?;
    }

    let notes = notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    let mut session = Session::new(player_ids.to_vec(), notes);
    let pairings = generate_pairings(
        player_ids,
        tracker.rules.matches_per_session,
        &mut rand::thread_rng(),
    );
    for (a, b) in pairings {
        let game = GameMatch::new(session.id, a, b);
        session.matches.push(game.id);
        tracker.matches.push(game);
    }
    let id = session.id;
    log::info!(
        "Created session {} with {} players and {} matches",
        id,
        session.participants.len(),
        session.matches.len()
    );
    tracker.sessions.push(session);
    Ok(id)
}

/// Append a pending match between two players to an open session.
pub fn add_match(
    tracker: &mut Tracker,
    session_id: SessionId,
    player_1: PlayerId,
    player_2: PlayerId,
) -> Result<MatchId, TrackerError> {
    if !tracker.session(session_id)?.is_open() {
        return Err(TrackerError::SessionCompleted);
    }
    if player_1 == player_2 {
        return Err(TrackerError::SamePlayer);
    }
    tracker.active_player(player_1)?;
    tracker.active_player(player_2)?;

    let game = GameMatch::new(session_id, player_1, player_2);
    let id = game.id;
    let session = tracker.session_mut(session_id)?;
    session.matches.push(id);
    session.add_participant(player_1);
    session.add_participant(player_2);
    tracker.matches.push(game);
    Ok(id)
}

/// Remove a match from its (open) session. A scored match has its rating effect reversed first.
pub fn remove_match(tracker: &mut Tracker, match_id: MatchId) -> Result<(), TrackerError> {
    ensure_match_editable(tracker, match_id)?;
    if tracker.game(match_id)?.is_completed() {
        reverse_match(tracker, match_id)?;
    }
    let session_id = tracker.game(match_id)?.session_id;
    tracker.session_mut(session_id)?.matches.retain(|&m| m != match_id);
    tracker.matches.retain(|m| m.id != match_id);
    Ok(())
}

/// Open -> Completed.
pub fn complete_session(tracker: &mut Tracker, session_id: SessionId) -> Result<(), TrackerError> {
    let session = tracker.session_mut(session_id)?;
    if session.state == SessionState::Completed {
        return Err(TrackerError::SessionAlreadyCompleted);
    }
    session.state = SessionState::Completed;
    session.completed_at = Some(Utc::now());
    Ok(())
}

/// Completed -> Open. Match data is left as it was.
pub fn reopen_session(tracker: &mut Tracker, session_id: SessionId) -> Result<(), TrackerError> {
    let session = tracker.session_mut(session_id)?;
    if session.state != SessionState::Completed {
        return Err(TrackerError::SessionNotCompleted);
    }
    session.state = SessionState::Open;
    session.completed_at = None;
    Ok(())
}

/// Delete a session in any state: reverse every scored match it owns, then drop its matches
/// and the session itself. Returns how many results were reversed.
pub fn delete_session(tracker: &mut Tracker, session_id: SessionId) -> Result<usize, TrackerError> {
    let match_ids = tracker.session(session_id)?.matches.clone();
    let mut scored = Vec::new();
    for &mid in match_ids.iter().rev() {
        let game = tracker.game(mid)?;
        if game.is_completed() {
            scored.push((mid, game.completed_at));
        }
    }
    // Latest result first, so each reversal finds its players where that match left them.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    for &(mid, _) in &scored {
        reverse_match(tracker, mid)?;
    }
    let reversed = scored.len();
    tracker.matches.retain(|m| m.session_id != session_id);
    tracker.sessions.retain(|s| s.id != session_id);
    log::info!(
        "Deleted session {} ({} matches, {} results reversed)",
        session_id,
        match_ids.len(),
        reversed
    );
    Ok(reversed)
}
