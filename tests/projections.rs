//! Integration tests for leaderboard, highlights and session views.

use chrono::{Duration, Utc};
use squash_tracker::{
    create_session, highlights, leaderboard, record_score, session_view, session_views,
    validate_scores, MatchId, PlayerId, SessionId, Tracker,
};

fn setup(names: &[&str]) -> (Tracker, Vec<PlayerId>) {
    let mut t = Tracker::default();
    let ids = names.iter().map(|n| t.add_player(n).unwrap()).collect();
    (t, ids)
}

fn score(t: &mut Tracker, id: MatchId, a: u32, b: u32) {
    record_score(t, id, validate_scores(a, b).unwrap(), None).unwrap();
}

fn matches_of(t: &Tracker, sid: SessionId) -> Vec<MatchId> {
    t.session(sid).unwrap().matches.clone()
}

#[test]
fn leaderboard_sorts_by_rating_with_stable_ties() {
    let (mut t, ids) = setup(&["Miklas", "Morten", "Patrick", "Jens"]);
    let sid = create_session(&mut t, &[ids[2], ids[3]], None).unwrap();
    let m = matches_of(&t, sid)[0];
    let game = t.game(m).unwrap().clone();
    // Whoever is player_1 wins.
    score(&mut t, m, 11, 2);

    let board = leaderboard(&t);
    assert_eq!(board.len(), 4);
    assert_eq!(board[0].id, game.player_1);
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].win_rate, 100.0);
    assert_eq!(board[0].points_per_match, 3.0);
    // Untouched players keep roster order in the middle.
    assert_eq!(board[1].name, "Miklas");
    assert_eq!(board[2].name, "Morten");
    assert_eq!(board[3].id, game.player_2);
    assert_eq!(board[3].losses, 1);
    assert_eq!(board[3].win_rate, 0.0);
}

#[test]
fn leaderboard_rounds_derived_stats_and_hides_inactive() {
    let (mut t, ids) = setup(&["A", "B", "C"]);
    let sid = create_session(&mut t, &ids[..2], None).unwrap();
    let ms = matches_of(&t, sid);
    score(&mut t, ms[0], 11, 1);
    score(&mut t, ms[1], 11, 1);
    score(&mut t, ms[2], 1, 11);
    t.deactivate_player(ids[2]).unwrap();

    let board = leaderboard(&t);
    assert_eq!(board.len(), 2);
    let a = board.iter().find(|e| e.id == ids[0]).unwrap();
    assert_eq!((a.matches_played, a.wins, a.losses), (3, 2, 1));
    assert_eq!(a.win_rate, 66.7);
    assert_eq!(a.total_points, 7);
    assert_eq!(a.points_per_match, 2.33);
}

#[test]
fn highlights_show_latest_matches_and_swings() {
    let (mut t, ids) = setup(&["A", "B"]);
    let sid = create_session(&mut t, &ids, None).unwrap();
    let ms = matches_of(&t, sid);
    score(&mut t, ms[0], 11, 9);
    score(&mut t, ms[1], 7, 11);
    score(&mut t, ms[2], 11, 0);

    let now = Utc::now();
    let h = highlights(&t, 2, now);
    assert_eq!(h.recent_matches.len(), 2);
    assert_eq!(h.recent_matches[0].match_id, ms[2]);
    assert_eq!(h.recent_matches[1].match_id, ms[1]);
    assert_eq!(h.stats.matches_today, 3);

    let latest = &h.recent_matches[0];
    assert_eq!(latest.winner_name, "A");
    assert_eq!(latest.player_1.score, 11);
    assert_eq!(
        latest.player_1.rating_after,
        latest.player_1.rating_before + latest.player_1.rating_change
    );

    let gain = h.stats.biggest_gain.as_ref().unwrap();
    let loss = h.stats.biggest_loss.as_ref().unwrap();
    assert!(gain.rating_change > 0.0);
    assert!(loss.rating_change < 0.0);
    let visible_max = h
        .recent_matches
        .iter()
        .flat_map(|m| [m.player_1.rating_change, m.player_2.rating_change])
        .fold(f64::MIN, f64::max);
    assert_eq!(gain.rating_change, visible_max);

    // "Today" is relative to the supplied clock.
    assert_eq!(highlights(&t, 5, now + Duration::days(2)).stats.matches_today, 0);
}

#[test]
fn highlights_ignore_pending_matches() {
    let (mut t, ids) = setup(&["A", "B"]);
    create_session(&mut t, &ids, None).unwrap();
    let h = highlights(&t, 5, Utc::now());
    assert!(h.recent_matches.is_empty());
    assert_eq!(h.stats.matches_today, 0);
    assert!(h.stats.biggest_gain.is_none());
    assert!(h.stats.biggest_loss.is_none());
}

#[test]
fn projections_are_pure() {
    let (mut t, ids) = setup(&["A", "B", "C"]);
    let sid = create_session(&mut t, &ids, None).unwrap();
    let first = matches_of(&t, sid)[0];
    score(&mut t, first, 11, 6);
    let snapshot = t.clone();
    let now = Utc::now();

    assert_eq!(leaderboard(&t), leaderboard(&t));
    assert_eq!(highlights(&t, 5, now), highlights(&t, 5, now));
    assert_eq!(session_views(&t), session_views(&t));
    assert_eq!(t, snapshot);
}

#[test]
fn session_view_resolves_names_in_match_order() {
    let (mut t, ids) = setup(&["A", "B"]);
    let sid = create_session(&mut t, &ids, None).unwrap();
    let ms = matches_of(&t, sid);
    score(&mut t, ms[0], 11, 5);

    let view = session_view(&t, sid).unwrap();
    assert!(!view.completed);
    let order: Vec<MatchId> = view.matches.iter().map(|m| m.id).collect();
    assert_eq!(order, ms);
    let first = &view.matches[0];
    assert!(first.is_completed);
    assert_eq!(first.player_1_name, "A");
    assert_eq!(first.winner_name.as_deref(), Some("A"));
    assert_eq!(first.player_1_rating_change, Some(16.0));
    assert!(!view.matches[1].is_completed);
}
