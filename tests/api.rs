//! HTTP tests: drive the REST API end to end against an in-memory database.

use actix_web::{
    http::{header::ContentType, StatusCode},
    test,
    web::Data,
    App,
};
use serde_json::{json, Value};
use squash_tracker::{api, db, Config};

fn state(config: &Config) -> Data<api::AppState> {
    let pool = db::create_memory_pool().unwrap();
    Data::new(api::AppState::open(pool, config).unwrap())
}

/// Send a request and return the status with the JSON body (Null when empty).
macro_rules! call {
    ($app:expr, $req:expr $(,)?) => {{
        let resp = test::call_service($app, $req.to_request()).await;
        let status: StatusCode = resp.status();
        let body = test::read_body(resp).await;
        let value: Value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }};
}

fn post(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post().uri(uri).set_json(body)
}

#[actix_web::test]
async fn full_session_flow() {
    let app = test::init_service(
        App::new()
            .app_data(state(&Config::default()))
            .configure(api::configure),
    )
    .await;

    let (status, health) = call!(&app, test::TestRequest::get().uri("/api/health"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["database"], "connected");

    let (status, a) = call!(&app, post("/api/players", json!({ "name": "Miklas" })));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(a["rating"], 1200.0);
    let (_, b) = call!(&app, post("/api/players", json!({ "name": "Jens" })));
    let (status, dup) = call!(&app, post("/api/players", json!({ "name": "jens" })));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(dup["kind"], "validation");

    let (status, session) = call!(
        &app,
        post("/api/sessions", json!({ "player_ids": [a["id"], b["id"]] })),
    );
    assert_eq!(status, StatusCode::CREATED);
    let sid = session["id"].as_str().unwrap().to_string();
    let matches = session["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 5);
    let mid = matches[0]["id"].as_str().unwrap().to_string();

    let (status, err) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/matches/{mid}"))
            .set_json(json!({ "player_1_score": 11, "player_2_score": 10 })),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "must win by 2");

    let (status, scored) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/matches/{mid}"))
            .set_json(json!({ "player_1_score": 11, "player_2_score": 9 })),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scored["winner_name"], "Miklas");
    assert_eq!(scored["player_1_rating_change"], 16.0);

    let (_, board) = call!(&app, test::TestRequest::get().uri("/api/leaderboard"));
    assert_eq!(board[0]["name"], "Miklas");
    assert_eq!(board[0]["rating"], 1216.0);
    assert_eq!(board[1]["rating"], 1184.0);

    let (_, h) = call!(&app, test::TestRequest::get().uri("/api/highlights?limit=1"));
    assert_eq!(h["recent_matches"].as_array().unwrap().len(), 1);
    assert_eq!(h["stats"]["matches_today"], 1);

    let (status, done) = call!(&app, post(&format!("/api/sessions/{sid}/complete"), json!({})));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["state"], "completed");

    let (status, err) = call!(
        &app,
        test::TestRequest::delete().uri(&format!("/api/matches/{mid}")),
    );
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["kind"], "state");

    let (status, _) = call!(&app, post(&format!("/api/sessions/{sid}/reopen"), json!({})));
    assert_eq!(status, StatusCode::OK);

    let (status, added) = call!(
        &app,
        post(
            &format!("/api/sessions/{sid}/matches"),
            json!({ "player_1": b["id"], "player_2": a["id"] }),
        ),
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["is_completed"], false);

    let (status, deleted) = call!(
        &app,
        test::TestRequest::delete().uri(&format!("/api/sessions/{sid}")),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["ratings_reversed"], 1);

    let (_, board) = call!(&app, test::TestRequest::get().uri("/api/leaderboard"));
    assert_eq!(board[0]["rating"], 1200.0);
    assert_eq!(board[1]["rating"], 1200.0);
    assert_eq!(board[0]["matches_played"], 0);

    let (status, missing) = call!(
        &app,
        test::TestRequest::get().uri(&format!("/api/sessions/{sid}")),
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["kind"], "not_found");
}

#[actix_web::test]
async fn seeded_roster_and_soft_delete() {
    let config = Config {
        seed_players: vec!["Miklas".into(), "Morten".into(), "Patrick".into()],
        ..Config::default()
    };
    let app = test::init_service(App::new().app_data(state(&config)).configure(api::configure)).await;

    let (_, players) = call!(&app, test::TestRequest::get().uri("/api/players"));
    let players = players.as_array().unwrap().clone();
    assert_eq!(players.len(), 3);
    let patrick = players[2]["id"].as_str().unwrap().to_string();

    let (status, _) = call!(
        &app,
        test::TestRequest::delete().uri(&format!("/api/players/{patrick}")),
    );
    assert_eq!(status, StatusCode::OK);
    let (_, players) = call!(&app, test::TestRequest::get().uri("/api/players"));
    assert_eq!(players.as_array().unwrap().len(), 2);

    let (status, err) = call!(
        &app,
        post("/api/sessions", json!({ "player_ids": [patrick, players[0]["id"]] })),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "validation");
}

#[actix_web::test]
async fn rejected_requests_leave_state_untouched() {
    let app = test::init_service(
        App::new()
            .app_data(state(&Config::default()))
            .configure(api::configure),
    )
    .await;
    let (_, a) = call!(&app, post("/api/players", json!({ "name": "A" })));

    let (status, err) = call!(&app, post("/api/sessions", json!({ "player_ids": [a["id"]] })));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "At least 2 players are required");

    let (status, err) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/matches/{}", uuid::Uuid::new_v4()))
            .set_json(json!({ "player_1_score": "abc", "player_2_score": 11 })),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "invalid score");

    let (_, sessions) = call!(&app, test::TestRequest::get().uri("/api/sessions"));
    assert_eq!(sessions, json!([]));
}

#[actix_web::test]
async fn undecodable_requests_get_json_errors() {
    let app = test::init_service(
        App::new()
            .app_data(state(&Config::default()))
            .configure(api::configure),
    )
    .await;

    let (status, err) = call!(&app, post("/api/sessions", json!({ "player_ids": ["nope", "x"] })));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "validation");
    assert!(err["error"].as_str().unwrap().starts_with("Invalid JSON"));

    let (status, err) = call!(
        &app,
        test::TestRequest::post()
            .uri("/api/players")
            .insert_header(ContentType::json())
            .set_payload("{bad"),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "validation");

    let (status, err) = call!(&app, test::TestRequest::get().uri("/api/sessions/not-a-uuid"));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["kind"], "not_found");
    assert!(err["error"].as_str().unwrap().starts_with("Invalid id"));

    let (status, err) = call!(&app, test::TestRequest::get().uri("/api/highlights?limit=abc"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["kind"], "validation");
}

#[actix_web::test]
async fn failed_write_leaves_memory_and_disk_untouched() {
    let data = state(&Config::default());
    let app = test::init_service(App::new().app_data(data.clone()).configure(api::configure)).await;
    let (_, a) = call!(&app, post("/api/players", json!({ "name": "Miklas" })));
    let (_, b) = call!(&app, post("/api/players", json!({ "name": "Jens" })));

    {
        let conn = db::get_connection(data.pool()).unwrap();
        conn.execute_batch("DROP TABLE session_players").unwrap();
    }

    let (status, err) = call!(
        &app,
        post("/api/sessions", json!({ "player_ids": [a["id"], b["id"]] })),
    );
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err["kind"], "storage");

    let (_, sessions) = call!(&app, test::TestRequest::get().uri("/api/sessions"));
    assert_eq!(sessions, json!([]));
    let (_, players) = call!(&app, test::TestRequest::get().uri("/api/players"));
    assert_eq!(players.as_array().unwrap().len(), 2);

    let conn = db::get_connection(data.pool()).unwrap();
    let count = |table: &str| -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    };
    assert_eq!(count("sessions"), 0);
    assert_eq!(count("matches"), 0);
    assert_eq!(count("players"), 2);
}

#[actix_web::test]
async fn notes_only_updates_and_scored_match_creation() {
    let app = test::init_service(
        App::new()
            .app_data(state(&Config::default()))
            .configure(api::configure),
    )
    .await;
    let (_, a) = call!(&app, post("/api/players", json!({ "name": "Miklas" })));
    let (_, b) = call!(&app, post("/api/players", json!({ "name": "Jens" })));
    let (_, session) = call!(
        &app,
        post("/api/sessions", json!({ "player_ids": [a["id"], b["id"]] })),
    );
    let sid = session["id"].as_str().unwrap().to_string();
    let mid = session["matches"][0]["id"].as_str().unwrap().to_string();

    let (status, noted) = call!(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/matches/{mid}"))
            .set_json(json!({ "notes": "court 2" })),
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(noted["notes"], "court 2");
    assert_eq!(noted["is_completed"], false);

    let (status, added) = call!(
        &app,
        post(
            &format!("/api/sessions/{sid}/matches"),
            json!({ "player_1": b["id"], "player_2": a["id"], "player_1_score": 11, "player_2_score": 4 }),
        ),
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(added["is_completed"], true);
    assert_eq!(added["winner_name"], "Jens");

    let (_, board) = call!(&app, test::TestRequest::get().uri("/api/leaderboard"));
    assert_eq!(board[0]["name"], "Jens");
    assert_eq!(board[0]["rating"], 1216.0);

    let (status, err) = call!(
        &app,
        post(
            &format!("/api/sessions/{sid}/matches"),
            json!({ "player_1": a["id"], "player_2": b["id"], "player_1_score": 11, "player_2_score": 10 }),
        ),
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "must win by 2");
    let (_, session) = call!(&app, test::TestRequest::get().uri(&format!("/api/sessions/{sid}")));
    assert_eq!(session["matches"].as_array().unwrap().len(), 6);
}
