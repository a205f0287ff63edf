//! REST handlers. Each one maps a request onto a tracker operation and returns JSON.

use actix_web::{
    delete,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    get, post, put,
    web::{self, Data, Json, Path, Query},
    HttpRequest, HttpResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;
use crate::db;
use crate::logic::{
    add_match, complete_session, create_session, delete_session, highlights, leaderboard,
    match_view, remove_match, reopen_session, session_view, session_views, submit_score,
    update_notes,
};
use crate::models::{MatchId, Player, PlayerId, SessionId};

type State = Data<AppState>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
    database: &'static str,
}

#[derive(Deserialize)]
struct CreatePlayerBody {
    name: String,
}

#[derive(Deserialize)]
struct CreateSessionBody {
    player_ids: Vec<PlayerId>,
    #[serde(default)]
    notes: Option<String>,
}

/// Scores are optional: when either is given the new match is scored in the same request.
#[derive(Deserialize)]
struct AddMatchBody {
    player_1: PlayerId,
    player_2: PlayerId,
    #[serde(default)]
    player_1_score: Value,
    #[serde(default)]
    player_2_score: Value,
    #[serde(default)]
    notes: Option<String>,
}

/// Scores stay raw JSON so the validator can report "invalid score" itself.
#[derive(Deserialize)]
struct SubmitScoreBody {
    #[serde(default)]
    player_1_score: Value,
    #[serde(default)]
    player_2_score: Value,
    #[serde(default)]
    notes: Option<String>,
}

impl SubmitScoreBody {
    /// Notes without any score: only the notes change.
    fn notes_only(&self) -> Option<&str> {
        match (&self.player_1_score, &self.player_2_score) {
            (Value::Null, Value::Null) => self.notes.as_deref(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct HighlightsQuery {
    limit: Option<usize>,
}

/// Path segment: entity id (e.g. /api/sessions/{id})
#[derive(Deserialize)]
struct IdPath {
    id: Uuid,
}

#[derive(Serialize)]
struct Deleted {
    message: &'static str,
    ratings_reversed: usize,
}

#[get("/api/health")]
async fn api_health(state: State) -> HttpResponse {
    match db::ping(state.pool()) {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            ok: true,
            service: "squash-tracker",
            database: "connected",
        }),
        Err(e) => {
            log::error!("Health check failed: {:#}", e);
            HttpResponse::InternalServerError().json(HealthResponse {
                ok: false,
                service: "squash-tracker",
                database: "disconnected",
            })
        }
    }
}

/// Active players in roster order.
#[get("/api/players")]
async fn api_list_players(state: State) -> Result<HttpResponse, ApiError> {
    let players: Vec<Player> = state.read(|t| Ok(t.active_players().cloned().collect()))?;
    Ok(HttpResponse::Ok().json(players))
}

#[post("/api/players")]
async fn api_create_player(state: State, body: Json<CreatePlayerBody>) -> Result<HttpResponse, ApiError> {
    let player = state.mutate(|t| {
        let id = t.add_player(&body.name)?;
        t.player(id).cloned()
    })?;
    log::info!("Added player {} ({})", player.name, player.id);
    Ok(HttpResponse::Created().json(player))
}

/// Soft delete: the player leaves the roster but keeps their history.
#[delete("/api/players/{id}")]
async fn api_delete_player(state: State, path: Path<IdPath>) -> Result<HttpResponse, ApiError> {
    let id: PlayerId = path.id;
    state.mutate(|t| t.deactivate_player(id))?;
    log::info!("Deactivated player {}", id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Player deleted successfully" })))
}

/// All sessions, newest first, with their matches.
#[get("/api/sessions")]
async fn api_list_sessions(state: State) -> Result<HttpResponse, ApiError> {
    let sessions = state.read(session_views)?;
    Ok(HttpResponse::Ok().json(sessions))
}

#[post("/api/sessions")]
async fn api_create_session(state: State, body: Json<CreateSessionBody>) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let view = state.mutate(|t| {
        let id = create_session(t, &body.player_ids, body.notes)?;
        session_view(t, id)
    })?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/api/sessions/{id}")]
async fn api_get_session(state: State, path: Path<IdPath>) -> Result<HttpResponse, ApiError> {
    let id: SessionId = path.id;
    let view = state.read(|t| session_view(t, id))?;
    Ok(HttpResponse::Ok().json(view))
}

/// Delete a session and its matches, reversing every recorded result.
#[delete("/api/sessions/{id}")]
async fn api_delete_session(state: State, path: Path<IdPath>) -> Result<HttpResponse, ApiError> {
    let id: SessionId = path.id;
    let ratings_reversed = state.mutate(|t| delete_session(t, id))?;
    Ok(HttpResponse::Ok().json(Deleted {
        message: "Session and all matches deleted successfully",
        ratings_reversed,
    }))
}

#[post("/api/sessions/{id}/complete")]
async fn api_complete_session(state: State, path: Path<IdPath>) -> Result<HttpResponse, ApiError> {
    let id: SessionId = path.id;
    let view = state.mutate(|t| {
        complete_session(t, id)?;
        session_view(t, id)
    })?;
    log::info!("Session {} completed", id);
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/reopen")]
async fn api_reopen_session(state: State, path: Path<IdPath>) -> Result<HttpResponse, ApiError> {
    let id: SessionId = path.id;
    let view = state.mutate(|t| {
        reopen_session(t, id)?;
        session_view(t, id)
    })?;
    log::info!("Session {} reopened", id);
    Ok(HttpResponse::Ok().json(view))
}

/// Add a match between two players (session must be open), scored at once when scores are sent.
#[post("/api/sessions/{id}/matches")]
async fn api_add_match(state: State, path: Path<IdPath>, body: Json<AddMatchBody>) -> Result<HttpResponse, ApiError> {
    let session_id: SessionId = path.id;
    let body = body.into_inner();
    let scored = !(body.player_1_score.is_null() && body.player_2_score.is_null());
    let view = state.mutate(|t| {
        let id = add_match(t, session_id, body.player_1, body.player_2)?;
        if scored {
            submit_score(t, id, &body.player_1_score, &body.player_2_score, body.notes)?;
        } else if let Some(notes) = &body.notes {
            update_notes(t, id, notes)?;
        }
        Ok(match_view(t, t.game(id)?))
    })?;
    Ok(HttpResponse::Created().json(view))
}

/// Submit (or re-submit) a match score. Ratings move for both players.
/// A body with notes and no scores only replaces the notes.
#[put("/api/matches/{id}")]
async fn api_submit_score(state: State, path: Path<IdPath>, body: Json<SubmitScoreBody>) -> Result<HttpResponse, ApiError> {
    let id: MatchId = path.id;
    let body = body.into_inner();
    if let Some(notes) = body.notes_only() {
        let view = state.mutate(|t| {
            update_notes(t, id, notes)?;
            Ok(match_view(t, t.game(id)?))
        })?;
        log::info!("Match {} notes updated", id);
        return Ok(HttpResponse::Ok().json(view));
    }
    let view = state.mutate(|t| {
        submit_score(t, id, &body.player_1_score, &body.player_2_score, body.notes)?;
        Ok(match_view(t, t.game(id)?))
    })?;
    log::info!(
        "Match {} scored {}-{}",
        id,
        view.player_1_score.unwrap_or_default(),
        view.player_2_score.unwrap_or_default()
    );
    Ok(HttpResponse::Ok().json(view))
}

/// Delete a match (session must be open). A scored match is reversed first.
#[delete("/api/matches/{id}")]
async fn api_delete_match(state: State, path: Path<IdPath>) -> Result<HttpResponse, ApiError> {
    let id: MatchId = path.id;
    state.mutate(|t| remove_match(t, id))?;
    log::info!("Deleted match {}", id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Match deleted successfully" })))
}

#[get("/api/leaderboard")]
async fn api_leaderboard(state: State) -> Result<HttpResponse, ApiError> {
    let rows = state.read(|t| Ok(leaderboard(t)))?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/api/highlights")]
async fn api_highlights(state: State, query: Query<HighlightsQuery>) -> Result<HttpResponse, ApiError> {
    let limit = query.limit.unwrap_or(state.highlights_limit);
    let view = state.read(|t| Ok(highlights(t, limit, Utc::now())))?;
    Ok(HttpResponse::Ok().json(view))
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected body for {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid JSON: {err}")).into()
}

fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected path {}: {}", req.path(), err);
    ApiError::BadPath(format!("Invalid id: {err}")).into()
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected query for {}: {}", req.path(), err);
    ApiError::BadRequest(format!("Invalid query: {err}")).into()
}

/// Register every route on an actix `App` (used by the binary and by tests).
///
/// Extractor failures (bad JSON, malformed ids, bad query strings) answer with the same JSON
/// error body as the handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error));
    cfg.service(api_health)
        .service(favicon)
        .service(api_list_players)
        .service(api_create_player)
        .service(api_delete_player)
        .service(api_list_sessions)
        .service(api_create_session)
        .service(api_get_session)
        .service(api_delete_session)
        .service(api_complete_session)
        .service(api_reopen_session)
        .service(api_add_match)
        .service(api_submit_score)
        .service(api_delete_match)
        .service(api_leaderboard)
        .service(api_highlights);
}
