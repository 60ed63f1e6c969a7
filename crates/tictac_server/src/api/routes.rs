//! REST handlers for `/api`.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use derive_new::new;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tictac_engine::BoardSnapshot;
use tracing::{debug, instrument};

use crate::api::{ApiError, AppState};
use crate::game::Game;
use crate::store::StoreError;

/// Body of `POST /api/games`.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
pub struct CreateGameRequest {
    player1: Option<String>,
    player2: Option<String>,
}

/// Body of `POST /api/games/{id}/rounds`.
#[derive(Debug, Clone, Serialize, Deserialize, new)]
pub struct AppendRoundRequest {
    winner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<BoardSnapshot>,
}

/// Routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/games", get(list_games).post(create_game))
        .route("/api/games/{id}", get(get_game))
        .route("/api/games/{id}/rounds", post(append_round))
        .route("/api/games/{id}/stop", post(stop_game))
}

/// Runs a synchronous store call on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))?
        .map_err(ApiError::from)
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

#[instrument(skip(state))]
async fn list_games(State(state): State<AppState>) -> Result<Json<Vec<Game>>, ApiError> {
    let store = state.store.clone();
    let games = blocking(move || store.list_games()).await?;
    debug!(count = games.len(), "Listing games");
    Ok(Json(games))
}

#[instrument(skip(state, payload))]
async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    let Json(request) = payload?;
    let store = state.store.clone();
    let game = blocking(move || {
        store.create_game(request.player1.as_deref(), request.player2.as_deref())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(game)))
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let store = state.store.clone();
    blocking(move || store.get_game(&id)).await.map(Json)
}

#[instrument(skip(state, payload))]
async fn append_round(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AppendRoundRequest>, JsonRejection>,
) -> Result<Json<Game>, ApiError> {
    let Json(request) = payload?;
    let store = state.store.clone();
    blocking(move || store.append_round(&id, request.winner.as_deref(), request.board))
        .await
        .map(Json)
}

#[instrument(skip(state))]
async fn stop_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let store = state.store.clone();
    blocking(move || store.stop_game(&id)).await.map(Json)
}
