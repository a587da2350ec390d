use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::game::{CreateGameRequest, GameListItem, GameSummary},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes handling game creation and retrieval.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}", get(fetch_game))
}

/// Create a fresh game and persist it.
#[utoipa::path(
    post,
    path = "/games",
    tag = "game",
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created", body = GameSummary)
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<CreateGameRequest>>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = game_service::create_game(&state, payload).await?;
    Ok(Json(summary))
}

/// List all stored games.
#[utoipa::path(
    get,
    path = "/games",
    tag = "game",
    responses(
        (status = 200, description = "Stored games", body = [GameListItem])
    )
)]
pub async fn list_games(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameListItem>>, AppError> {
    let items = game_service::list_games(&state).await?;
    Ok(Json(items))
}

/// Fetch a single game with its scoreboard.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "game",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game found", body = GameSummary),
        (status = 404, description = "Unknown game id")
    )
)]
pub async fn fetch_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameSummary>, AppError> {
    let summary = game_service::fetch_game(&state, id).await?;
    Ok(Json(summary))
}
