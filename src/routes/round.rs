use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::round::{RevertRoundResponse, RoundHistoryItem, SubmitRoundRequest, SubmitRoundResponse},
    error::AppError,
    services::{game_service, round_service},
    state::SharedState,
};

/// Routes handling round submission, history, and reversion.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games/{id}/rounds", post(submit_round).get(list_rounds))
        .route(
            "/games/{id}/players/{player_id}/rounds/{round}",
            delete(revert_round),
        )
}

/// List the round history of a game in submission order.
#[utoipa::path(
    get,
    path = "/games/{id}/rounds",
    tag = "round",
    params(("id" = String, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Round history", body = [RoundHistoryItem]),
        (status = 404, description = "Unknown game id")
    )
)]
pub async fn list_rounds(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RoundHistoryItem>>, AppError> {
    let rounds = game_service::list_rounds(&state, id).await?;
    Ok(Json(rounds))
}

/// Submit one player's round score to a game.
#[utoipa::path(
    post,
    path = "/games/{id}/rounds",
    tag = "round",
    params(("id" = String, Path, description = "Identifier of the game")),
    request_body = SubmitRoundRequest,
    responses(
        (status = 200, description = "Round recorded", body = SubmitRoundResponse),
        (status = 404, description = "Unknown game id"),
        (status = 409, description = "Game closed, wrong round number, or duplicate submission")
    )
)]
pub async fn submit_round(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<SubmitRoundRequest>>,
) -> Result<Json<SubmitRoundResponse>, AppError> {
    let outcome = round_service::submit_round(&state, id, payload).await?;
    Ok(Json(outcome))
}

/// Revert one player's recorded round.
#[utoipa::path(
    delete,
    path = "/games/{id}/players/{player_id}/rounds/{round}",
    tag = "round",
    params(
        ("id" = String, Path, description = "Identifier of the game"),
        ("player_id" = String, Path, description = "Roster id of the player"),
        ("round" = u8, Path, description = "Round number to revert"),
    ),
    responses(
        (status = 200, description = "Round reverted", body = RevertRoundResponse),
        (status = 404, description = "Unknown game, player, or round")
    )
)]
pub async fn revert_round(
    State(state): State<SharedState>,
    Path((id, player_id, round)): Path<(Uuid, String, u8)>,
) -> Result<Json<RevertRoundResponse>, AppError> {
    let outcome = round_service::revert_round(&state, id, player_id, round).await?;
    Ok(Json(outcome))
}
