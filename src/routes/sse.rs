use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;
use uuid::Uuid;

use crate::{services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/games/{id}/events",
    tag = "sse",
    params(("id" = String, Path, description = "Identifier of the game to watch")),
    responses((status = 200, description = "Per-game SSE stream", content_type = "text/event-stream", body = String))
)]
/// Stream realtime score events for one game to connected clients.
pub async fn game_events(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    info!(game_id = %id, "new game SSE connection");
    sse_service::game_stream(state, id)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/games/{id}/events", get(game_events))
}
