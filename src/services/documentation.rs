use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Sjoelen Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::create_game,
        crate::routes::game::list_games,
        crate::routes::game::fetch_game,
        crate::routes::round::list_rounds,
        crate::routes::round::submit_round,
        crate::routes::round::revert_round,
        crate::routes::sse::game_events,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::PlayerInput,
            crate::dto::game::GameSummary,
            crate::dto::game::PlayerSummary,
            crate::dto::game::RoundScoreSummary,
            crate::dto::game::GameListItem,
            crate::dto::game::PlayerBrief,
            crate::dto::round::SubmitRoundRequest,
            crate::dto::round::SubmitRoundResponse,
            crate::dto::round::RevertRoundResponse,
            crate::dto::round::RoundHistoryItem,
            crate::dto::sse::Handshake,
            crate::dto::sse::RoundSubmittedEvent,
            crate::dto::sse::RoundRevertedEvent,
            crate::dto::sse::GameClosedEvent,
            crate::dto::sse::FinalStanding,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Game creation and retrieval"),
        (name = "round", description = "Round submission and reversion"),
        (name = "sse", description = "Server-sent events streams"),
    )
)]
pub struct ApiDoc;
