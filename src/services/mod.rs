/// OpenAPI documentation generation.
pub mod documentation;
/// Game creation and retrieval.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Round submission and reversion.
pub mod round_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Storage connectivity supervision.
pub mod storage_supervisor;
