use std::time::SystemTime;

use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::RoundEntity,
    dto::round::{RevertRoundResponse, SubmitRoundRequest, SubmitRoundResponse},
    error::ServiceError,
    services::{game_service, sse_events},
    state::{
        SharedState,
        scoring::{self, GateCounts},
    },
};

/// Record one player's round score and advance the game when the roster is
/// complete.
///
/// The whole load-mutate-store cycle runs under the game's gate so concurrent
/// submissions for the same game are serialized; the version guard on the
/// update catches writers outside this process.
pub async fn submit_round(
    state: &SharedState,
    game_id: Uuid,
    request: SubmitRoundRequest,
) -> Result<SubmitRoundResponse, ServiceError> {
    let SubmitRoundRequest {
        player_id,
        round,
        gates,
    } = request;

    ensure_disc_budget(state, gates)?;

    let store = state.require_game_store().await?;
    let gate = state.game_gate(game_id);
    let _guard = gate.lock().await;

    let mut game = game_service::load_game(&store, game_id).await?;

    let points = scoring::round_score(gates);
    let encoded = scoring::encode_gates(gates);
    game.record_round(&player_id, round, points, Some(encoded.clone()))?;

    let expected_version = game.version;
    game.version += 1;
    game.updated_at = SystemTime::now();
    store
        .update_game(game.clone().into(), expected_version)
        .await?;

    let record = RoundEntity {
        id: Uuid::new_v4(),
        game_id,
        player_id: player_id.clone(),
        round,
        gates,
        points,
        created_at: SystemTime::now(),
    };
    if let Err(err) = store.insert_round(record).await {
        // The game document is authoritative for totals; a missing history
        // record only degrades the round log.
        warn!(%game_id, %player_id, round, error = %err, "failed to append round history record");
    }

    sse_events::broadcast_round_submitted(state, &game, &player_id, round, points);
    if game.closed {
        sse_events::broadcast_game_closed(state, &game);
    }

    let total = game
        .scores
        .get(&player_id)
        .map(|score| score.total)
        .unwrap_or(points);

    Ok(SubmitRoundResponse {
        player_id,
        round,
        points,
        gates: encoded,
        total,
        current_round: game.current_round,
        closed: game.closed,
    })
}

/// Erase one player's recorded round, rolling the game back when play had
/// advanced past it.
pub async fn revert_round(
    state: &SharedState,
    game_id: Uuid,
    player_id: String,
    round: u8,
) -> Result<RevertRoundResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let gate = state.game_gate(game_id);
    let _guard = gate.lock().await;

    let mut game = game_service::load_game(&store, game_id).await?;
    let removed = game.erase_round(&player_id, round)?;

    let expected_version = game.version;
    game.version += 1;
    game.updated_at = SystemTime::now();
    store
        .update_game(game.clone().into(), expected_version)
        .await?;

    match store
        .delete_round(game_id, player_id.clone(), round)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            warn!(%game_id, %player_id, round, "no round history record found to delete");
        }
        Err(err) => {
            warn!(%game_id, %player_id, round, error = %err, "failed to delete round history record");
        }
    }

    sse_events::broadcast_round_reverted(state, &game, &player_id, round, removed.points);

    let total = game
        .scores
        .get(&player_id)
        .map(|score| score.total)
        .unwrap_or(0);

    Ok(RevertRoundResponse {
        player_id,
        round,
        points_removed: removed.points,
        total,
        current_round: game.current_round,
        closed: game.closed,
    })
}

fn ensure_disc_budget(state: &SharedState, gates: GateCounts) -> Result<(), ServiceError> {
    let budget = state.config().disc_budget();
    let thrown = scoring::disc_count(gates);
    if thrown > budget {
        return Err(ServiceError::InvalidInput(format!(
            "a round uses at most {budget} discs (got {thrown})"
        )));
    }
    Ok(())
}
