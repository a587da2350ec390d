use crate::{
    dto::sse::{
        FinalStanding, GameClosedEvent, RoundRevertedEvent, RoundSubmittedEvent, ServerEvent,
    },
    state::{SharedState, game::Game},
};

/// Notify a game's subscribers that a round score was recorded.
pub fn broadcast_round_submitted(
    state: &SharedState,
    game: &Game,
    player_id: &str,
    round: u8,
    points: i32,
) {
    let total = game
        .scores
        .get(player_id)
        .map(|score| score.total)
        .unwrap_or(points);

    let payload = RoundSubmittedEvent {
        player_id: player_id.to_owned(),
        round,
        points,
        total,
        current_round: game.current_round,
        closed: game.closed,
    };

    if let Ok(event) = ServerEvent::json(Some("round_submitted".to_string()), &payload) {
        state.channels().broadcast(game.id, event);
    }
}

/// Notify a game's subscribers that a round score was reverted.
pub fn broadcast_round_reverted(
    state: &SharedState,
    game: &Game,
    player_id: &str,
    round: u8,
    points_removed: i32,
) {
    let total = game
        .scores
        .get(player_id)
        .map(|score| score.total)
        .unwrap_or(0);

    let payload = RoundRevertedEvent {
        player_id: player_id.to_owned(),
        round,
        points_removed,
        total,
        current_round: game.current_round,
        closed: game.closed,
    };

    if let Ok(event) = ServerEvent::json(Some("round_reverted".to_string()), &payload) {
        state.channels().broadcast(game.id, event);
    }
}

/// Announce the final standings once the last round is in.
pub fn broadcast_game_closed(state: &SharedState, game: &Game) {
    let standings = game
        .players
        .iter()
        .map(|player| FinalStanding {
            player_id: player.id.clone(),
            name: player.name.clone(),
            total: game
                .scores
                .get(&player.id)
                .map(|score| score.total)
                .unwrap_or(0),
        })
        .collect();

    let payload = GameClosedEvent { standings };
    if let Ok(event) = ServerEvent::json(Some("game_closed".to_string()), &payload) {
        state.channels().broadcast(game.id, event);
    }
}
