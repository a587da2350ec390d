use std::{collections::HashSet, sync::Arc};

use uuid::Uuid;

use crate::{
    dao::game_store::GameStore,
    dto::{
        game::{CreateGameRequest, GameListItem, GameSummary},
        round::RoundHistoryItem,
    },
    error::ServiceError,
    state::{
        SharedState,
        game::{Game, Player},
    },
};

/// Create a fresh game and persist it.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<GameSummary, ServiceError> {
    let game = build_game(state, request)?;

    let store = state.require_game_store().await?;
    store.insert_game(game.clone().into()).await?;

    Ok(game.into())
}

/// Fetch a single game with its scoreboard.
pub async fn fetch_game(state: &SharedState, id: Uuid) -> Result<GameSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let game = load_game(&store, id).await?;
    Ok(game.into())
}

/// List all stored games.
pub async fn list_games(state: &SharedState) -> Result<Vec<GameListItem>, ServiceError> {
    let store = state.require_game_store().await?;
    let items = store.list_games().await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// List the round history of a game in submission order.
pub async fn list_rounds(
    state: &SharedState,
    id: Uuid,
) -> Result<Vec<RoundHistoryItem>, ServiceError> {
    let store = state.require_game_store().await?;
    // Look the game up first so an unknown id fails with "not found" rather
    // than an empty history.
    load_game(&store, id).await?;
    let rounds = store.list_rounds(id).await?;
    Ok(rounds.into_iter().map(Into::into).collect())
}

/// Load a game aggregate from storage, failing when the id is unknown.
pub(crate) async fn load_game(
    store: &Arc<dyn GameStore>,
    id: Uuid,
) -> Result<Game, ServiceError> {
    let Some(entity) = store.find_game(id).await? else {
        return Err(ServiceError::NotFound(format!("game `{id}` not found")));
    };
    Ok(entity.into())
}

fn build_game(state: &SharedState, request: CreateGameRequest) -> Result<Game, ServiceError> {
    let CreateGameRequest {
        title,
        creator,
        players,
        guests,
    } = request;

    let mut roster = Vec::with_capacity(players.len() + guests.len());
    let mut seen_ids = HashSet::new();

    for player in players {
        if !seen_ids.insert(player.id.clone()) {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate player id `{}` detected",
                player.id
            )));
        }

        roster.push(Player {
            id: player.id,
            name: player.name,
            guest: false,
        });
    }

    for name in guests {
        if name.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "guest name must not be empty".into(),
            ));
        }

        // Guests have no backing account; mint an id scoped to this game.
        roster.push(Player {
            id: Uuid::new_v4().simple().to_string(),
            name,
            guest: true,
        });
    }

    if roster.is_empty() {
        return Err(ServiceError::InvalidInput(
            "a game requires at least one player".into(),
        ));
    }

    let max_players = state.config().max_players();
    if roster.len() > max_players {
        return Err(ServiceError::InvalidInput(format!(
            "a game accepts at most {max_players} players (got {})",
            roster.len()
        )));
    }

    Ok(Game::new(title, creator, roster))
}
