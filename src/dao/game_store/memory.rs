//! In-memory [`GameStore`] backend.
//!
//! Backs the integration tests and the database-less build; conditional
//! updates use the same version guard semantics as the MongoDB backend.

use std::{collections::HashMap, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{GameEntity, GameListItemEntity, RoundEntity},
    storage::{StorageError, StorageResult},
};

#[derive(Default)]
struct MemoryInner {
    games: HashMap<Uuid, GameEntity>,
    rounds: Vec<RoundEntity>,
}

/// Process-local store keeping everything behind a single async mutex.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryGameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryGameStore {
    fn insert_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut inner = store.inner.lock().await;
            inner.games.insert(game.id, game);
            Ok(())
        })
    }

    fn update_game(
        &self,
        game: GameEntity,
        expected_version: u64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut inner = store.inner.lock().await;
            let Some(stored) = inner.games.get_mut(&game.id) else {
                return Err(StorageError::conflict(format!(
                    "game `{}` no longer exists",
                    game.id
                )));
            };
            if stored.version != expected_version {
                return Err(StorageError::conflict(format!(
                    "game `{}` was updated concurrently (expected version {}, found {})",
                    game.id, expected_version, stored.version
                )));
            }
            *stored = game;
            Ok(())
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let inner = store.inner.lock().await;
            Ok(inner.games.get(&id).cloned())
        })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let inner = store.inner.lock().await;
            let mut items: Vec<GameListItemEntity> =
                inner.games.values().cloned().map(Into::into).collect();
            items.sort_by_key(|item| item.created_at);
            Ok(items)
        })
    }

    fn insert_round(&self, round: RoundEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let mut inner = store.inner.lock().await;
            inner.rounds.push(round);
            Ok(())
        })
    }

    fn list_rounds(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let inner = store.inner.lock().await;
            Ok(inner
                .rounds
                .iter()
                .filter(|record| record.game_id == game_id)
                .cloned()
                .collect())
        })
    }

    fn delete_round(
        &self,
        game_id: Uuid,
        player_id: String,
        round: u8,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let mut inner = store.inner.lock().await;
            let before = inner.rounds.len();
            inner.rounds.retain(|record| {
                !(record.game_id == game_id
                    && record.player_id == player_id
                    && record.round == round)
            });
            Ok(inner.rounds.len() < before)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    fn sample_game() -> GameEntity {
        GameEntity {
            id: Uuid::new_v4(),
            title: "huiskamertoernooi".into(),
            creator: "creator-1".into(),
            created_at: SystemTime::now(),
            updated_at: SystemTime::now(),
            players: Vec::new(),
            current_round: 1,
            closed: false,
            scores: Vec::new(),
            version: 0,
        }
    }

    #[tokio::test]
    async fn update_with_stale_version_conflicts() {
        let store = MemoryGameStore::new();
        let game = sample_game();
        store.insert_game(game.clone()).await.unwrap();

        let mut first = game.clone();
        first.version = 1;
        store.update_game(first, 0).await.unwrap();

        let mut stale = game.clone();
        stale.version = 1;
        let err = store.update_game(stale, 0).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict { .. }));
    }

    #[tokio::test]
    async fn delete_round_reports_missing_records() {
        let store = MemoryGameStore::new();
        let deleted = store
            .delete_round(Uuid::new_v4(), "nobody".into(), 1)
            .await
            .unwrap();
        assert!(!deleted);
    }
}
