pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{GameEntity, GameListItemEntity, RoundEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for games and their round history.
pub trait GameStore: Send + Sync {
    /// Persist a freshly created game document.
    fn insert_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Replace a game document, guarded by the version it was loaded at.
    ///
    /// Fails with [`crate::dao::storage::StorageError::Conflict`] when another
    /// writer updated the document since it was read.
    fn update_game(
        &self,
        game: GameEntity,
        expected_version: u64,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a game document by id.
    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// List all stored games as summary projections.
    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameListItemEntity>>>;
    /// Append a round history record.
    fn insert_round(&self, round: RoundEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// List all round records for a game.
    fn list_rounds(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>>;
    /// Delete the round record for a (game, player, round) triple, reporting
    /// whether a record existed.
    fn delete_round(
        &self,
        game_id: Uuid,
        player_id: String,
        round: u8,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    /// Verify the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish the backend connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
