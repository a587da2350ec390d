use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Client, Collection, Database, bson::doc, options::IndexOptions};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoGameDocument, MongoRoundDocument, doc_id, round_key, uuid_as_binary},
};
use crate::dao::{
    game_store::GameStore,
    models::{GameEntity, GameListItemEntity, RoundEntity},
    storage::{StorageError, StorageResult},
};

const GAME_COLLECTION_NAME: &str = "games";
const ROUND_COLLECTION_NAME: &str = "rounds";

/// MongoDB-backed [`GameStore`] implementation.
#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoGameStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = {
            let guard = self.inner.state.read().await;
            guard.database.clone()
        };

        let games = database.collection::<MongoGameDocument>(GAME_COLLECTION_NAME);
        let creator_index = mongodb::IndexModel::builder()
            .keys(doc! {"creator": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("game_creator_idx".to_owned()))
                    .build(),
            )
            .build();

        games
            .create_index(creator_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: GAME_COLLECTION_NAME,
                index: "creator",
                source,
            })?;

        // One record per (game, player, round); this is the natural uniqueness
        // key for submissions and the lookup path for reverts.
        let rounds = database.collection::<MongoRoundDocument>(ROUND_COLLECTION_NAME);
        let round_index = mongodb::IndexModel::builder()
            .keys(doc! {"game_id": 1, "player_id": 1, "round": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("round_unique_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        rounds
            .create_index(round_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ROUND_COLLECTION_NAME,
                index: "game_id,player_id,round",
                source,
            })?;

        Ok(())
    }

    async fn game_collection(&self) -> Collection<MongoGameDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
    }

    async fn round_collection(&self) -> Collection<MongoRoundDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoRoundDocument>(ROUND_COLLECTION_NAME)
    }

    async fn insert_game(&self, game: GameEntity) -> MongoResult<()> {
        let id = game.id;
        let document: MongoGameDocument = game.into();
        let collection = self.game_collection().await;
        collection
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveGame { id, source })?;
        Ok(())
    }

    /// Replace the game document only when the stored version still matches.
    /// Returns whether a document was matched.
    async fn update_game(&self, game: GameEntity, expected_version: u64) -> MongoResult<bool> {
        let id = game.id;
        let document: MongoGameDocument = game.into();
        let filter = doc! {
            "_id": uuid_as_binary(id),
            "version": expected_version as i64,
        };

        let collection = self.game_collection().await;
        let result = collection
            .replace_one(filter, &document)
            .await
            .map_err(|source| MongoDaoError::SaveGame { id, source })?;

        Ok(result.matched_count > 0)
    }

    async fn find_game(&self, id: Uuid) -> MongoResult<Option<GameEntity>> {
        let collection = self.game_collection().await;
        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadGame { id, source })?;
        Ok(document.map(Into::into))
    }

    async fn list_games(&self) -> MongoResult<Vec<GameListItemEntity>> {
        let collection = self.game_collection().await;
        let documents: Vec<MongoGameDocument> = collection
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGames { source })?;

        Ok(documents
            .into_iter()
            .map(|document| {
                let entity: GameEntity = document.into();
                entity.into()
            })
            .collect())
    }

    async fn insert_round(&self, round: RoundEntity) -> MongoResult<()> {
        let game_id = round.game_id;
        let document: MongoRoundDocument = round.into();
        let collection = self.round_collection().await;
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveRound { game_id, source })?;
        Ok(())
    }

    async fn list_rounds(&self, game_id: Uuid) -> MongoResult<Vec<RoundEntity>> {
        let collection = self.round_collection().await;
        let documents: Vec<MongoRoundDocument> = collection
            .find(doc! {"game_id": uuid_as_binary(game_id)})
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListRounds { game_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListRounds { game_id, source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_round(&self, game_id: Uuid, player_id: &str, round: u8) -> MongoResult<bool> {
        let collection = self.round_collection().await;
        let result = collection
            .delete_one(round_key(game_id, player_id, round))
            .await
            .map_err(|source| MongoDaoError::DeleteRound { game_id, source })?;
        Ok(result.deleted_count > 0)
    }
}

impl GameStore for MongoGameStore {
    fn insert_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_game(game).await.map_err(Into::into) })
    }

    fn update_game(
        &self,
        game: GameEntity,
        expected_version: u64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = game.id;
            let matched = store.update_game(game, expected_version).await?;
            if matched {
                Ok(())
            } else {
                Err(StorageError::conflict(format!(
                    "game `{id}` was updated concurrently (expected version {expected_version})"
                )))
            }
        })
    }

    fn find_game(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await.map_err(Into::into) })
    }

    fn list_games(&self) -> BoxFuture<'static, StorageResult<Vec<GameListItemEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games().await.map_err(Into::into) })
    }

    fn insert_round(&self, round: RoundEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_round(round).await.map_err(Into::into) })
    }

    fn list_rounds(&self, game_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<RoundEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_rounds(game_id).await.map_err(Into::into) })
    }

    fn delete_round(
        &self,
        game_id: Uuid,
        player_id: String,
        round: u8,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete_round(game_id, &player_id, round)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
