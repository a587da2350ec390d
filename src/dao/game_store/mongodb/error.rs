use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("missing environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save game `{id}`")]
    SaveGame {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load game `{id}`")]
    LoadGame {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list games")]
    ListGames {
        #[source]
        source: MongoError,
    },
    #[error("failed to save a round of game `{game_id}`")]
    SaveRound {
        game_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete a round of game `{game_id}`")]
    DeleteRound {
        game_id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list rounds of game `{game_id}`")]
    ListRounds {
        game_id: Uuid,
        #[source]
        source: MongoError,
    },
}
