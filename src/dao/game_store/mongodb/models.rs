use mongodb::bson::{Binary, DateTime, Document, doc, spec::BinarySubtype};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{GameEntity, PlayerEntity, PlayerScoreEntity, RoundEntity};
use crate::state::scoring::GateCounts;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    title: String,
    creator: String,
    created_at: DateTime,
    updated_at: DateTime,
    players: Vec<PlayerEntity>,
    current_round: u8,
    closed: bool,
    scores: Vec<PlayerScoreEntity>,
    // BSON has no unsigned 64-bit integer type.
    version: i64,
}

impl From<GameEntity> for MongoGameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            creator: value.creator,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
            players: value.players,
            current_round: value.current_round,
            closed: value.closed,
            scores: value.scores,
            version: value.version as i64,
        }
    }
}

impl From<MongoGameDocument> for GameEntity {
    fn from(value: MongoGameDocument) -> Self {
        Self {
            id: value.id,
            title: value.title,
            creator: value.creator,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
            players: value.players,
            current_round: value.current_round,
            closed: value.closed,
            scores: value.scores,
            version: value.version as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRoundDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    game_id: Uuid,
    player_id: String,
    round: u8,
    gates: GateCounts,
    points: i32,
    created_at: DateTime,
}

impl From<RoundEntity> for MongoRoundDocument {
    fn from(value: RoundEntity) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            player_id: value.player_id,
            round: value.round,
            gates: value.gates,
            points: value.points,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoRoundDocument> for RoundEntity {
    fn from(value: MongoRoundDocument) -> Self {
        Self {
            id: value.id,
            game_id: value.game_id,
            player_id: value.player_id,
            round: value.round,
            gates: value.gates,
            points: value.points,
            created_at: value.created_at.to_system_time(),
        }
    }
}

pub fn uuid_as_binary(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Uuid,
        bytes: id.into_bytes().to_vec(),
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": uuid_as_binary(id)}
}

/// Filter selecting one (game, player, round) history record.
pub fn round_key(game_id: Uuid, player_id: &str, round: u8) -> Document {
    doc! {
        "game_id": uuid_as_binary(game_id),
        "player_id": player_id,
        "round": i32::from(round),
    }
}
