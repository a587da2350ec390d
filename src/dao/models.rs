use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::state::scoring::GateCounts;

/// Roster entry stored inside a game document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Player identifier. Registered players carry their account id; guests
    /// carry a server-minted id scoped to this game.
    pub id: String,
    /// Display name chosen for the player.
    pub name: String,
    /// Whether this entry is a guest without a backing account.
    pub guest: bool,
}

/// One recorded round inside a player's score record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundScoreEntity {
    /// Round number this score belongs to (1-based).
    pub round: u8,
    /// Points awarded for the round.
    pub points: i32,
    /// Encoded per-gate disc counts kept for display (e.g. `7/7/9/7`).
    pub gates: Option<String>,
}

/// Per-player score record owned by the parent game document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerScoreEntity {
    /// Roster id this record belongs to.
    pub player_id: String,
    /// Running total across all recorded rounds.
    pub total: i32,
    /// Recorded rounds, ordered by round number.
    pub rounds: Vec<RoundScoreEntity>,
}

/// Aggregate game entity persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Display title of the game.
    pub title: String,
    /// Identifier of the account that created the game.
    pub creator: String,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the game entity was updated.
    pub updated_at: SystemTime,
    /// Participating players in roster order.
    pub players: Vec<PlayerEntity>,
    /// Round currently being played (1 through 5).
    pub current_round: u8,
    /// Whether every player has submitted the final round.
    pub closed: bool,
    /// Per-player score records, in roster order.
    pub scores: Vec<PlayerScoreEntity>,
    /// Version counter used for conditional updates.
    pub version: u64,
}

/// Append-only history record for a single submitted round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundEntity {
    /// Primary key of the record.
    pub id: Uuid,
    /// Game this round belongs to.
    pub game_id: Uuid,
    /// Roster id of the submitting player.
    pub player_id: String,
    /// Round number (1 through 5).
    pub round: u8,
    /// Raw disc counts per gate, left to right.
    pub gates: GateCounts,
    /// Points derived from the gate counts at submission time.
    pub points: i32,
    /// Submission timestamp.
    pub created_at: SystemTime,
}

/// Brief roster projection used in game listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerBriefEntity {
    /// Roster id.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Game list item entity (subset of [`GameEntity`]) returned by listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameListItemEntity {
    /// Primary key of the game.
    pub id: Uuid,
    /// Display title of the game.
    pub title: String,
    /// Identifier of the account that created the game.
    pub creator: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last update timestamp.
    pub updated_at: SystemTime,
    /// Participating players.
    pub players: Vec<PlayerBriefEntity>,
    /// Round currently being played.
    pub current_round: u8,
    /// Whether the game has finished.
    pub closed: bool,
}

impl From<PlayerEntity> for PlayerBriefEntity {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
        }
    }
}

impl From<GameEntity> for GameListItemEntity {
    fn from(entity: GameEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            creator: entity.creator,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            players: entity.players.into_iter().map(Into::into).collect(),
            current_round: entity.current_round,
            closed: entity.closed,
        }
    }
}
