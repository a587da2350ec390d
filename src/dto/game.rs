use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::GameListItemEntity,
    dto::{format_system_time, validation::validate_player_id},
    state::game::{Game, Player, PlayerScore},
};

/// Payload used to create a brand-new game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateGameRequest {
    /// Display title of the game.
    #[validate(length(min = 1, message = "game title must not be empty"))]
    pub title: String,
    /// Account id of the creating player.
    #[validate(custom(function = validate_player_id))]
    pub creator: String,
    /// Registered players joining the game.
    #[validate(nested)]
    pub players: Vec<PlayerInput>,
    /// Display names of guest players; the server mints their ids.
    #[serde(default)]
    pub guests: Vec<String>,
}

/// Incoming registered-player definition for game creation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerInput {
    /// Account id of the player.
    pub id: String,
    /// Display name shown on the scoreboard.
    pub name: String,
}

impl Validate for PlayerInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_player_id(&self.id) {
            errors.add("id", e);
        }

        if self.name.trim().is_empty() {
            let mut err = validator::ValidationError::new("player_name_empty");
            err.message = Some("player name must not be empty".into());
            errors.add("name", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Full game projection returned once a game has been created or fetched.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummary {
    /// Identifier of the game.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Account id of the creator.
    pub creator: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
    /// Scoreboard in roster order.
    pub players: Vec<PlayerSummary>,
    /// Round currently being played.
    pub current_round: u8,
    /// Whether the game has finished.
    pub closed: bool,
}

/// Public projection of one player's scoreboard row.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    /// Roster id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether this entry is a guest.
    pub guest: bool,
    /// Running total across recorded rounds.
    pub total: i32,
    /// Recorded rounds in ascending round order.
    pub rounds: Vec<RoundScoreSummary>,
}

/// One recorded round inside a scoreboard row.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct RoundScoreSummary {
    /// Round number.
    pub round: u8,
    /// Points awarded.
    pub points: i32,
    /// Encoded per-gate disc counts, when recorded.
    pub gates: Option<String>,
}

/// Condensed game projection returned by listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameListItem {
    /// Identifier of the game.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Account id of the creator.
    pub creator: String,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Last update timestamp (RFC 3339).
    pub updated_at: String,
    /// Roster names.
    pub players: Vec<PlayerBrief>,
    /// Round currently being played.
    pub current_round: u8,
    /// Whether the game has finished.
    pub closed: bool,
}

/// Brief roster projection used in listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerBrief {
    /// Roster id.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl From<(Player, PlayerScore)> for PlayerSummary {
    fn from((player, score): (Player, PlayerScore)) -> Self {
        Self {
            id: player.id,
            name: player.name,
            guest: player.guest,
            total: score.total,
            rounds: score
                .rounds
                .into_iter()
                .map(|(round, entry)| RoundScoreSummary {
                    round,
                    points: entry.points,
                    gates: entry.gates,
                })
                .collect(),
        }
    }
}

impl From<Game> for GameSummary {
    fn from(mut game: Game) -> Self {
        let roster = std::mem::take(&mut game.players);
        let players = roster
            .into_iter()
            .map(|player| {
                let score = game.scores.shift_remove(&player.id).unwrap_or_default();
                (player, score).into()
            })
            .collect();

        Self {
            id: game.id.to_string(),
            title: game.title,
            creator: game.creator,
            created_at: format_system_time(game.created_at),
            updated_at: format_system_time(game.updated_at),
            players,
            current_round: game.current_round,
            closed: game.closed,
        }
    }
}

impl From<GameListItemEntity> for GameListItem {
    fn from(entity: GameListItemEntity) -> Self {
        Self {
            id: entity.id.to_string(),
            title: entity.title,
            creator: entity.creator,
            created_at: format_system_time(entity.created_at),
            updated_at: format_system_time(entity.updated_at),
            players: entity
                .players
                .into_iter()
                .map(|player| PlayerBrief {
                    id: player.id,
                    name: player.name,
                })
                .collect(),
            current_round: entity.current_round,
            closed: entity.closed,
        }
    }
}
