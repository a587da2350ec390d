use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::RoundEntity,
    dto::{format_system_time, validation::validate_player_id},
    state::{game::TOTAL_ROUNDS, scoring::GateCounts},
};

/// Payload submitting one player's round to a game.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitRoundRequest {
    /// Roster id of the submitting player.
    #[validate(custom(function = validate_player_id))]
    pub player_id: String,
    /// Round number being submitted; must match the game's current round.
    #[validate(range(min = 1, max = 5, message = "round number must be between 1 and 5"))]
    pub round: u8,
    /// Disc counts per gate, left to right.
    #[schema(value_type = Vec<u8>, min_items = 4, max_items = 4)]
    pub gates: GateCounts,
}

/// Outcome of a round submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitRoundResponse {
    /// Roster id of the submitting player.
    pub player_id: String,
    /// Round that was recorded.
    pub round: u8,
    /// Points awarded for the round.
    pub points: i32,
    /// Encoded per-gate disc counts.
    pub gates: String,
    /// Player's new running total.
    pub total: i32,
    /// Round the game is on after the submission.
    pub current_round: u8,
    /// Whether the submission closed the game.
    pub closed: bool,
}

/// Outcome of a round reversion.
#[derive(Debug, Serialize, ToSchema)]
pub struct RevertRoundResponse {
    /// Roster id of the player whose round was reverted.
    pub player_id: String,
    /// Round that was erased.
    pub round: u8,
    /// Points subtracted from the running total.
    pub points_removed: i32,
    /// Player's restored running total.
    pub total: i32,
    /// Round the game is on after the reversion.
    pub current_round: u8,
    /// Whether the game is closed after the reversion.
    pub closed: bool,
}

/// One history record from a game's round log.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoundHistoryItem {
    /// Roster id of the submitting player.
    pub player_id: String,
    /// Round number.
    pub round: u8,
    /// Raw disc counts per gate, left to right.
    #[schema(value_type = Vec<u8>)]
    pub gates: GateCounts,
    /// Points derived at submission time.
    pub points: i32,
    /// Submission timestamp (RFC 3339).
    pub created_at: String,
}

impl From<RoundEntity> for RoundHistoryItem {
    fn from(entity: RoundEntity) -> Self {
        Self {
            player_id: entity.player_id,
            round: entity.round,
            gates: entity.gates,
            points: entity.points,
            created_at: format_system_time(entity.created_at),
        }
    }
}

// The range attribute above spells the bound out; keep them in sync.
const _: () = assert!(TOTAL_ROUNDS == 5);
