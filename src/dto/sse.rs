use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// Optional SSE event name.
    pub event: Option<String>,
    /// Serialized data field.
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already-serialized data payload.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Identifier of the game stream that was joined.
    pub game_id: String,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    /// Whether storage is currently unavailable.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a player's round score has been recorded.
pub struct RoundSubmittedEvent {
    /// Roster id of the submitting player.
    pub player_id: String,
    /// Round that was recorded.
    pub round: u8,
    /// Points awarded for the round.
    pub points: i32,
    /// Player's new running total.
    pub total: i32,
    /// Round the game is on after the submission.
    pub current_round: u8,
    /// Whether the submission closed the game.
    pub closed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a player's round score has been reverted.
pub struct RoundRevertedEvent {
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

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast once when every player has submitted the final round.
pub struct GameClosedEvent {
    /// Final standings in roster order.
    pub standings: Vec<FinalStanding>,
}

#[derive(Debug, Serialize, ToSchema)]
/// One row of the final standings.
pub struct FinalStanding {
    /// Roster id.
    pub player_id: String,
    /// Display name.
    pub name: String,
    /// Final total.
    pub total: i32,
}
