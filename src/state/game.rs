//! Game aggregate and its round transitions.
//!
//! A game runs five rounds. Each player submits one score per round; once the
//! whole roster has submitted the current round the game advances, and
//! completing round five closes it. Reverting a submission undoes exactly one
//! submit, rolling the current round back when play had moved on.

use std::{collections::BTreeMap, time::SystemTime};

use indexmap::IndexMap;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{GameEntity, PlayerEntity, PlayerScoreEntity, RoundScoreEntity};

/// Number of rounds in a game.
pub const TOTAL_ROUNDS: u8 = 5;
/// Round number a fresh game starts on.
pub const FIRST_ROUND: u8 = 1;

/// Roster entry tracked during a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Player identifier. Registered players carry their account id; guests a
    /// server-minted one.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether this entry is a guest without a backing account.
    pub guest: bool,
}

/// One recorded round score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundScore {
    /// Points awarded for the round.
    pub points: i32,
    /// Encoded per-gate disc counts kept for display.
    pub gates: Option<String>,
}

/// Running score record for one player, owned by the parent game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerScore {
    /// Sum of all recorded round points.
    pub total: i32,
    /// Recorded rounds keyed by round number.
    pub rounds: BTreeMap<u8, RoundScore>,
}

/// Errors raised by game transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameplayError {
    /// Every round has been played; the game no longer accepts submissions.
    #[error("game is already closed")]
    AlreadyClosed,
    /// The submitted round number does not match the round being played.
    #[error("invalid round number: game is on round {expected}, got {got}")]
    RoundMismatch {
        /// Round the game is currently on.
        expected: u8,
        /// Round number carried by the request.
        got: u8,
    },
    /// The player id does not appear in the game's roster.
    #[error("player `{0}` is not part of this game")]
    UnknownPlayer(String),
    /// The player already has a recorded score for this round.
    #[error("player `{player}` already submitted round {round}")]
    DuplicateSubmission {
        /// Roster id of the player.
        player: String,
        /// Round that was submitted twice.
        round: u8,
    },
    /// No recorded score exists for the (player, round) pair.
    #[error("player `{player}` has no recorded score for round {round}")]
    RoundNotRecorded {
        /// Roster id of the player.
        player: String,
        /// Round the revert targeted.
        round: u8,
    },
}

/// Aggregated state for an in-progress or finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Primary key of the game.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Identifier of the account that created the game.
    pub creator: String,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the game was updated.
    pub updated_at: SystemTime,
    /// Participating players in roster order.
    pub players: Vec<Player>,
    /// Round currently being played (1 through [`TOTAL_ROUNDS`]).
    pub current_round: u8,
    /// Whether every player has submitted the final round.
    pub closed: bool,
    /// Per-player score records keyed by roster id, in roster order.
    pub scores: IndexMap<String, PlayerScore>,
    /// Version counter bumped on every persisted update.
    pub version: u64,
}

impl Game {
    /// Build a fresh game on round one with zeroed score records.
    pub fn new(title: String, creator: String, players: Vec<Player>) -> Self {
        let timestamp = SystemTime::now();
        let scores = players
            .iter()
            .map(|player| (player.id.clone(), PlayerScore::default()))
            .collect();

        Self {
            id: Uuid::new_v4(),
            title,
            creator,
            created_at: timestamp,
            updated_at: timestamp,
            players,
            current_round: FIRST_ROUND,
            closed: false,
            scores,
            version: 0,
        }
    }

    /// Record a submitted round score for a player.
    ///
    /// Preconditions are checked in order and leave the game untouched when
    /// violated: the game must be open, `round` must equal the current round,
    /// the player must belong to the roster, and the player must not have a
    /// score for this round yet. After the merge the game advances through
    /// every round the whole roster has completed, closing after round five.
    pub fn record_round(
        &mut self,
        player_id: &str,
        round: u8,
        points: i32,
        gates: Option<String>,
    ) -> Result<(), GameplayError> {
        if self.closed {
            return Err(GameplayError::AlreadyClosed);
        }
        if round != self.current_round {
            return Err(GameplayError::RoundMismatch {
                expected: self.current_round,
                got: round,
            });
        }
        let Some(score) = self.scores.get_mut(player_id) else {
            return Err(GameplayError::UnknownPlayer(player_id.to_owned()));
        };
        if score.rounds.contains_key(&round) {
            return Err(GameplayError::DuplicateSubmission {
                player: player_id.to_owned(),
                round,
            });
        }

        score.rounds.insert(round, RoundScore { points, gates });
        score.total += points;
        self.advance_completed_rounds();

        Ok(())
    }

    /// Erase a recorded round score, returning the removed entry.
    ///
    /// The inverse of one [`Self::record_round`]: the points are subtracted
    /// from the running total, and when play had advanced past the reverted
    /// round (or closed the game) the current round rolls back to it and the
    /// game reopens. Score records of later rounds are kept; they advance the
    /// game again as soon as the reverted round is resubmitted.
    pub fn erase_round(&mut self, player_id: &str, round: u8) -> Result<RoundScore, GameplayError> {
        let Some(score) = self.scores.get_mut(player_id) else {
            return Err(GameplayError::UnknownPlayer(player_id.to_owned()));
        };
        let Some(entry) = score.rounds.remove(&round) else {
            return Err(GameplayError::RoundNotRecorded {
                player: player_id.to_owned(),
                round,
            });
        };

        score.total -= entry.points;
        if self.closed || self.current_round > round {
            self.current_round = round;
            self.closed = false;
        }

        Ok(entry)
    }

    /// Whether every roster member has a score recorded for `round`.
    fn round_complete(&self, round: u8) -> bool {
        self.players.iter().all(|player| {
            self.scores
                .get(&player.id)
                .is_some_and(|score| score.rounds.contains_key(&round))
        })
    }

    fn advance_completed_rounds(&mut self) {
        while !self.closed && self.round_complete(self.current_round) {
            if self.current_round == TOTAL_ROUNDS {
                self.closed = true;
            } else {
                self.current_round += 1;
            }
        }
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            guest: value.guest,
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            id: value.id,
            name: value.name,
            guest: value.guest,
        }
    }
}

impl From<PlayerScoreEntity> for PlayerScore {
    fn from(value: PlayerScoreEntity) -> Self {
        Self {
            total: value.total,
            rounds: value
                .rounds
                .into_iter()
                .map(|entry| {
                    (
                        entry.round,
                        RoundScore {
                            points: entry.points,
                            gates: entry.gates,
                        },
                    )
                })
                .collect(),
        }
    }
}

impl From<GameEntity> for Game {
    fn from(value: GameEntity) -> Self {
        let scores = value
            .scores
            .into_iter()
            .map(|record| (record.player_id.clone(), record.into()))
            .collect();

        Self {
            id: value.id,
            title: value.title,
            creator: value.creator,
            created_at: value.created_at,
            updated_at: value.updated_at,
            players: value.players.into_iter().map(Into::into).collect(),
            current_round: value.current_round,
            closed: value.closed,
            scores,
            version: value.version,
        }
    }
}

impl From<Game> for GameEntity {
    fn from(value: Game) -> Self {
        let scores = value
            .scores
            .into_iter()
            .map(|(player_id, score)| PlayerScoreEntity {
                player_id,
                total: score.total,
                rounds: score
                    .rounds
                    .into_iter()
                    .map(|(round, entry)| RoundScoreEntity {
                        round,
                        points: entry.points,
                        gates: entry.gates,
                    })
                    .collect(),
            })
            .collect();

        Self {
            id: value.id,
            title: value.title,
            creator: value.creator,
            created_at: value.created_at,
            updated_at: value.updated_at,
            players: value.players.into_iter().map(Into::into).collect(),
            current_round: value.current_round,
            closed: value.closed,
            scores,
            version: value.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(ids: &[&str]) -> Vec<Player> {
        ids.iter()
            .map(|id| Player {
                id: (*id).to_owned(),
                name: id.to_uppercase(),
                guest: false,
            })
            .collect()
    }

    fn game(ids: &[&str]) -> Game {
        Game::new("avondje sjoelen".into(), "creator-1".into(), roster(ids))
    }

    fn submit(game: &mut Game, player: &str, round: u8, points: i32) {
        game.record_round(player, round, points, None).unwrap();
    }

    fn assert_totals_consistent(game: &Game) {
        for (player_id, score) in &game.scores {
            let sum: i32 = score.rounds.values().map(|entry| entry.points).sum();
            assert_eq!(score.total, sum, "total drifted for {player_id}");
        }
    }

    #[test]
    fn fresh_game_starts_open_on_round_one() {
        let game = game(&["a", "b"]);
        assert_eq!(game.current_round, FIRST_ROUND);
        assert!(!game.closed);
        assert!(game.scores.values().all(|score| score.total == 0));
    }

    #[test]
    fn submission_merges_points_and_keeps_round_open() {
        let mut game = game(&["a", "b"]);
        game.record_round("a", 1, 37, Some("2/3/4/1".into()))
            .unwrap();

        let score = &game.scores["a"];
        assert_eq!(score.total, 37);
        assert_eq!(score.rounds[&1].gates.as_deref(), Some("2/3/4/1"));
        // b has not submitted yet, so the round does not advance.
        assert_eq!(game.current_round, 1);
    }

    #[test]
    fn completing_a_round_advances_the_game() {
        let mut game = game(&["a", "b"]);
        submit(&mut game, "a", 1, 30);
        submit(&mut game, "b", 1, 42);
        assert_eq!(game.current_round, 2);
        assert!(!game.closed);
    }

    #[test]
    fn completing_the_final_round_closes_instead_of_advancing() {
        let mut game = game(&["a"]);
        for round in 1..=TOTAL_ROUNDS {
            submit(&mut game, "a", round, 20);
        }
        assert!(game.closed);
        assert_eq!(game.current_round, TOTAL_ROUNDS);
        assert_eq!(game.scores["a"].total, 100);
    }

    #[test]
    fn out_of_sequence_submission_fails_without_mutation() {
        let mut game = game(&["a", "b"]);
        submit(&mut game, "a", 1, 30);
        let before = game.clone();

        let err = game.record_round("b", 2, 10, None).unwrap_err();
        assert_eq!(
            err,
            GameplayError::RoundMismatch {
                expected: 1,
                got: 2
            }
        );
        assert_eq!(game, before);
    }

    #[test]
    fn unknown_player_is_rejected() {
        let mut game = game(&["a"]);
        let err = game.record_round("intruder", 1, 10, None).unwrap_err();
        assert_eq!(err, GameplayError::UnknownPlayer("intruder".into()));
    }

    #[test]
    fn duplicate_submission_is_rejected() {
        let mut game = game(&["a", "b"]);
        submit(&mut game, "a", 1, 30);
        let err = game.record_round("a", 1, 30, None).unwrap_err();
        assert_eq!(
            err,
            GameplayError::DuplicateSubmission {
                player: "a".into(),
                round: 1
            }
        );
        assert_eq!(game.scores["a"].total, 30);
    }

    #[test]
    fn closed_game_rejects_submissions() {
        let mut game = game(&["a"]);
        for round in 1..=TOTAL_ROUNDS {
            submit(&mut game, "a", round, 20);
        }
        let err = game.record_round("a", 5, 20, None).unwrap_err();
        assert_eq!(err, GameplayError::AlreadyClosed);
    }

    #[test]
    fn revert_restores_total_and_round_entry() {
        let mut game = game(&["a", "b"]);
        submit(&mut game, "a", 1, 30);
        let removed = game.erase_round("a", 1).unwrap();
        assert_eq!(removed.points, 30);
        assert_eq!(game.scores["a"].total, 0);
        assert!(game.scores["a"].rounds.is_empty());
        assert_eq!(game.current_round, 1);
    }

    #[test]
    fn revert_of_missing_round_is_rejected() {
        let mut game = game(&["a"]);
        let err = game.erase_round("a", 1).unwrap_err();
        assert_eq!(
            err,
            GameplayError::RoundNotRecorded {
                player: "a".into(),
                round: 1
            }
        );
    }

    #[test]
    fn revert_rolls_back_an_advanced_game() {
        let mut game = game(&["a", "b"]);
        submit(&mut game, "a", 1, 30);
        submit(&mut game, "b", 1, 42);
        assert_eq!(game.current_round, 2);

        game.erase_round("b", 1).unwrap();
        assert_eq!(game.current_round, 1);
        assert!(!game.closed);
        assert_totals_consistent(&game);
    }

    #[test]
    fn revert_reopens_a_closed_game() {
        let mut game = game(&["a"]);
        for round in 1..=TOTAL_ROUNDS {
            submit(&mut game, "a", round, 20);
        }
        assert!(game.closed);

        game.erase_round("a", 3).unwrap();
        assert!(!game.closed);
        assert_eq!(game.current_round, 3);
        assert_eq!(game.scores["a"].total, 80);
    }

    #[test]
    fn resubmission_after_revert_cascades_through_completed_rounds() {
        let mut game = game(&["a"]);
        for round in 1..=TOTAL_ROUNDS {
            submit(&mut game, "a", round, 20);
        }

        // Rounds 1 and 2 stay recorded while round 1 is reverted, so the
        // resubmission must carry the game straight back to closed.
        game.erase_round("a", 1).unwrap();
        assert_eq!(game.current_round, 1);

        submit(&mut game, "a", 1, 44);
        assert!(game.closed);
        assert_eq!(game.current_round, TOTAL_ROUNDS);
        assert_eq!(game.scores["a"].total, 124);
        assert_totals_consistent(&game);
    }

    #[test]
    fn totals_stay_consistent_across_mixed_sequences() {
        let mut game = game(&["a", "b"]);
        submit(&mut game, "a", 1, 30);
        submit(&mut game, "b", 1, 42);
        submit(&mut game, "a", 2, 25);
        game.erase_round("a", 1).unwrap();
        assert_eq!(game.current_round, 1);
        submit(&mut game, "a", 1, 50);
        // a already has round 2 recorded; b is the only one missing it.
        assert_eq!(game.current_round, 2);
        submit(&mut game, "b", 2, 18);
        assert_eq!(game.current_round, 3);
        assert_totals_consistent(&game);
    }

    #[test]
    fn entity_round_trip_preserves_the_aggregate() {
        let mut game = game(&["a", "b"]);
        submit(&mut game, "a", 1, 30);
        let entity: GameEntity = game.clone().into();
        let restored: Game = entity.into();
        assert_eq!(restored, game);
    }
}
