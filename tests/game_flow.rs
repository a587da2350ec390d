//! Service-level integration tests running against the in-memory store.

use std::sync::Arc;

use sjoelen_back::{
    config::AppConfig,
    dao::game_store::memory::MemoryGameStore,
    dto::{
        game::{CreateGameRequest, GameSummary, PlayerInput},
        round::SubmitRoundRequest,
    },
    error::ServiceError,
    services::{game_service, round_service},
    state::{SharedState, scoring::GateCounts},
};
use uuid::Uuid;

async fn test_state() -> SharedState {
    let state = sjoelen_back::state::AppState::new(AppConfig::default());
    state
        .set_game_store(Arc::new(MemoryGameStore::new()))
        .await;
    state
}

fn create_request(players: &[(&str, &str)]) -> CreateGameRequest {
    CreateGameRequest {
        title: "clubavond".into(),
        creator: players[0].0.into(),
        players: players
            .iter()
            .map(|(id, name)| PlayerInput {
                id: (*id).into(),
                name: (*name).into(),
            })
            .collect(),
        guests: Vec::new(),
    }
}

async fn create_game(state: &SharedState, players: &[(&str, &str)]) -> (Uuid, GameSummary) {
    let summary = game_service::create_game(state, create_request(players))
        .await
        .unwrap();
    let id = Uuid::parse_str(&summary.id).unwrap();
    (id, summary)
}

async fn submit(
    state: &SharedState,
    game_id: Uuid,
    player_id: &str,
    round: u8,
    gates: GateCounts,
) -> Result<sjoelen_back::dto::round::SubmitRoundResponse, ServiceError> {
    round_service::submit_round(
        state,
        game_id,
        SubmitRoundRequest {
            player_id: player_id.into(),
            round,
            gates,
        },
    )
    .await
}

#[tokio::test]
async fn full_game_runs_to_closure() {
    let state = test_state().await;
    let (game_id, _) = create_game(&state, &[("anna", "Anna"), ("bram", "Bram")]).await;

    for round in 1..=5 {
        let anna = submit(&state, game_id, "anna", round, [1, 1, 1, 1])
            .await
            .unwrap();
        assert_eq!(anna.points, 20);

        let bram = submit(&state, game_id, "bram", round, [7, 7, 9, 7])
            .await
            .unwrap();
        assert_eq!(bram.points, 148);

        if round < 5 {
            assert_eq!(bram.current_round, round + 1);
            assert!(!bram.closed);
        } else {
            assert!(bram.closed);
            assert_eq!(bram.current_round, 5);
        }
    }

    let summary = game_service::fetch_game(&state, game_id).await.unwrap();
    assert!(summary.closed);
    let totals: Vec<i32> = summary.players.iter().map(|player| player.total).collect();
    assert_eq!(totals, vec![100, 740]);
    assert!(
        summary.players[0]
            .rounds
            .iter()
            .all(|entry| entry.gates.as_deref() == Some("1/1/1/1"))
    );
}

#[tokio::test]
async fn out_of_sequence_submission_fails_without_mutation() {
    let state = test_state().await;
    let (game_id, _) = create_game(&state, &[("anna", "Anna")]).await;

    let err = submit(&state, game_id, "anna", 2, [1, 0, 0, 0])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));

    let summary = game_service::fetch_game(&state, game_id).await.unwrap();
    assert_eq!(summary.current_round, 1);
    assert_eq!(summary.players[0].total, 0);
    assert!(summary.players[0].rounds.is_empty());
}

#[tokio::test]
async fn duplicate_submission_is_rejected() {
    let state = test_state().await;
    let (game_id, _) = create_game(&state, &[("anna", "Anna"), ("bram", "Bram")]).await;

    submit(&state, game_id, "anna", 1, [2, 2, 2, 2]).await.unwrap();
    let err = submit(&state, game_id, "anna", 1, [2, 2, 2, 2])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidState(_)));
}

#[tokio::test]
async fn player_outside_roster_is_rejected() {
    let state = test_state().await;
    let (game_id, _) = create_game(&state, &[("anna", "Anna")]).await;

    let err = submit(&state, game_id, "intruder", 1, [1, 0, 0, 0])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn unknown_game_is_not_found() {
    let state = test_state().await;
    let err = submit(&state, Uuid::new_v4(), "anna", 1, [0, 0, 0, 0])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn disc_budget_is_enforced_at_the_request_layer() {
    let state = test_state().await;
    let (game_id, _) = create_game(&state, &[("anna", "Anna")]).await;

    let err = submit(&state, game_id, "anna", 1, [10, 10, 10, 1])
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn revert_restores_totals_and_reopens_closed_games() {
    let state = test_state().await;
    let (game_id, _) = create_game(&state, &[("anna", "Anna")]).await;

    for round in 1..=5 {
        submit(&state, game_id, "anna", round, [1, 1, 1, 1])
            .await
            .unwrap();
    }
    let summary = game_service::fetch_game(&state, game_id).await.unwrap();
    assert!(summary.closed);
    assert_eq!(summary.players[0].total, 100);

    let outcome = round_service::revert_round(&state, game_id, "anna".into(), 3)
        .await
        .unwrap();
    assert_eq!(outcome.points_removed, 20);
    assert_eq!(outcome.total, 80);
    assert!(!outcome.closed);
    assert_eq!(outcome.current_round, 3);

    // Rounds 3 through 5 are replayed from here; resubmitting round 3 cascades
    // straight back to closed because rounds 4 and 5 are still recorded.
    let resubmit = submit(&state, game_id, "anna", 3, [7, 7, 9, 7])
        .await
        .unwrap();
    assert!(resubmit.closed);
    assert_eq!(resubmit.total, 228);
}

#[tokio::test]
async fn revert_of_unrecorded_round_is_not_found() {
    let state = test_state().await;
    let (game_id, _) = create_game(&state, &[("anna", "Anna")]).await;

    let err = round_service::revert_round(&state, game_id, "anna".into(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn round_history_follows_submissions_and_reverts() {
    let state = test_state().await;
    let (game_id, _) = create_game(&state, &[("anna", "Anna"), ("bram", "Bram")]).await;

    submit(&state, game_id, "anna", 1, [3, 2, 1, 0]).await.unwrap();
    submit(&state, game_id, "bram", 1, [0, 0, 0, 0]).await.unwrap();

    let history = game_service::list_rounds(&state, game_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].player_id, "anna");
    assert_eq!(history[0].gates, [3, 2, 1, 0]);

    round_service::revert_round(&state, game_id, "anna".into(), 1)
        .await
        .unwrap();
    let history = game_service::list_rounds(&state, game_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].player_id, "bram");
}

#[tokio::test]
async fn guests_join_with_minted_ids() {
    let state = test_state().await;
    let request = CreateGameRequest {
        title: "familieavond".into(),
        creator: "anna".into(),
        players: vec![PlayerInput {
            id: "anna".into(),
            name: "Anna".into(),
        }],
        guests: vec!["Oma".into(), "Opa".into()],
    };

    let summary = game_service::create_game(&state, request).await.unwrap();
    assert_eq!(summary.players.len(), 3);

    let guests: Vec<_> = summary
        .players
        .iter()
        .filter(|player| player.guest)
        .collect();
    assert_eq!(guests.len(), 2);
    assert!(guests.iter().all(|player| !player.id.is_empty()));
    assert_ne!(guests[0].id, guests[1].id);

    // Guests submit like any roster member.
    let game_id = Uuid::parse_str(&summary.id).unwrap();
    let outcome = submit(&state, game_id, &guests[0].id, 1, [1, 1, 1, 1])
        .await
        .unwrap();
    assert_eq!(outcome.points, 20);
}

#[tokio::test]
async fn score_events_reach_game_subscribers() {
    let state = test_state().await;
    let (game_id, _) = create_game(&state, &[("anna", "Anna")]).await;

    let mut receiver = state.channels().subscribe(game_id);

    for round in 1..=5 {
        submit(&state, game_id, "anna", round, [1, 1, 1, 1])
            .await
            .unwrap();
    }

    let mut names = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        names.push(event.event.unwrap_or_default());
    }
    assert_eq!(
        names,
        vec![
            "round_submitted",
            "round_submitted",
            "round_submitted",
            "round_submitted",
            "round_submitted",
            "game_closed",
        ]
    );
}

#[tokio::test]
async fn degraded_mode_rejects_submissions() {
    let state = sjoelen_back::state::AppState::new(AppConfig::default());
    let err = game_service::list_games(&state).await.unwrap_err();
    assert!(matches!(err, ServiceError::Degraded));
}
