pub mod channels;
pub mod game;
pub mod scoring;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock, watch};
use uuid::Uuid;

use crate::{config::AppConfig, dao::game_store::GameStore, error::ServiceError};

pub use self::channels::GameChannels;

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing the storage handle, per-game
/// serialization gates, and the SSE hub registry.
pub struct AppState {
    config: AppConfig,
    game_store: RwLock<Option<Arc<dyn GameStore>>>,
    channels: GameChannels,
    game_gates: DashMap<Uuid, Arc<Mutex<()>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        let channels = GameChannels::new(config.sse_capacity());
        Arc::new(Self {
            config,
            game_store: RwLock::new(None),
            channels,
            game_gates: DashMap::new(),
            degraded: degraded_tx,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current game store, if one is installed.
    pub async fn game_store(&self) -> Option<Arc<dyn GameStore>> {
        let guard = self.game_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the game store or fail with a degraded-mode error.
    pub async fn require_game_store(&self) -> Result<Arc<dyn GameStore>, ServiceError> {
        self.game_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new game store implementation and leave degraded mode.
    pub async fn set_game_store(&self, store: Arc<dyn GameStore>) {
        {
            let mut guard = self.game_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current game store and enter degraded mode.
    pub async fn clear_game_store(&self) {
        {
            let mut guard = self.game_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    /// Per-game event hub registry backing the SSE streams.
    pub fn channels(&self) -> &GameChannels {
        &self.channels
    }

    /// Gate serializing read-modify-write cycles for one game.
    ///
    /// Every submission or reversion holds this lock across its load, mutate,
    /// and store steps, which is what the original's single-document
    /// transaction provided.
    pub fn game_gate(&self, game_id: Uuid) -> Arc<Mutex<()>> {
        self.game_gates
            .entry(game_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
