//! Sjoelen Back binary entrypoint wiring REST, SSE, and storage layers.

use std::{env, net::SocketAddr};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sjoelen_back::{
    config::AppConfig,
    dto::sse::{ServerEvent, SystemStatus},
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let app_state = AppState::new(config);

    spawn_storage(&app_state).await;
    tokio::spawn(notify_degraded_changes(app_state.clone()));

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Connect the storage backend: a supervised MongoDB connection when the
/// `mongo-store` feature is enabled, an in-memory store otherwise.
#[cfg(feature = "mongo-store")]
async fn spawn_storage(state: &SharedState) {
    use std::sync::Arc;

    use sjoelen_back::{
        dao::{
            game_store::{
                GameStore,
                mongodb::{MongoConfig, MongoGameStore},
            },
            storage::StorageError,
        },
        services::storage_supervisor,
    };

    let mongo_uri = env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into());
    let mongo_db = env::var("MONGO_DB").ok();

    let connect = move || {
        let uri = mongo_uri.clone();
        let db = mongo_db.clone();
        async move {
            let config = MongoConfig::from_uri(&uri, db.as_deref())
                .await
                .map_err(StorageError::from)?;
            let store = MongoGameStore::connect(config)
                .await
                .map_err(StorageError::from)?;
            Ok(Arc::new(store) as Arc<dyn GameStore>)
        }
    };

    tokio::spawn(storage_supervisor::run(state.clone(), connect));
}

#[cfg(not(feature = "mongo-store"))]
async fn spawn_storage(state: &SharedState) {
    use std::sync::Arc;

    use sjoelen_back::dao::game_store::memory::MemoryGameStore;

    info!("mongo-store feature disabled; using in-memory storage");
    state.set_game_store(Arc::new(MemoryGameStore::new())).await;
}

/// Forward degraded-mode flips to every connected game stream.
async fn notify_degraded_changes(state: SharedState) {
    let mut watcher = state.degraded_watcher();
    while watcher.changed().await.is_ok() {
        let degraded = *watcher.borrow_and_update();
        if let Ok(event) =
            ServerEvent::json(Some("system".to_string()), &SystemStatus { degraded })
        {
            state.channels().broadcast_all(event);
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
