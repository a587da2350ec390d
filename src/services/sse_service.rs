use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::{
    dto::sse::{Handshake, ServerEvent},
    state::SharedState,
};

/// Subscribe to a game's event stream and convert it into an SSE response.
///
/// The first event is a handshake confirming the subscription; afterwards the
/// forwarder task relays broadcast events until the client disconnects, at
/// which point the game's hub is released if nobody else is listening.
pub fn game_stream(
    state: SharedState,
    game_id: Uuid,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut receiver = state.channels().subscribe(game_id);

    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    let handshake = handshake_event(&state, game_id);

    // forwarder task: reads from broadcast and pushes into mpsc
    tokio::spawn(async move {
        if tx.send(Ok(handshake)).await.is_err() {
            drop(receiver);
            teardown(&state, game_id);
            return;
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            let mut event = Event::default().data(payload.data);
                            if let Some(name) = payload.event {
                                event = event.event(name);
                            }

                            if tx.send(Ok(event)).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => {
                            // Skip lagged messages but keep the stream alive.
                            continue;
                        }
                    }
                }
            }
        }

        drop(receiver);
        teardown(&state, game_id);
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn handshake_event(state: &SharedState, game_id: Uuid) -> Event {
    let payload = Handshake {
        game_id: game_id.to_string(),
        message: "game stream connected".into(),
        degraded: state.is_degraded(),
    };

    let server_event = ServerEvent::json(Some("handshake".to_string()), &payload)
        .unwrap_or_else(|_| ServerEvent::new(Some("handshake".to_string()), "{}".into()));

    let mut event = Event::default().data(server_event.data);
    if let Some(name) = server_event.event {
        event = event.event(name);
    }
    event
}

fn teardown(state: &SharedState, game_id: Uuid) {
    state.channels().release(game_id);
    tracing::info!(%game_id, "game SSE stream disconnected");
}
