use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::dto::sse::ServerEvent;

/// Registry of per-game broadcast hubs backing the SSE streams.
///
/// Hubs are created lazily on first subscription and dropped again once the
/// last subscriber disconnects, so idle games cost nothing.
pub struct GameChannels {
    capacity: usize,
    hubs: DashMap<Uuid, broadcast::Sender<ServerEvent>>,
}

impl GameChannels {
    /// Build the registry with a per-hub channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            hubs: DashMap::new(),
        }
    }

    /// Register a subscriber for a game, creating the hub when needed.
    pub fn subscribe(&self, game_id: Uuid) -> broadcast::Receiver<ServerEvent> {
        self.hubs
            .entry(game_id)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Send an event to all subscribers of a game, ignoring delivery errors.
    ///
    /// A game nobody watches has no hub; the event is simply dropped.
    pub fn broadcast(&self, game_id: Uuid, event: ServerEvent) {
        if let Some(sender) = self.hubs.get(&game_id) {
            let _ = sender.send(event);
        }
    }

    /// Send an event to the subscribers of every game.
    pub fn broadcast_all(&self, event: ServerEvent) {
        for entry in self.hubs.iter() {
            let _ = entry.value().send(event.clone());
        }
    }

    /// Drop the hub of a game once its last subscriber is gone.
    pub fn release(&self, game_id: Uuid) {
        self.hubs
            .remove_if(&game_id, |_, sender| sender.receiver_count() == 0);
    }

    #[cfg(test)]
    pub(crate) fn hub_count(&self) -> usize {
        self.hubs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_reaches_subscribers() {
        let channels = GameChannels::new(4);
        let game_id = Uuid::new_v4();
        let mut receiver = channels.subscribe(game_id);

        channels.broadcast(game_id, ServerEvent::new(Some("info".into()), "hi".into()));
        let event = receiver.try_recv().unwrap();
        assert_eq!(event.data, "hi");
    }

    #[test]
    fn release_keeps_hubs_with_live_subscribers() {
        let channels = GameChannels::new(4);
        let game_id = Uuid::new_v4();
        let receiver = channels.subscribe(game_id);

        channels.release(game_id);
        assert_eq!(channels.hub_count(), 1);

        drop(receiver);
        channels.release(game_id);
        assert_eq!(channels.hub_count(), 0);
    }
}
