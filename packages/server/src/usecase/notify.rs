//! Outbound message routing shared by the use cases.

use std::sync::Arc;

use crate::domain::{EventId, Hold, Notification, RoomRepository, SessionId};

/// Hands [`Notification`]s to the channel manager.
#[derive(Clone)]
pub struct Notifier {
    rooms: Arc<dyn RoomRepository>,
}

impl Notifier {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// Direct message to one session. Returns whether it was queued.
    pub async fn send(&self, session_id: &SessionId, notification: &Notification) -> bool {
        self.rooms.send_to(session_id, notification).await
    }

    /// Message to every member of an event room except `exclude`.
    pub async fn broadcast(
        &self,
        event_id: &EventId,
        notification: &Notification,
        exclude: Option<&SessionId>,
    ) -> usize {
        self.rooms.broadcast(event_id, notification, exclude).await
    }

    /// Announce a reclaimed hold: to the whole room, and directly to the former
    /// holder when it is connected but no longer viewing the room.
    pub async fn notify_expired(&self, hold: &Hold) {
        let notification = Notification::seat_expired(hold);
        self.broadcast(&hold.event_id, &notification, None).await;

        let in_room = self
            .rooms
            .members(&hold.event_id)
            .await
            .contains(&hold.session_id);
        if !in_room && self.rooms.is_connected(&hold.session_id).await {
            self.send(&hold.session_id, &notification).await;
        }
    }
}
