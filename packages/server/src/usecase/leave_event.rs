//! UseCase: イベントルームからの退出

use std::sync::Arc;

use crate::domain::{EventId, RoomRepository, SessionId};

/// イベントルーム退出のユースケース
///
/// Holds taken while in the room are kept; they end by deselect, expiry or
/// disconnect.
pub struct LeaveEventUseCase {
    rooms: Arc<dyn RoomRepository>,
}

impl LeaveEventUseCase {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }

    /// Returns whether the session was a member of the room.
    pub async fn execute(&self, session_id: &SessionId, event_id: &EventId) -> bool {
        let was_member = self.rooms.leave(session_id, event_id).await;
        tracing::info!("Session '{}' left event '{}'", session_id, event_id);
        was_member
    }
}
