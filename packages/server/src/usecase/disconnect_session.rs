//! UseCase: セッション切断処理
//!
//! 切断されたセッションのホールドは即座に解放し、影響するルームへ
//! seat_unlocked をブロードキャストします。

use std::sync::Arc;

use crate::domain::{Hold, HoldRepository, Notification, RoomRepository, SessionId};

use super::notify::Notifier;

/// セッション切断のユースケース
pub struct DisconnectSessionUseCase {
    holds: Arc<dyn HoldRepository>,
    rooms: Arc<dyn RoomRepository>,
    notifier: Notifier,
}

impl DisconnectSessionUseCase {
    pub fn new(holds: Arc<dyn HoldRepository>, rooms: Arc<dyn RoomRepository>) -> Self {
        let notifier = Notifier::new(rooms.clone());
        Self {
            holds,
            rooms,
            notifier,
        }
    }

    /// Unregister the session, then release every hold it owns.
    ///
    /// Returns the released holds. If the hold table cannot be reached the
    /// holds are left for the sweeper, which reclaims them at their deadline.
    pub async fn execute(&self, session_id: &SessionId) -> Vec<Hold> {
        let rooms = self.rooms.disconnect_all(session_id).await;

        let released = match self.holds.release_all_for_session(session_id).await {
            Ok(released) => released,
            Err(e) => {
                tracing::error!(
                    "Failed to release holds of disconnected session '{}', leaving them to expire: {}",
                    session_id,
                    e
                );
                return Vec::new();
            }
        };

        for hold in &released {
            self.notifier
                .broadcast(&hold.event_id, &Notification::seat_unlocked(hold), None)
                .await;
        }
        tracing::info!(
            "Session '{}' disconnected (rooms: {}, released holds: {})",
            session_id,
            rooms.len(),
            released.len()
        );

        released
    }
}
