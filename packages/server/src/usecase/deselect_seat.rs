//! UseCase: 座席の選択解除（ホールド解放）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DeselectSeatUseCase::execute() メソッド
//! - 所有者チェック（他人のホールドは解放できない）
//! - 冪等性（2 回目の解放は通知のみで、ブロードキャストしない）

use std::sync::Arc;

use crate::{
    domain::{
        EventId, Hold, HoldRepository, Notification, ReleaseOutcome, RoomRepository, SeatId,
        SessionId,
    },
};

use super::{error::DeselectSeatError, notify::Notifier};

/// Result of a successful deselect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeselectOutcome {
    Released(Hold),
    /// Nothing was held; reported as confirmed so clients converge
    NotFound,
}

/// 座席選択解除のユースケース
pub struct DeselectSeatUseCase {
    holds: Arc<dyn HoldRepository>,
    notifier: Notifier,
}

impl DeselectSeatUseCase {
    pub fn new(holds: Arc<dyn HoldRepository>, rooms: Arc<dyn RoomRepository>) -> Self {
        Self {
            holds,
            notifier: Notifier::new(rooms),
        }
    }

    pub async fn execute(
        &self,
        session_id: &SessionId,
        event_id: &EventId,
        seat_id: &SeatId,
    ) -> Result<DeselectOutcome, DeselectSeatError> {
        let outcome = self
            .holds
            .release(event_id, seat_id, session_id)
            .await
            .map_err(|e| DeselectSeatError::Unavailable(e.to_string()))?;

        let confirmed = Notification::SeatDeselectConfirmed {
            event_id: event_id.clone(),
            seat_id: seat_id.clone(),
        };
        match outcome {
            ReleaseOutcome::Released(hold) => {
                self.notifier.send(session_id, &confirmed).await;
                self.notifier
                    .broadcast(event_id, &Notification::seat_unlocked(&hold), Some(session_id))
                    .await;
                tracing::info!(
                    "Session '{}' released seat '{}' of event '{}'",
                    session_id,
                    seat_id,
                    event_id
                );
                Ok(DeselectOutcome::Released(hold))
            }
            ReleaseOutcome::NotFound => {
                self.notifier.send(session_id, &confirmed).await;
                Ok(DeselectOutcome::NotFound)
            }
            ReleaseOutcome::NotOwner => {
                tracing::warn!(
                    "Session '{}' tried to release seat '{}' of event '{}' held by another session",
                    session_id,
                    seat_id,
                    event_id
                );
                Err(DeselectSeatError::OwnershipViolation(seat_id.to_string()))
            }
        }
    }
}
