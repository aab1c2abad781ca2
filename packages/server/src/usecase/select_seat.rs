//! UseCase: 座席の選択（ホールド取得）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SelectSeatUseCase::execute() メソッド
//! - 取得成功時の通知（本人へ seat_lock_confirmed、ルームへ seat_locked）
//! - 取得失敗時はエラーを返すだけで、何もブロードキャストしないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：空席の取得
//! - 異常系：保持中・予約済み・存在しない座席、ストア障害
//! - エッジケース：期限切れ未回収のホールドを置き換える取得

use std::{sync::Arc, time::Duration};

use crate::{
    common::clock::Clock,
    domain::{
        EventId, Hold, HoldRepository, Notification, RoomRepository, SeatId, SeatRepository,
        SessionId,
    },
};

use super::{error::SelectSeatError, notify::Notifier};

/// 座席選択のユースケース
pub struct SelectSeatUseCase {
    seats: Arc<dyn SeatRepository>,
    holds: Arc<dyn HoldRepository>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    hold_ttl: Duration,
}

impl SelectSeatUseCase {
    pub fn new(
        seats: Arc<dyn SeatRepository>,
        holds: Arc<dyn HoldRepository>,
        rooms: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
        hold_ttl: Duration,
    ) -> Self {
        Self {
            seats,
            holds,
            notifier: Notifier::new(rooms),
            clock,
            hold_ttl,
        }
    }

    /// Try to hold a seat for `session_id`.
    ///
    /// On success the holder receives `seat_lock_confirmed` and the rest of the
    /// room `seat_locked`. Failures are returned to the caller untouched; the
    /// gateway turns them into a direct reply.
    pub async fn execute(
        &self,
        session_id: &SessionId,
        event_id: &EventId,
        seat_id: &SeatId,
    ) -> Result<Hold, SelectSeatError> {
        let seat = self
            .seats
            .get_seat(event_id, seat_id)
            .await
            .map_err(|e| SelectSeatError::Unavailable(e.to_string()))?
            .ok_or_else(|| SelectSeatError::UnknownSeat(seat_id.to_string()))?;
        if seat.is_booked() {
            return Err(SelectSeatError::AlreadyBooked);
        }

        let acquired = self
            .holds
            .try_acquire(event_id, seat_id, session_id, self.clock.now(), self.hold_ttl)
            .await
            .inspect_err(|e| {
                tracing::debug!(
                    "Session '{}' failed to hold seat '{}' of event '{}': {}",
                    session_id,
                    seat_id,
                    event_id,
                    e
                );
            })?;

        if let Some(displaced) = &acquired.displaced {
            // expired before the sweeper got to it; report it exactly once here
            self.notifier.notify_expired(displaced).await;
        }

        let hold = acquired.hold;
        self.notifier
            .send(
                session_id,
                &Notification::SeatLockConfirmed {
                    event_id: event_id.clone(),
                    seat_id: seat_id.clone(),
                    expires_at: hold.expires_at,
                },
            )
            .await;
        self.notifier
            .broadcast(event_id, &Notification::seat_locked(&hold), Some(session_id))
            .await;
        tracing::info!(
            "Session '{}' holds seat '{}' of event '{}' until {}",
            session_id,
            seat_id,
            event_id,
            hold.expires_at
        );

        Ok(hold)
    }
}
