//! UseCase: 予約確定（booking pipeline からの呼び出し）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConfirmBookingUseCase::execute() メソッド
//! - ホールドの解除と BOOKED への更新が同時に行われること
//! - Seat Store 障害時にホールドが元に戻ること
//!
//! ### どのような状況を想定しているか
//! - 正常系：保持中の座席の予約確定
//! - 異常系：保持していない座席を含む予約、Seat Store 障害

use std::sync::Arc;

use crate::{
    common::clock::Clock,
    domain::{
        EventId, HoldRepository, Notification, RoomRepository, SeatId, SeatRepository, SessionId,
    },
};

use super::{error::BookingError, notify::Notifier};

/// 予約確定のユースケース
pub struct ConfirmBookingUseCase {
    seats: Arc<dyn SeatRepository>,
    holds: Arc<dyn HoldRepository>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl ConfirmBookingUseCase {
    pub fn new(
        seats: Arc<dyn SeatRepository>,
        holds: Arc<dyn HoldRepository>,
        rooms: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            seats,
            holds,
            notifier: Notifier::new(rooms),
            clock,
        }
    }

    /// Convert the session's holds on `seat_ids` into bookings.
    ///
    /// The holds become booked markers in the hold table before the seat store
    /// is written, so the seats are never re-offered in between. A failed write
    /// puts the original holds back.
    pub async fn execute(
        &self,
        event_id: &EventId,
        session_id: &SessionId,
        seat_ids: Vec<SeatId>,
    ) -> Result<Vec<SeatId>, BookingError> {
        let mut unique: Vec<SeatId> = Vec::with_capacity(seat_ids.len());
        for seat_id in seat_ids {
            if !unique.contains(&seat_id) {
                unique.push(seat_id);
            }
        }
        if unique.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        let converted = self
            .holds
            .convert_to_booked(event_id, &unique, session_id, self.clock.now())
            .await?;

        if let Err(e) = self.seats.mark_booked(event_id, &unique).await {
            tracing::error!(
                "Failed to persist booking of {} seats for event '{}': {}",
                unique.len(),
                event_id,
                e
            );
            if let Err(rollback) = self.holds.rollback_booked(converted).await {
                tracing::error!("Failed to restore holds after booking failure: {}", rollback);
            }
            return Err(e.into());
        }

        for hold in &converted {
            self.notifier
                .broadcast(event_id, &Notification::seat_booked(hold), None)
                .await;
        }
        tracing::info!(
            "Session '{}' booked {} seats for event '{}'",
            session_id,
            unique.len(),
            event_id
        );

        Ok(unique)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{HoldError, MockSeatRepository, RepositoryError},
        usecase::{
            SelectSeatUseCase, SelectSeatError,
            test_support::{TTL, TestContext, drain, event_id, seat_id},
        },
    };

    fn usecase(ctx: &TestContext, seats: Arc<dyn SeatRepository>) -> ConfirmBookingUseCase {
        ConfirmBookingUseCase::new(
            seats,
            ctx.holds.clone(),
            ctx.rooms.clone(),
            Arc::new(ctx.clock.clone()),
        )
    }

    #[tokio::test]
    async fn test_confirm_booking_marks_booked_and_clears_holds() {
        // テスト項目: 予約確定で BOOKED になり、ホールドは消え、ルームに seat_booked が届く
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, _alice_rx) = ctx.connect_in("E1").await;
        let (bob, mut bob_rx) = ctx.connect_in("E1").await;
        let now = ctx.clock.now();
        let mut holds = Vec::new();
        for seat in ["S1", "S2"] {
            holds.push(
                ctx.holds
                    .try_acquire(&event_id("E1"), &seat_id(seat), &alice, now, TTL)
                    .await
                    .unwrap()
                    .hold,
            );
        }

        // when (操作): 重複した seat_id も受け付ける
        let booked = usecase(&ctx, ctx.seats.clone())
            .execute(
                &event_id("E1"),
                &alice,
                vec![seat_id("S1"), seat_id("S2"), seat_id("S1")],
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(booked, vec![seat_id("S1"), seat_id("S2")]);
        assert_eq!(ctx.holds.count_holds().await, 0);
        let s1 = ctx
            .seats
            .get_seat(&event_id("E1"), &seat_id("S1"))
            .await
            .unwrap()
            .unwrap();
        assert!(s1.is_booked());
        assert_eq!(
            drain(&mut bob_rx),
            vec![
                Notification::seat_booked(&holds[0]),
                Notification::seat_booked(&holds[1])
            ]
        );

        // 予約済みの座席は再選択できない
        let select = SelectSeatUseCase::new(
            ctx.seats.clone(),
            ctx.holds.clone(),
            ctx.rooms.clone(),
            Arc::new(ctx.clock.clone()),
            TTL,
        );
        let retry = select.execute(&bob, &event_id("E1"), &seat_id("S1")).await;
        assert_eq!(retry, Err(SelectSeatError::AlreadyBooked));
    }

    #[tokio::test]
    async fn test_confirm_booking_requires_own_holds() {
        // テスト項目: 他人が保持している座席を含む予約は拒否され、何も変わらない
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, _rx1) = ctx.connect_in("E1").await;
        let (bob, _rx2) = ctx.connect_in("E1").await;
        let now = ctx.clock.now();
        ctx.holds
            .try_acquire(&event_id("E1"), &seat_id("S1"), &alice, now, TTL)
            .await
            .unwrap();
        ctx.holds
            .try_acquire(&event_id("E1"), &seat_id("S2"), &bob, now, TTL)
            .await
            .unwrap();

        // when (操作):
        let result = usecase(&ctx, ctx.seats.clone())
            .execute(&event_id("E1"), &alice, vec![seat_id("S1"), seat_id("S2")])
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(BookingError::SeatNotHeld("S2".to_string())));
        assert_eq!(ctx.holds.count_holds().await, 2);
    }

    #[tokio::test]
    async fn test_confirm_booking_empty_selection() {
        // テスト項目: 座席なしの予約はエラー
        let ctx = TestContext::new();
        let (alice, _rx) = ctx.connect_in("E1").await;

        let result = usecase(&ctx, ctx.seats.clone())
            .execute(&event_id("E1"), &alice, Vec::new())
            .await;

        assert_eq!(result, Err(BookingError::EmptySelection));
    }

    #[tokio::test]
    async fn test_confirm_booking_store_failure_restores_holds() {
        // テスト項目: Seat Store の書き込み失敗でホールドが元に戻る
        // given (前提条件):
        let ctx = TestContext::new();
        let (alice, _alice_rx) = ctx.connect_in("E1").await;
        let (_bob, mut bob_rx) = ctx.connect_in("E1").await;
        ctx.holds
            .try_acquire(&event_id("E1"), &seat_id("S1"), &alice, ctx.clock.now(), TTL)
            .await
            .unwrap();
        let mut seats = MockSeatRepository::new();
        seats
            .expect_mark_booked()
            .times(1)
            .returning(|_, _| Err(RepositoryError::Unavailable("disk full".to_string())));

        // when (操作):
        let result = usecase(&ctx, Arc::new(seats))
            .execute(&event_id("E1"), &alice, vec![seat_id("S1")])
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(BookingError::Unavailable(_))));
        let live = ctx
            .holds
            .list_live(&event_id("E1"), ctx.clock.now())
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].session_id, alice);
        assert!(drain(&mut bob_rx).is_empty());
        // ホールドは本人のもののまま残っている
        let retry = ctx
            .holds
            .try_acquire(&event_id("E1"), &seat_id("S1"), &alice, ctx.clock.now(), TTL)
            .await;
        assert_eq!(retry.map(|_| ()), Err(HoldError::AlreadyHeld("S1".to_string())));
    }
}
