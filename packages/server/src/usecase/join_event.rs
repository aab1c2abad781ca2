//! UseCase: イベントルームへの参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinEventUseCase::execute() メソッド
//! - ルーム登録と、参加時に送る seat_timers スナップショット
//!
//! ### どのような状況を想定しているか
//! - 正常系：保持中の座席があるイベントへの参加
//! - 異常系：存在しないイベントへの参加

use std::sync::Arc;

use crate::{
    common::clock::Clock,
    domain::{
        EventId, HoldRepository, Notification, RepositoryError, RoomRepository, SeatRepository,
        SeatTimer, SessionId,
    },
};

use super::{error::JoinEventError, notify::Notifier};

/// イベントルーム参加のユースケース
pub struct JoinEventUseCase {
    seats: Arc<dyn SeatRepository>,
    holds: Arc<dyn HoldRepository>,
    rooms: Arc<dyn RoomRepository>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl JoinEventUseCase {
    pub fn new(
        seats: Arc<dyn SeatRepository>,
        holds: Arc<dyn HoldRepository>,
        rooms: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let notifier = Notifier::new(rooms.clone());
        Self {
            seats,
            holds,
            rooms,
            notifier,
            clock,
        }
    }

    /// Register the session with the room, then send it the live-hold snapshot.
    ///
    /// Joining before snapshotting means a hold taken in between is reported
    /// twice (snapshot + broadcast) rather than missed.
    pub async fn execute(
        &self,
        session_id: &SessionId,
        event_id: &EventId,
    ) -> Result<Vec<SeatTimer>, JoinEventError> {
        match self.seats.event_exists(event_id).await {
            Ok(true) => {}
            Ok(false) => return Err(JoinEventError::UnknownEvent(event_id.to_string())),
            Err(e) => return Err(JoinEventError::Unavailable(e.to_string())),
        }

        self.rooms
            .join(session_id, event_id)
            .await
            .map_err(|e| match e {
                RepositoryError::SessionNotFound(id) => JoinEventError::SessionNotRegistered(id),
                other => JoinEventError::Unavailable(other.to_string()),
            })?;

        let now = self.clock.now();
        let live = match self.holds.list_live(event_id, now).await {
            Ok(live) => live,
            Err(e) => {
                self.rooms.leave(session_id, event_id).await;
                return Err(JoinEventError::Unavailable(e.to_string()));
            }
        };
        let timers: Vec<SeatTimer> = live
            .iter()
            .map(|hold| SeatTimer::from_hold(hold, now))
            .collect();

        self.notifier
            .send(
                session_id,
                &Notification::SeatTimers {
                    event_id: event_id.clone(),
                    seats: timers.clone(),
                },
            )
            .await;
        tracing::info!(
            "Session '{}' joined event '{}' ({} live holds)",
            session_id,
            event_id,
            timers.len()
        );

        Ok(timers)
    }
}
