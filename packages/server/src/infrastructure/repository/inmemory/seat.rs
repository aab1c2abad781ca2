//! InMemory Seat Store 実装
//!
//! ドメイン層が定義する SeatRepository trait の具体的な実装。
//! 座席の永続ステータス（AVAILABLE / BOOKED）のみを保持し、
//! ホールドの状態は持ちません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    EventId, RepositoryError, Seat, SeatId, SeatRepository, SeatStatus, TicketTypeId,
};

/// インメモリ Seat Store 実装
#[derive(Default)]
pub struct InMemorySeatRepository {
    seats: RwLock<HashMap<EventId, HashMap<SeatId, Seat>>>,
}

impl InMemorySeatRepository {
    /// 空の InMemorySeatRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 座席一覧から InMemorySeatRepository を作成
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateSeat` if the same `(event_id, seat_id)` appears twice
    pub fn from_seats(seats: Vec<Seat>) -> Result<Self, RepositoryError> {
        let mut by_event: HashMap<EventId, HashMap<SeatId, Seat>> = HashMap::new();
        for seat in seats {
            let event_seats = by_event.entry(seat.event_id.clone()).or_default();
            if event_seats.contains_key(&seat.seat_id) {
                return Err(RepositoryError::DuplicateSeat {
                    event_id: seat.event_id.to_string(),
                    seat_id: seat.seat_id.to_string(),
                });
            }
            event_seats.insert(seat.seat_id.clone(), seat);
        }
        Ok(Self {
            seats: RwLock::new(by_event),
        })
    }
}

#[async_trait]
impl SeatRepository for InMemorySeatRepository {
    async fn get_seats_for_ticket_type(
        &self,
        event_id: &EventId,
        ticket_type_id: &TicketTypeId,
    ) -> Result<Vec<Seat>, RepositoryError> {
        let seats = self.seats.read().await;
        let mut matching: Vec<Seat> = seats
            .get(event_id)
            .map(|event_seats| {
                event_seats
                    .values()
                    .filter(|seat| &seat.ticket_type_id == ticket_type_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        matching.sort_by(|a, b| {
            a.row_label
                .cmp(&b.row_label)
                .then(a.number.cmp(&b.number))
        });
        Ok(matching)
    }

    async fn get_seat(
        &self,
        event_id: &EventId,
        seat_id: &SeatId,
    ) -> Result<Option<Seat>, RepositoryError> {
        let seats = self.seats.read().await;
        Ok(seats
            .get(event_id)
            .and_then(|event_seats| event_seats.get(seat_id))
            .cloned())
    }

    async fn event_exists(&self, event_id: &EventId) -> Result<bool, RepositoryError> {
        Ok(self.seats.read().await.contains_key(event_id))
    }

    async fn mark_booked(
        &self,
        event_id: &EventId,
        seat_ids: &[SeatId],
    ) -> Result<(), RepositoryError> {
        let mut seats = self.seats.write().await;
        let not_found = |seat_id: &SeatId| RepositoryError::SeatNotFound {
            event_id: event_id.to_string(),
            seat_id: seat_id.to_string(),
        };

        let Some(event_seats) = seats.get_mut(event_id) else {
            return match seat_ids.first() {
                Some(seat_id) => Err(not_found(seat_id)),
                None => Ok(()),
            };
        };
        if let Some(missing) = seat_ids.iter().find(|id| !event_seats.contains_key(*id)) {
            return Err(not_found(missing));
        }
        for seat_id in seat_ids {
            if let Some(seat) = event_seats.get_mut(seat_id) {
                seat.status = SeatStatus::Booked;
            }
        }
        Ok(())
    }
}
