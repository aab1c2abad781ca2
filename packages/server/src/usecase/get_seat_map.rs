//! UseCase: 座席表の取得
//!
//! Seat Store の永続ステータスにライブなホールドを重ねて、
//! 閲覧者から見た実効ステータスを返します。

use std::{collections::HashMap, sync::Arc};

use crate::{
    common::clock::Clock,
    domain::{
        EventId, Hold, HoldRepository, RepositoryError, Seat, SeatId, SeatRepository, SeatStatus,
        TicketTypeId, effective_status,
    },
};

/// One seat as a viewer sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatView {
    pub seat: Seat,
    pub status: SeatStatus,
    pub hold: Option<Hold>,
}

/// 座席表取得のユースケース
pub struct GetSeatMapUseCase {
    seats: Arc<dyn SeatRepository>,
    holds: Arc<dyn HoldRepository>,
    clock: Arc<dyn Clock>,
}

impl GetSeatMapUseCase {
    pub fn new(
        seats: Arc<dyn SeatRepository>,
        holds: Arc<dyn HoldRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            seats,
            holds,
            clock,
        }
    }

    pub async fn execute(
        &self,
        event_id: &EventId,
        ticket_type_id: &TicketTypeId,
    ) -> Result<Vec<SeatView>, RepositoryError> {
        let seats = self
            .seats
            .get_seats_for_ticket_type(event_id, ticket_type_id)
            .await?;
        let mut live: HashMap<SeatId, Hold> = self
            .holds
            .list_live(event_id, self.clock.now())
            .await?
            .into_iter()
            .map(|hold| (hold.seat_id.clone(), hold))
            .collect();

        Ok(seats
            .into_iter()
            .map(|seat| {
                let hold = live.remove(&seat.seat_id);
                let status = effective_status(&seat, hold.as_ref());
                SeatView { seat, status, hold }
            })
            .collect())
    }
}
