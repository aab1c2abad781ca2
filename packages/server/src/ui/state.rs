//! Shared application state.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    common::clock::Clock,
    domain::{HoldRepository, Notification, RepositoryError, RoomRepository, SeatRepository},
    usecase::{
        ConfirmBookingUseCase, DeselectSeatUseCase, DisconnectSessionUseCase, GatewayUseCases,
        GetSeatMapUseCase, JoinEventUseCase, LeaveEventUseCase, SelectSeatUseCase,
        SessionGateway, SweepExpiredHoldsUseCase,
    },
};

/// Shared application state
///
/// Handlers build a use case per request from the repositories held here.
pub struct AppState {
    /// Hold Table
    pub holds: Arc<dyn HoldRepository>,
    /// Seat Store
    pub seats: Arc<dyn SeatRepository>,
    /// Channel Manager（イベントごとのルーム）
    pub rooms: Arc<dyn RoomRepository>,
    pub clock: Arc<dyn Clock>,
    pub hold_ttl: Duration,
}

impl AppState {
    pub fn new(
        holds: Arc<dyn HoldRepository>,
        seats: Arc<dyn SeatRepository>,
        rooms: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
        hold_ttl: Duration,
    ) -> Self {
        Self {
            holds,
            seats,
            rooms,
            clock,
            hold_ttl,
        }
    }

    /// Register a new connection whose messages are queued on `sender`.
    pub async fn open_session(
        &self,
        sender: UnboundedSender<Notification>,
    ) -> Result<SessionGateway, RepositoryError> {
        let usecases = GatewayUseCases {
            join_event: self.join_event(),
            leave_event: self.leave_event(),
            select_seat: self.select_seat(),
            deselect_seat: self.deselect_seat(),
            disconnect_session: self.disconnect_session(),
        };
        SessionGateway::open(self.rooms.clone(), usecases, sender).await
    }

    pub fn join_event(&self) -> JoinEventUseCase {
        JoinEventUseCase::new(
            self.seats.clone(),
            self.holds.clone(),
            self.rooms.clone(),
            self.clock.clone(),
        )
    }

    pub fn leave_event(&self) -> LeaveEventUseCase {
        LeaveEventUseCase::new(self.rooms.clone())
    }

    pub fn select_seat(&self) -> SelectSeatUseCase {
        SelectSeatUseCase::new(
            self.seats.clone(),
            self.holds.clone(),
            self.rooms.clone(),
            self.clock.clone(),
            self.hold_ttl,
        )
    }

    pub fn deselect_seat(&self) -> DeselectSeatUseCase {
        DeselectSeatUseCase::new(self.holds.clone(), self.rooms.clone())
    }

    pub fn disconnect_session(&self) -> DisconnectSessionUseCase {
        DisconnectSessionUseCase::new(self.holds.clone(), self.rooms.clone())
    }

    pub fn sweep_expired_holds(&self) -> SweepExpiredHoldsUseCase {
        SweepExpiredHoldsUseCase::new(self.holds.clone(), self.rooms.clone(), self.clock.clone())
    }

    pub fn confirm_booking(&self) -> ConfirmBookingUseCase {
        ConfirmBookingUseCase::new(
            self.seats.clone(),
            self.holds.clone(),
            self.rooms.clone(),
            self.clock.clone(),
        )
    }

    pub fn seat_map(&self) -> GetSeatMapUseCase {
        GetSeatMapUseCase::new(self.seats.clone(), self.holds.clone(), self.clock.clone())
    }
}
