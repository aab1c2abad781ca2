//! Shared fixtures for use case tests.

use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::{
    common::clock::ManualClock,
    domain::{
        EventId, Notification, RoomRepository, Seat, SeatId, SeatStatus, SessionId,
        SessionIdFactory, TicketTypeId,
    },
    infrastructure::repository::{
        InMemoryHoldRepository, InMemoryRoomRepository, InMemorySeatRepository,
    },
    usecase::{
        DeselectSeatUseCase, DisconnectSessionUseCase, GatewayUseCases, JoinEventUseCase,
        LeaveEventUseCase, SelectSeatUseCase,
    },
};

pub const TTL: Duration = Duration::from_secs(1800);

pub struct TestContext {
    pub holds: Arc<InMemoryHoldRepository>,
    pub seats: Arc<InMemorySeatRepository>,
    pub rooms: Arc<InMemoryRoomRepository>,
    pub clock: ManualClock,
}

impl TestContext {
    /// Event `E1` with seats S1..S3 (S3 already booked) and event `E2` with S1.
    pub fn new() -> Self {
        let seats = vec![
            seat("E1", "S1", 1, SeatStatus::Available),
            seat("E1", "S2", 2, SeatStatus::Available),
            seat("E1", "S3", 3, SeatStatus::Booked),
            seat("E2", "S1", 1, SeatStatus::Available),
        ];
        Self {
            holds: Arc::new(InMemoryHoldRepository::new()),
            seats: Arc::new(InMemorySeatRepository::from_seats(seats).unwrap()),
            rooms: Arc::new(InMemoryRoomRepository::new()),
            clock: ManualClock::at(1_700_000_000_000),
        }
    }

    pub fn gateway_usecases(&self) -> GatewayUseCases {
        let clock = Arc::new(self.clock.clone());
        GatewayUseCases {
            join_event: JoinEventUseCase::new(
                self.seats.clone(),
                self.holds.clone(),
                self.rooms.clone(),
                clock.clone(),
            ),
            leave_event: LeaveEventUseCase::new(self.rooms.clone()),
            select_seat: SelectSeatUseCase::new(
                self.seats.clone(),
                self.holds.clone(),
                self.rooms.clone(),
                clock,
                TTL,
            ),
            deselect_seat: DeselectSeatUseCase::new(self.holds.clone(), self.rooms.clone()),
            disconnect_session: DisconnectSessionUseCase::new(
                self.holds.clone(),
                self.rooms.clone(),
            ),
        }
    }

    /// Register a session without joining any room.
    pub async fn connect(&self) -> (SessionId, UnboundedReceiver<Notification>) {
        let session_id = SessionIdFactory::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        self.rooms
            .register_session(session_id.clone(), tx)
            .await
            .unwrap();
        (session_id, rx)
    }

    /// Register a session and join it to `event`.
    pub async fn connect_in(&self, event: &str) -> (SessionId, UnboundedReceiver<Notification>) {
        let (session_id, rx) = self.connect().await;
        self.rooms.join(&session_id, &event_id(event)).await.unwrap();
        (session_id, rx)
    }
}

pub fn event_id(id: &str) -> EventId {
    EventId::new(id.to_string()).unwrap()
}

pub fn seat_id(id: &str) -> SeatId {
    SeatId::new(id.to_string()).unwrap()
}

pub fn seat(event: &str, id: &str, number: u32, status: SeatStatus) -> Seat {
    Seat::new(
        seat_id(id),
        event_id(event),
        "A".to_string(),
        number,
        TicketTypeId::new("standard".to_string()).unwrap(),
        status,
    )
    .unwrap()
}

/// Everything queued for a session so far.
pub fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}
