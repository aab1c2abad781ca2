//! Repository traits.
//!
//! The domain layer owns these abstractions; the infrastructure layer provides
//! the implementations (dependency inversion). Use cases only ever see
//! `Arc<dyn ...Repository>`.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use super::{
    entity::{AcquiredHold, Hold, ReleaseOutcome, Seat},
    error::{HoldError, RepositoryError},
    notification::Notification,
    value_object::{EventId, SeatId, SessionId, TicketTypeId, Timestamp},
};

/// Hold Table: the contended resource.
///
/// Implementations must guarantee that at most one live hold exists per
/// `(event_id, seat_id)` and that every mutation for a given seat is observed
/// in a single global order.
#[async_trait]
pub trait HoldRepository: Send + Sync {
    /// Atomically claim a seat for `session_id` until `now + ttl`.
    ///
    /// An expired hold that has not been swept yet does not block the claim;
    /// it is replaced and returned as `displaced`.
    ///
    /// # Errors
    ///
    /// `AlreadyHeld` / `AlreadyBooked` on conflict, `Store` on backend failure.
    async fn try_acquire(
        &self,
        event_id: &EventId,
        seat_id: &SeatId,
        session_id: &SessionId,
        now: Timestamp,
        ttl: Duration,
    ) -> Result<AcquiredHold, HoldError>;

    /// Remove the hold on a seat if (and only if) `session_id` owns it.
    async fn release(
        &self,
        event_id: &EventId,
        seat_id: &SeatId,
        session_id: &SessionId,
    ) -> Result<ReleaseOutcome, RepositoryError>;

    /// Snapshot of the live (non-expired) holds of an event, in no particular order.
    async fn list_live(&self, event_id: &EventId, now: Timestamp)
    -> Result<Vec<Hold>, RepositoryError>;

    /// Remove and return every hold whose deadline is `<= now`.
    ///
    /// A hold is returned by at most one call.
    async fn take_expired(&self, now: Timestamp) -> Result<Vec<Hold>, RepositoryError>;

    /// Remove and return every hold owned by `session_id`, across all events.
    async fn release_all_for_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Hold>, RepositoryError>;

    /// Atomically convert the session's live holds on `seat_ids` into
    /// permanent booked markers. All-or-nothing.
    ///
    /// # Errors
    ///
    /// `NotHeldBySession` naming the first seat the session does not hold live.
    async fn convert_to_booked(
        &self,
        event_id: &EventId,
        seat_ids: &[SeatId],
        session_id: &SessionId,
        now: Timestamp,
    ) -> Result<Vec<Hold>, HoldError>;

    /// Undo `convert_to_booked`, restoring the given holds.
    async fn rollback_booked(&self, holds: Vec<Hold>) -> Result<(), RepositoryError>;
}

/// Seat Store: durable record of every seat's status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeatRepository: Send + Sync {
    /// Seats of an event that belong to a ticket type, ordered by row then number.
    async fn get_seats_for_ticket_type(
        &self,
        event_id: &EventId,
        ticket_type_id: &TicketTypeId,
    ) -> Result<Vec<Seat>, RepositoryError>;

    /// A single seat; `Ok(None)` when the seat is not part of the event.
    async fn get_seat(
        &self,
        event_id: &EventId,
        seat_id: &SeatId,
    ) -> Result<Option<Seat>, RepositoryError>;

    /// Whether the store knows any seat for the event.
    async fn event_exists(&self, event_id: &EventId) -> Result<bool, RepositoryError>;

    /// Durably mark seats as booked. All-or-nothing.
    async fn mark_booked(
        &self,
        event_id: &EventId,
        seat_ids: &[SeatId],
    ) -> Result<(), RepositoryError>;
}

/// Channel Manager: live connections and per-event rooms.
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Register a connection and the channel used to write to it.
    async fn register_session(
        &self,
        session_id: SessionId,
        sender: UnboundedSender<Notification>,
    ) -> Result<(), RepositoryError>;

    /// Add a registered session to an event room. Idempotent.
    async fn join(&self, session_id: &SessionId, event_id: &EventId)
    -> Result<(), RepositoryError>;

    /// Remove a session from an event room. Returns whether it was a member.
    async fn leave(&self, session_id: &SessionId, event_id: &EventId) -> bool;

    /// Deliver `notification` to every member of the room except `exclude`.
    /// Returns the number of sessions it was queued for.
    async fn broadcast(
        &self,
        event_id: &EventId,
        notification: &Notification,
        exclude: Option<&SessionId>,
    ) -> usize;

    /// Deliver `notification` to one session. Returns whether it was queued.
    async fn send_to(&self, session_id: &SessionId, notification: &Notification) -> bool;

    /// Drop a connection: leave every room and unregister.
    /// Returns the rooms the session was in.
    async fn disconnect_all(&self, session_id: &SessionId) -> Vec<EventId>;

    /// Members of an event room.
    async fn members(&self, event_id: &EventId) -> Vec<SessionId>;

    async fn is_connected(&self, session_id: &SessionId) -> bool;

    async fn count_connected_sessions(&self) -> usize;
}
