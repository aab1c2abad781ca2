//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Identifier validation error
    #[error("{kind} cannot be empty")]
    IdEmpty { kind: &'static str },

    /// Identifier too long error
    #[error("{kind} cannot exceed {max} characters (got {actual})")]
    IdTooLong {
        kind: &'static str,
        max: usize,
        actual: usize,
    },

    /// SessionId invalid format error (not a valid UUID format)
    #[error("SessionId must be a valid UUID format (got: {0})")]
    SessionIdInvalidFormat(String),

    /// Seat number must be positive
    #[error("Seat number must be greater than zero")]
    SeatNumberNotPositive,
}

/// Errors raised by the backing stores (Hold Table, Seat Store, Channel Manager)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Store temporarily unreachable; the caller may retry
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Session is not registered with the channel manager
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// Session id is already registered
    #[error("session already registered: {0}")]
    DuplicateSession(String),

    /// Seat does not exist in the seat store
    #[error("seat {seat_id} not found for event {event_id}")]
    SeatNotFound { event_id: String, seat_id: String },

    /// The same seat was loaded twice
    #[error("seat {seat_id} defined twice for event {event_id}")]
    DuplicateSeat { event_id: String, seat_id: String },
}

/// Errors from Hold Table mutations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HoldError {
    /// Another session holds a live hold on the seat
    #[error("seat {0} is already held")]
    AlreadyHeld(String),

    /// The seat has been converted into a booking
    #[error("seat is already booked")]
    AlreadyBooked,

    /// Booking conversion found a seat that is not held by the booking session
    #[error("seat {0} is not held by the booking session")]
    NotHeldBySession(String),

    /// Backing store failure
    #[error(transparent)]
    Store(#[from] RepositoryError),
}
