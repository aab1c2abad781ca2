//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{ErrorCode, HoldError, LockFailureReason, RepositoryError};

/// Errors when joining an event room
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JoinEventError {
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("session is not registered: {0}")]
    SessionNotRegistered(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors when selecting a seat (AcquisitionConflict and friends)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectSeatError {
    #[error("seat is already held")]
    AlreadyHeld,

    #[error("seat is already booked")]
    AlreadyBooked,

    #[error("unknown seat: {0}")]
    UnknownSeat(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl SelectSeatError {
    /// Reason code reported to the client
    pub fn reason(&self) -> LockFailureReason {
        match self {
            Self::AlreadyHeld => LockFailureReason::AlreadyHeld,
            Self::AlreadyBooked => LockFailureReason::AlreadyBooked,
            Self::UnknownSeat(_) => LockFailureReason::UnknownSeat,
            Self::Unavailable(_) => LockFailureReason::Unavailable,
        }
    }
}

impl From<HoldError> for SelectSeatError {
    fn from(err: HoldError) -> Self {
        match err {
            HoldError::AlreadyHeld(_) => Self::AlreadyHeld,
            HoldError::AlreadyBooked => Self::AlreadyBooked,
            HoldError::NotHeldBySession(seat_id) => Self::UnknownSeat(seat_id),
            HoldError::Store(e) => Self::Unavailable(e.to_string()),
        }
    }
}

/// Errors when deselecting a seat
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeselectSeatError {
    /// The seat is held by another session
    #[error("seat {0} is held by another session")]
    OwnershipViolation(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by the booking confirmation hook
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("no seats to book")]
    EmptySelection,

    #[error("seat {0} is not held by the booking session")]
    SeatNotHeld(String),

    #[error("seat is already booked")]
    AlreadyBooked,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<HoldError> for BookingError {
    fn from(err: HoldError) -> Self {
        match err {
            HoldError::AlreadyHeld(seat_id) => Self::SeatNotHeld(seat_id),
            HoldError::AlreadyBooked => Self::AlreadyBooked,
            HoldError::NotHeldBySession(seat_id) => Self::SeatNotHeld(seat_id),
            HoldError::Store(e) => Self::Unavailable(e.to_string()),
        }
    }
}

impl From<RepositoryError> for BookingError {
    fn from(err: RepositoryError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Malformed or out-of-state intents, rejected to the sender only
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(String),

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("not in an event room")]
    NotInRoom,

    #[error("session is viewing event {current}, not {requested}")]
    WrongEvent { current: String, requested: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl ProtocolError {
    /// Error code reported to the client
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Malformed(_) => ErrorCode::MalformedMessage,
            Self::UnknownEvent(_) => ErrorCode::UnknownEvent,
            Self::NotInRoom => ErrorCode::NotInRoom,
            Self::WrongEvent { .. } => ErrorCode::WrongEvent,
            Self::Unavailable(_) => ErrorCode::Unavailable,
        }
    }
}

impl From<JoinEventError> for ProtocolError {
    fn from(err: JoinEventError) -> Self {
        match err {
            JoinEventError::UnknownEvent(event_id) => Self::UnknownEvent(event_id),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
