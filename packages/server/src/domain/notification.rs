//! Messages the coordinator pushes to sessions.
//!
//! Use cases describe what happened with a [`Notification`]; the channel
//! manager routes it, and the ui layer renders it for the wire.

use serde::{Deserialize, Serialize};

use super::{
    entity::Hold,
    value_object::{EventId, SeatId, SessionId, Timestamp},
};

/// Why a seat selection was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockFailureReason {
    AlreadyHeld,
    AlreadyBooked,
    UnknownSeat,
    NotInRoom,
    Unavailable,
}

/// Category of a rejected protocol message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MalformedMessage,
    UnknownEvent,
    NotInRoom,
    WrongEvent,
    Unavailable,
}

/// Remaining time of one live hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatTimer {
    pub seat_id: SeatId,
    pub remaining_seconds: u64,
    pub expires_at: Timestamp,
}

impl SeatTimer {
    pub fn from_hold(hold: &Hold, now: Timestamp) -> Self {
        Self {
            seat_id: hold.seat_id.clone(),
            remaining_seconds: hold.remaining_seconds(now),
            expires_at: hold.expires_at,
        }
    }
}

/// Something a session should be told, either directly or as a room broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// First message of every connection
    SessionEstablished { session_id: SessionId },
    /// Live holds of a room, sent on join
    SeatTimers {
        event_id: EventId,
        seats: Vec<SeatTimer>,
    },
    SeatLockConfirmed {
        event_id: EventId,
        seat_id: SeatId,
        expires_at: Timestamp,
    },
    /// Carries the ids as the client sent them, which may not be valid ids
    SeatLockFailed {
        event_id: String,
        seat_id: String,
        reason: LockFailureReason,
    },
    SeatDeselectConfirmed { event_id: EventId, seat_id: SeatId },
    /// Another session now holds the seat
    SeatLocked { event_id: EventId, seat_id: SeatId },
    /// The holder released the seat
    SeatUnlocked { event_id: EventId, seat_id: SeatId },
    /// The hold timed out
    SeatExpired { event_id: EventId, seat_id: SeatId },
    /// The seat was sold
    SeatBooked { event_id: EventId, seat_id: SeatId },
    Rejected { code: ErrorCode, message: String },
}

impl Notification {
    pub fn seat_locked(hold: &Hold) -> Self {
        Self::SeatLocked {
            event_id: hold.event_id.clone(),
            seat_id: hold.seat_id.clone(),
        }
    }

    pub fn seat_unlocked(hold: &Hold) -> Self {
        Self::SeatUnlocked {
            event_id: hold.event_id.clone(),
            seat_id: hold.seat_id.clone(),
        }
    }

    pub fn seat_expired(hold: &Hold) -> Self {
        Self::SeatExpired {
            event_id: hold.event_id.clone(),
            seat_id: hold.seat_id.clone(),
        }
    }

    pub fn seat_booked(hold: &Hold) -> Self {
        Self::SeatBooked {
            event_id: hold.event_id.clone(),
            seat_id: hold.seat_id.clone(),
        }
    }

    pub fn rejected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }
}
