//! WebSocket message DTOs for the seat reservation protocol.
//!
//! Every frame is a JSON object tagged by `type`:
//!
//! ```json
//! {"type": "select_seat", "event_id": "E1", "seat_id": "A-1"}
//! {"type": "seat_lock_confirmed", "event_id": "E1", "seat_id": "A-1", "expires_at": 1700000000000}
//! ```
//!
//! Timestamps are Unix milliseconds (UTC).

use serde::{Deserialize, Serialize};

use crate::domain::{ErrorCode, LockFailureReason, Notification, SeatTimer};

/// Client → Server intents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinEvent { event_id: String },
    LeaveEvent { event_id: String },
    SelectSeat { event_id: String, seat_id: String },
    DeselectSeat { event_id: String, seat_id: String },
}

/// Remaining time of one live hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatTimerDto {
    pub seat_id: String,
    pub remaining_seconds: u64,
    pub expires_at: i64,
}

impl From<SeatTimer> for SeatTimerDto {
    fn from(timer: SeatTimer) -> Self {
        Self {
            seat_id: timer.seat_id.into_string(),
            remaining_seconds: timer.remaining_seconds,
            expires_at: timer.expires_at.value(),
        }
    }
}

/// Server → Client messages, both direct replies and room broadcasts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// First frame of every connection
    SessionEstablished { session_id: String },
    /// Snapshot of live holds, sent on join
    SeatTimers {
        event_id: String,
        seats: Vec<SeatTimerDto>,
    },
    SeatLockConfirmed {
        event_id: String,
        seat_id: String,
        expires_at: i64,
    },
    SeatLockFailed {
        event_id: String,
        seat_id: String,
        reason: LockFailureReason,
    },
    SeatDeselectConfirmed { event_id: String, seat_id: String },
    /// Broadcast: another session now holds the seat
    SeatLocked { event_id: String, seat_id: String },
    /// Broadcast: the holder released the seat
    SeatUnlocked { event_id: String, seat_id: String },
    /// Broadcast: the hold timed out
    SeatExpired { event_id: String, seat_id: String },
    /// Broadcast: the seat was sold
    SeatBooked { event_id: String, seat_id: String },
    Error { code: ErrorCode, message: String },
}

impl From<Notification> for ServerMessage {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::SessionEstablished { session_id } => Self::SessionEstablished {
                session_id: session_id.into_string(),
            },
            Notification::SeatTimers { event_id, seats } => Self::SeatTimers {
                event_id: event_id.into_string(),
                seats: seats.into_iter().map(SeatTimerDto::from).collect(),
            },
            Notification::SeatLockConfirmed {
                event_id,
                seat_id,
                expires_at,
            } => Self::SeatLockConfirmed {
                event_id: event_id.into_string(),
                seat_id: seat_id.into_string(),
                expires_at: expires_at.value(),
            },
            Notification::SeatLockFailed {
                event_id,
                seat_id,
                reason,
            } => Self::SeatLockFailed {
                event_id,
                seat_id,
                reason,
            },
            Notification::SeatDeselectConfirmed { event_id, seat_id } => {
                Self::SeatDeselectConfirmed {
                    event_id: event_id.into_string(),
                    seat_id: seat_id.into_string(),
                }
            }
            Notification::SeatLocked { event_id, seat_id } => Self::SeatLocked {
                event_id: event_id.into_string(),
                seat_id: seat_id.into_string(),
            },
            Notification::SeatUnlocked { event_id, seat_id } => Self::SeatUnlocked {
                event_id: event_id.into_string(),
                seat_id: seat_id.into_string(),
            },
            Notification::SeatExpired { event_id, seat_id } => Self::SeatExpired {
                event_id: event_id.into_string(),
                seat_id: seat_id.into_string(),
            },
            Notification::SeatBooked { event_id, seat_id } => Self::SeatBooked {
                event_id: event_id.into_string(),
                seat_id: seat_id.into_string(),
            },
            Notification::Rejected { code, message } => Self::Error { code, message },
        }
    }
}
