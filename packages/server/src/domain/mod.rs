//! Domain layer for the seat reservation coordinator.
//!
//! This module contains the hold/seat model and the repository traits the
//! use cases depend on. It knows nothing about websockets, JSON or axum.

pub mod entity;
pub mod error;
pub mod factory;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use entity::{AcquiredHold, Hold, ReleaseOutcome, Seat, SeatStatus, effective_status};
pub use error::{HoldError, RepositoryError, ValueObjectError};
pub use factory::SessionIdFactory;
pub use notification::{ErrorCode, LockFailureReason, Notification, SeatTimer};
pub use repository::{HoldRepository, RoomRepository, SeatRepository};
#[cfg(test)]
pub use repository::MockSeatRepository;
pub use value_object::{EventId, SeatId, SessionId, TicketTypeId, Timestamp};
