//! Core domain models for seat reservation.
//!
//! Seat availability is modelled as two layers: the durable [`SeatStatus`]
//! held by the seat store, and an overlay of ephemeral [`Hold`]s. The status a
//! viewer sees is always the join of the two, see [`effective_status`].

use serde::{Deserialize, Serialize};

use super::{
    error::ValueObjectError,
    value_object::{EventId, SeatId, SessionId, TicketTypeId, Timestamp},
};

/// Seat status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Held,
    Booked,
}

/// A seat being sold for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub seat_id: SeatId,
    pub event_id: EventId,
    pub row_label: String,
    pub number: u32,
    pub ticket_type_id: TicketTypeId,
    /// Durable status; never `Held` unless an external system wrote it
    pub status: SeatStatus,
}

impl Seat {
    /// Create a new seat
    ///
    /// # Errors
    ///
    /// Returns `ValueObjectError::SeatNumberNotPositive` when `number` is zero
    pub fn new(
        seat_id: SeatId,
        event_id: EventId,
        row_label: String,
        number: u32,
        ticket_type_id: TicketTypeId,
        status: SeatStatus,
    ) -> Result<Self, ValueObjectError> {
        if number == 0 {
            return Err(ValueObjectError::SeatNumberNotPositive);
        }
        Ok(Self {
            seat_id,
            event_id,
            row_label,
            number,
            ticket_type_id,
            status,
        })
    }

    pub fn is_booked(&self) -> bool {
        self.status == SeatStatus::Booked
    }
}

/// A time-bounded, exclusive claim on a seat by one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hold {
    pub event_id: EventId,
    pub seat_id: SeatId,
    /// The holder
    pub session_id: SessionId,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Hold {
    /// Create a hold that expires `ttl_millis` after `created_at`
    pub fn new(
        event_id: EventId,
        seat_id: SeatId,
        session_id: SessionId,
        created_at: Timestamp,
        ttl_millis: i64,
    ) -> Self {
        Self {
            event_id,
            seat_id,
            session_id,
            created_at,
            expires_at: created_at.plus_millis(ttl_millis),
        }
    }

    /// A hold is expired once `now` reaches its deadline
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }

    pub fn is_held_by(&self, session_id: &SessionId) -> bool {
        &self.session_id == session_id
    }

    /// Whole seconds left before expiry, rounded up so a live hold never reports 0
    pub fn remaining_seconds(&self, now: Timestamp) -> u64 {
        let millis = now.millis_until(self.expires_at);
        // millis_until never returns a negative value
        (millis as u64).div_ceil(1000)
    }
}

/// Result of a successful acquisition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquiredHold {
    /// The newly created hold
    pub hold: Hold,
    /// An expired hold on the same seat that had not been swept yet and was
    /// replaced by this acquisition
    pub displaced: Option<Hold>,
}

/// Result of a release request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The caller's hold was removed
    Released(Hold),
    /// The seat is held by another session; nothing changed
    NotOwner,
    /// No hold exists for the seat
    NotFound,
}

/// Availability as seen by viewers: the durable status overlaid with live holds
pub fn effective_status(seat: &Seat, live_hold: Option<&Hold>) -> SeatStatus {
    match (seat.status, live_hold) {
        (SeatStatus::Booked, _) => SeatStatus::Booked,
        (_, Some(_)) => SeatStatus::Held,
        (status, None) => status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::SessionIdFactory;

    fn seat(status: SeatStatus) -> Seat {
        Seat::new(
            SeatId::new("A-1".to_string()).unwrap(),
            EventId::new("E1".to_string()).unwrap(),
            "A".to_string(),
            1,
            TicketTypeId::new("standard".to_string()).unwrap(),
            status,
        )
        .unwrap()
    }

    fn hold(created_at: i64, ttl_millis: i64) -> Hold {
        Hold::new(
            EventId::new("E1".to_string()).unwrap(),
            SeatId::new("A-1".to_string()).unwrap(),
            SessionIdFactory::generate(),
            Timestamp::new(created_at),
            ttl_millis,
        )
    }

    #[test]
    fn test_seat_number_zero_rejected() {
        // テスト項目: 座席番号 0 はエラーになる
        // when (操作):
        let result = Seat::new(
            SeatId::new("A-0".to_string()).unwrap(),
            EventId::new("E1".to_string()).unwrap(),
            "A".to_string(),
            0,
            TicketTypeId::new("standard".to_string()).unwrap(),
            SeatStatus::Available,
        );

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::SeatNumberNotPositive));
    }

    #[test]
    fn test_hold_deadline() {
        // テスト項目: expires_at = created_at + TTL
        // when (操作):
        let hold = hold(10_000, 1_800_000);

        // then (期待する結果):
        assert_eq!(hold.expires_at, Timestamp::new(1_810_000));
        assert!(!hold.is_expired(Timestamp::new(1_809_999)));
        // 期限ちょうどで期限切れとみなす
        assert!(hold.is_expired(Timestamp::new(1_810_000)));
    }

    #[test]
    fn test_hold_remaining_seconds_rounds_up() {
        // テスト項目: 残り秒数は切り上げで、TTL を超えない
        let hold = hold(0, 1_800_000);

        assert_eq!(hold.remaining_seconds(Timestamp::new(0)), 1800);
        assert_eq!(hold.remaining_seconds(Timestamp::new(1)), 1800);
        assert_eq!(hold.remaining_seconds(Timestamp::new(1_799_001)), 1);
        assert_eq!(hold.remaining_seconds(Timestamp::new(1_800_000)), 0);
        assert_eq!(hold.remaining_seconds(Timestamp::new(2_000_000)), 0);
    }

    #[test]
    fn test_effective_status_overlay() {
        // テスト項目: 永続ステータスとホールドの合成
        let live = hold(0, 1_000);

        assert_eq!(effective_status(&seat(SeatStatus::Available), None), SeatStatus::Available);
        assert_eq!(
            effective_status(&seat(SeatStatus::Available), Some(&live)),
            SeatStatus::Held
        );
        // BOOKED はホールドより優先される
        assert_eq!(
            effective_status(&seat(SeatStatus::Booked), Some(&live)),
            SeatStatus::Booked
        );
    }
}
