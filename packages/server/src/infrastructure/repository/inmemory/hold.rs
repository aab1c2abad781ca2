//! InMemory Hold Table 実装
//!
//! ドメイン層が定義する HoldRepository trait の具体的な実装。
//!
//! Claims are partitioned per event: the outer map is only locked long enough
//! to find (or create) the event's partition, and every mutation of a seat
//! happens while holding that partition's mutex. This serialises all
//! acquisitions for the same event without blocking unrelated events. No I/O
//! is performed while a partition lock is held.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    AcquiredHold, EventId, Hold, HoldError, HoldRepository, ReleaseOutcome, RepositoryError,
    SeatId, SessionId, Timestamp,
};

/// State of a seat inside the hold table
#[derive(Debug, Clone)]
enum SeatClaim {
    Held(Hold),
    /// Converted to a booking; the seat can never be held again
    Booked,
}

type EventClaims = HashMap<SeatId, SeatClaim>;

/// インメモリ Hold Table 実装
#[derive(Default)]
pub struct InMemoryHoldRepository {
    events: RwLock<HashMap<EventId, Arc<Mutex<EventClaims>>>>,
}

impl InMemoryHoldRepository {
    /// 新しい InMemoryHoldRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    async fn partition(&self, event_id: &EventId) -> Arc<Mutex<EventClaims>> {
        if let Some(partition) = self.events.read().await.get(event_id) {
            return partition.clone();
        }
        let mut events = self.events.write().await;
        events.entry(event_id.clone()).or_default().clone()
    }

    async fn existing_partition(&self, event_id: &EventId) -> Option<Arc<Mutex<EventClaims>>> {
        self.events.read().await.get(event_id).cloned()
    }

    async fn all_partitions(&self) -> Vec<Arc<Mutex<EventClaims>>> {
        self.events.read().await.values().cloned().collect()
    }

    /// Number of holds currently stored, expired or not
    pub async fn count_holds(&self) -> usize {
        let mut count = 0;
        for partition in self.all_partitions().await {
            count += partition
                .lock()
                .await
                .values()
                .filter(|claim| matches!(claim, SeatClaim::Held(_)))
                .count();
        }
        count
    }
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

#[async_trait]
impl HoldRepository for InMemoryHoldRepository {
    async fn try_acquire(
        &self,
        event_id: &EventId,
        seat_id: &SeatId,
        session_id: &SessionId,
        now: Timestamp,
        ttl: Duration,
    ) -> Result<AcquiredHold, HoldError> {
        let partition = self.partition(event_id).await;
        let mut claims = partition.lock().await;

        let displaced = match claims.get(seat_id) {
            Some(SeatClaim::Booked) => return Err(HoldError::AlreadyBooked),
            Some(SeatClaim::Held(existing)) if !existing.is_expired(now) => {
                return Err(HoldError::AlreadyHeld(seat_id.to_string()));
            }
            Some(SeatClaim::Held(expired)) => Some(expired.clone()),
            None => None,
        };

        let hold = Hold::new(
            event_id.clone(),
            seat_id.clone(),
            session_id.clone(),
            now,
            ttl_millis(ttl),
        );
        claims.insert(seat_id.clone(), SeatClaim::Held(hold.clone()));

        Ok(AcquiredHold { hold, displaced })
    }

    async fn release(
        &self,
        event_id: &EventId,
        seat_id: &SeatId,
        session_id: &SessionId,
    ) -> Result<ReleaseOutcome, RepositoryError> {
        let Some(partition) = self.existing_partition(event_id).await else {
            return Ok(ReleaseOutcome::NotFound);
        };
        let mut claims = partition.lock().await;

        let owned = match claims.get(seat_id) {
            Some(SeatClaim::Held(hold)) => hold.is_held_by(session_id),
            Some(SeatClaim::Booked) | None => return Ok(ReleaseOutcome::NotFound),
        };
        if !owned {
            return Ok(ReleaseOutcome::NotOwner);
        }

        match claims.remove(seat_id) {
            Some(SeatClaim::Held(hold)) => Ok(ReleaseOutcome::Released(hold)),
            _ => Ok(ReleaseOutcome::NotFound),
        }
    }

    async fn list_live(
        &self,
        event_id: &EventId,
        now: Timestamp,
    ) -> Result<Vec<Hold>, RepositoryError> {
        let Some(partition) = self.existing_partition(event_id).await else {
            return Ok(Vec::new());
        };
        let claims = partition.lock().await;
        Ok(claims
            .values()
            .filter_map(|claim| match claim {
                SeatClaim::Held(hold) if !hold.is_expired(now) => Some(hold.clone()),
                _ => None,
            })
            .collect())
    }

    async fn take_expired(&self, now: Timestamp) -> Result<Vec<Hold>, RepositoryError> {
        let mut expired = Vec::new();
        for partition in self.all_partitions().await {
            let mut claims = partition.lock().await;
            let seat_ids: Vec<SeatId> = claims
                .iter()
                .filter_map(|(seat_id, claim)| match claim {
                    SeatClaim::Held(hold) if hold.is_expired(now) => Some(seat_id.clone()),
                    _ => None,
                })
                .collect();
            // removed under the same lock that found them, so no hold is reported twice
            for seat_id in seat_ids {
                if let Some(SeatClaim::Held(hold)) = claims.remove(&seat_id) {
                    expired.push(hold);
                }
            }
        }
        Ok(expired)
    }

    async fn release_all_for_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Hold>, RepositoryError> {
        let mut released = Vec::new();
        for partition in self.all_partitions().await {
            let mut claims = partition.lock().await;
            let seat_ids: Vec<SeatId> = claims
                .iter()
                .filter_map(|(seat_id, claim)| match claim {
                    SeatClaim::Held(hold) if hold.is_held_by(session_id) => Some(seat_id.clone()),
                    _ => None,
                })
                .collect();
            for seat_id in seat_ids {
                if let Some(SeatClaim::Held(hold)) = claims.remove(&seat_id) {
                    released.push(hold);
                }
            }
        }
        Ok(released)
    }

    async fn convert_to_booked(
        &self,
        event_id: &EventId,
        seat_ids: &[SeatId],
        session_id: &SessionId,
        now: Timestamp,
    ) -> Result<Vec<Hold>, HoldError> {
        let Some(partition) = self.existing_partition(event_id).await else {
            // nothing was ever held for this event
            return match seat_ids.first() {
                Some(seat_id) => Err(HoldError::NotHeldBySession(seat_id.to_string())),
                None => Ok(Vec::new()),
            };
        };
        let mut claims = partition.lock().await;

        // validate everything before touching anything
        for seat_id in seat_ids {
            match claims.get(seat_id) {
                Some(SeatClaim::Held(hold))
                    if hold.is_held_by(session_id) && !hold.is_expired(now) => {}
                Some(SeatClaim::Booked) => return Err(HoldError::AlreadyBooked),
                _ => return Err(HoldError::NotHeldBySession(seat_id.to_string())),
            }
        }

        let mut converted = Vec::with_capacity(seat_ids.len());
        for seat_id in seat_ids {
            if let Some(SeatClaim::Held(hold)) = claims.insert(seat_id.clone(), SeatClaim::Booked) {
                converted.push(hold);
            }
        }
        Ok(converted)
    }

    async fn rollback_booked(&self, holds: Vec<Hold>) -> Result<(), RepositoryError> {
        for hold in holds {
            let partition = self.partition(&hold.event_id).await;
            let mut claims = partition.lock().await;
            if matches!(claims.get(&hold.seat_id), Some(SeatClaim::Booked)) {
                claims.insert(hold.seat_id.clone(), SeatClaim::Held(hold));
            }
        }
        Ok(())
    }
}
