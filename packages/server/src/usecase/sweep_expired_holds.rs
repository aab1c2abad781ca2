//! UseCase: 期限切れホールドの回収（Expiry Sweeper の 1 tick 分）

use std::sync::Arc;

use crate::{
    common::clock::Clock,
    domain::{Hold, HoldRepository, RepositoryError, RoomRepository},
};

use super::notify::Notifier;

/// 期限切れホールド回収のユースケース
pub struct SweepExpiredHoldsUseCase {
    holds: Arc<dyn HoldRepository>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl SweepExpiredHoldsUseCase {
    pub fn new(
        holds: Arc<dyn HoldRepository>,
        rooms: Arc<dyn RoomRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            holds,
            notifier: Notifier::new(rooms),
            clock,
        }
    }

    /// Remove every hold past its deadline and announce each one once.
    ///
    /// # Errors
    ///
    /// Store failures are returned unchanged; the caller retries next tick.
    pub async fn execute(&self) -> Result<Vec<Hold>, RepositoryError> {
        let expired = self.holds.take_expired(self.clock.now()).await?;
        for hold in &expired {
            self.notifier.notify_expired(hold).await;
            tracing::info!(
                "Hold on seat '{}' of event '{}' by session '{}' expired",
                hold.seat_id,
                hold.event_id,
                hold.session_id
            );
        }
        Ok(expired)
    }
}
