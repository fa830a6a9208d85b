//! Expired Reservation Request Purge
//!
//! Hard-deletes reservation requests that have sat in the terminal
//! `Closed` state past the retention window. The deletion itself is a
//! domain-level marker (`request_delete`) persisted through the scoped
//! transaction; the repository detects the marker and performs the actual
//! removal.

use chrono::{Months, Utc};
use lendery_core::{
    LenderyResult, ReservationRequestId, Timestamp, RESERVATION_RETENTION_MONTHS,
};
use lendery_storage::{ReservationRequestReadRepository, ReservationRequestUnitOfWork};
use std::sync::Arc;

/// Hard-deletes reservation requests closed for at least
/// [`RESERVATION_RETENTION_MONTHS`].
pub struct ExpiredReservationPurger {
    reservation_requests: Arc<dyn ReservationRequestReadRepository>,
    reservation_uow: Arc<dyn ReservationRequestUnitOfWork>,
}

impl ExpiredReservationPurger {
    pub fn new(
        reservation_requests: Arc<dyn ReservationRequestReadRepository>,
        reservation_uow: Arc<dyn ReservationRequestUnitOfWork>,
    ) -> Self {
        Self {
            reservation_requests,
            reservation_uow,
        }
    }

    /// Run one purge sweep.
    ///
    /// Returns the number of requests successfully deleted, not the number
    /// attempted: a per-item failure is logged, skipped, and does not
    /// reduce the count contributed by the others.
    ///
    /// # Errors
    /// Only a failure to fetch the expired batch itself is fatal.
    pub async fn run(&self) -> LenderyResult<u64> {
        let cutoff = retention_cutoff(Utc::now());
        let expired = self.reservation_requests.get_expired_closed(cutoff).await?;
        tracing::debug!(count = expired.len(), "Reservation purge sweep started");

        let mut deleted = 0u64;
        for request in &expired {
            match self.purge(request.reservation_request_id).await {
                Ok(()) => {
                    deleted += 1;
                    tracing::debug!(
                        reservation_request_id = %request.reservation_request_id,
                        "Expired reservation request deleted"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        reservation_request_id = %request.reservation_request_id,
                        error = %e,
                        "Failed to delete expired reservation request"
                    );
                }
            }
        }

        if deleted > 0 {
            tracing::info!(deleted, "Expired reservation requests purged");
        }
        Ok(deleted)
    }

    async fn purge(&self, id: ReservationRequestId) -> LenderyResult<()> {
        let mut txn = self.reservation_uow.begin().await?;
        let mut request = txn.get(id).await?;
        request.request_delete();
        txn.save(&request).await?;
        txn.commit().await?;
        Ok(())
    }
}

/// Cutoff before which a closed request counts as expired.
/// Saturates to `now` on calendar underflow.
fn retention_cutoff(now: Timestamp) -> Timestamp {
    now.checked_sub_months(Months::new(RESERVATION_RETENTION_MONTHS))
        .unwrap_or(now)
}

// ============================================================================
// TESTS
// ============================================================================
