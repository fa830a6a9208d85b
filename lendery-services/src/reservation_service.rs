//! Reservation Request Creation
//!
//! Business logic for creating reservation requests: listing and reserver
//! lookup, overlap validation against the listing's calendar, and
//! transactional persistence of the new request.

use lendery_core::{
    LenderyResult, ListingId, ReservationError, ReservationPeriod, ReservationRequest,
    ReservationRequestRef, StorageError,
};
use lendery_storage::{
    ListingReadRepository, ReservationRequestReadRepository, ReservationRequestUnitOfWork,
    UserReadRepository,
};
use std::sync::Arc;

/// Command to create a reservation request.
///
/// The period is a validated `ReservationPeriod`, so a malformed interval
/// (start after end) is rejected before the command can even be built.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReservationRequest {
    pub listing_id: ListingId,
    pub reserver_email: String,
    pub reservation_period: ReservationPeriod,
}

/// Creates reservation requests against listings.
pub struct ReservationRequestCreator {
    listings: Arc<dyn ListingReadRepository>,
    users: Arc<dyn UserReadRepository>,
    reservation_requests: Arc<dyn ReservationRequestReadRepository>,
    reservation_uow: Arc<dyn ReservationRequestUnitOfWork>,
}

impl ReservationRequestCreator {
    pub fn new(
        listings: Arc<dyn ListingReadRepository>,
        users: Arc<dyn UserReadRepository>,
        reservation_requests: Arc<dyn ReservationRequestReadRepository>,
        reservation_uow: Arc<dyn ReservationRequestUnitOfWork>,
    ) -> Self {
        Self {
            listings,
            users,
            reservation_requests,
            reservation_uow,
        }
    }

    /// Create a new reservation request.
    ///
    /// Steps, in order, each a hard stop with no partial creation:
    /// 1. Listing lookup — absent listing fails with `ListingNotFound`.
    /// 2. Reserver lookup by email — absent fails with `ReserverNotFound`.
    /// 3. Overlap query against active requests for the listing — any hit
    ///    fails with `OverlappingReservationPeriod`.
    /// 4. One scoped transaction persisting the request in `Requested`.
    /// 5. A persistence failure surfaces as `PersistenceFailure`.
    ///
    /// There is no retry here: a concurrent creator can pass the overlap
    /// check for the same window; the storage layer's own concurrency
    /// control is the backstop.
    pub async fn create(
        &self,
        command: CreateReservationRequest,
    ) -> LenderyResult<ReservationRequestRef> {
        let listing = self
            .listings
            .get_by_id(command.listing_id)
            .await?
            .ok_or(ReservationError::ListingNotFound {
                listing_id: command.listing_id,
            })?;

        let reserver = self
            .users
            .get_by_email(&command.reserver_email)
            .await?
            .ok_or_else(|| ReservationError::ReserverNotFound {
                email: command.reserver_email.clone(),
            })?;

        let overlapping = self
            .reservation_requests
            .get_overlapping_active(listing.listing_id, &command.reservation_period)
            .await?;
        if !overlapping.is_empty() {
            return Err(ReservationError::OverlappingReservationPeriod {
                listing_id: listing.listing_id,
                period: command.reservation_period,
            }
            .into());
        }

        let request = ReservationRequest::new(
            listing.listing_id,
            reserver.user_id,
            command.reservation_period,
        );
        let saved = self.persist(&request).await.map_err(|source| {
            ReservationError::PersistenceFailure {
                reason: source.to_string(),
            }
        })?;

        tracing::info!(
            reservation_request_id = %saved.reservation_request_id,
            listing_id = %listing.listing_id,
            reserver_id = %reserver.user_id,
            period = %saved.reservation_period,
            "Reservation request created"
        );
        Ok(saved)
    }

    async fn persist(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationRequestRef, StorageError> {
        let mut txn = self.reservation_uow.begin().await?;
        let saved = txn.insert(request).await?;
        txn.commit().await?;
        Ok(saved)
    }
}

// ============================================================================
// TESTS
// ============================================================================
