//! Conversation Retention Sweeps
//!
//! Two sweep variants share one algorithm shape: fetch the batch of
//! archived source aggregates, then schedule each aggregate's
//! conversations for deletion inside a fresh conversation-scoped
//! transaction. One aggregate failing never stops the rest of the batch;
//! only the initial batch fetch is fatal.
//!
//! The variants differ in the source aggregate and the anchor-date rule:
//! archived listings anchor on their `updated_at`, closed reservation
//! requests anchor on the reservation's natural completion date.

use crate::jobs::report::RetentionSweepReport;
use chrono::NaiveDate;
use lendery_core::{
    AggregateKind, Conversation, EntityId, LenderyError, LenderyResult, Listing, ListingState,
    ReservationRequest, ReservationRequestState,
};
use lendery_storage::{
    ConversationReadRepository, ConversationUnitOfWork, ListingReadRepository,
    ReservationRequestReadRepository,
};
use std::sync::Arc;

/// Schedules conversations of archived listings and reservation requests
/// for deletion.
pub struct ConversationRetentionScheduler {
    listings: Arc<dyn ListingReadRepository>,
    reservation_requests: Arc<dyn ReservationRequestReadRepository>,
    conversations: Arc<dyn ConversationReadRepository>,
    conversation_uow: Arc<dyn ConversationUnitOfWork>,
}

impl ConversationRetentionScheduler {
    pub fn new(
        listings: Arc<dyn ListingReadRepository>,
        reservation_requests: Arc<dyn ReservationRequestReadRepository>,
        conversations: Arc<dyn ConversationReadRepository>,
        conversation_uow: Arc<dyn ConversationUnitOfWork>,
    ) -> Self {
        Self {
            listings,
            reservation_requests,
            conversations,
            conversation_uow,
        }
    }

    /// Sweep conversations of archived listings (`Expired`, `Cancelled`).
    ///
    /// Anchor: the listing's `updated_at`, the moment the listing left the
    /// marketplace.
    ///
    /// # Errors
    /// Only a failure to fetch the listing batch itself is fatal;
    /// per-listing failures land in the report's `errors`.
    pub async fn run_listing_sweep(&self) -> LenderyResult<RetentionSweepReport> {
        let listings = self.listings.get_by_states(&ListingState::ARCHIVED).await?;
        tracing::debug!(count = listings.len(), "Listing retention sweep started");

        let mut report = RetentionSweepReport::new();
        for listing in &listings {
            if let Err(e) = self.process_listing(listing, &mut report).await {
                record_sweep_failure(&mut report, AggregateKind::Listing, listing.listing_id, &e);
            }
        }

        tracing::info!(
            processed = report.processed_count,
            scheduled = report.scheduled_count,
            errors = report.errors.len(),
            "Listing retention sweep finished"
        );
        Ok(report)
    }

    /// Sweep conversations of archived reservation requests (`Closed`,
    /// `Rejected`, `Cancelled`).
    ///
    /// Anchor: `reservation_period.end` for `Closed` requests (the
    /// reservation's natural completion date); `updated_at` otherwise.
    ///
    /// # Errors
    /// Only a failure to fetch the request batch itself is fatal;
    /// per-request failures land in the report's `errors`.
    pub async fn run_reservation_sweep(&self) -> LenderyResult<RetentionSweepReport> {
        let requests = self
            .reservation_requests
            .get_by_states(&ReservationRequestState::ARCHIVED)
            .await?;
        tracing::debug!(count = requests.len(), "Reservation retention sweep started");

        let mut report = RetentionSweepReport::new();
        for request in &requests {
            if let Err(e) = self.process_reservation_request(request, &mut report).await {
                record_sweep_failure(
                    &mut report,
                    AggregateKind::ReservationRequest,
                    request.reservation_request_id,
                    &e,
                );
            }
        }

        tracing::info!(
            processed = report.processed_count,
            scheduled = report.scheduled_count,
            errors = report.errors.len(),
            "Reservation retention sweep finished"
        );
        Ok(report)
    }

    async fn process_listing(
        &self,
        listing: &Listing,
        report: &mut RetentionSweepReport,
    ) -> LenderyResult<()> {
        let conversations = self
            .conversations
            .get_by_listing_id(listing.listing_id)
            .await?;
        self.schedule_conversations(conversations, listing.updated_at.date_naive(), report)
            .await
    }

    async fn process_reservation_request(
        &self,
        request: &ReservationRequest,
        report: &mut RetentionSweepReport,
    ) -> LenderyResult<()> {
        let conversations = self
            .conversations
            .get_by_reservation_request_id(request.reservation_request_id)
            .await?;
        self.schedule_conversations(conversations, anchor_for(request), report)
            .await
    }

    /// Schedule every not-yet-expiring conversation relative to `anchor`,
    /// one scoped transaction per conversation.
    async fn schedule_conversations(
        &self,
        conversations: Vec<Conversation>,
        anchor: NaiveDate,
        report: &mut RetentionSweepReport,
    ) -> LenderyResult<()> {
        for conversation in conversations {
            report.record_processed();
            if conversation.expires_at.is_some() {
                continue;
            }

            let mut txn = self.conversation_uow.begin().await?;
            let mut current = txn.get(conversation.conversation_id).await?;
            // Re-check against the transactional read: a concurrent sweep
            // may have scheduled this conversation in the meantime.
            if current.schedule_for_deletion(anchor) {
                txn.save(&current).await?;
                txn.commit().await?;
                report.record_scheduled();
                tracing::debug!(
                    conversation_id = %current.conversation_id,
                    expires_at = ?current.expires_at,
                    "Conversation scheduled for deletion"
                );
            }
        }
        Ok(())
    }
}

/// Anchor date for a reservation request's conversations.
fn anchor_for(request: &ReservationRequest) -> NaiveDate {
    match request.state {
        // A closed reservation completed on its last reserved day.
        ReservationRequestState::Closed => request.reservation_period.end(),
        // Rejected/Cancelled requests never completed; updated_at stands in
        // for the moment the request was archived and can drift if the
        // record is touched again later.
        _ => request.updated_at.date_naive(),
    }
}

fn record_sweep_failure(
    report: &mut RetentionSweepReport,
    kind: AggregateKind,
    id: EntityId,
    error: &LenderyError,
) {
    tracing::warn!(kind = %kind, id = %id, error = %error, "Retention sweep item failed");
    report.record_failure(format!(
        "Failed to process conversations for {} {}: {}",
        kind.label(),
        id,
        error
    ));
}

// ============================================================================
// TESTS
// ============================================================================
