//! Marketplace entities touched by the reservation and retention core.
//!
//! These are the aggregate shapes the core reads and mutates. Authoring of
//! listings and user accounts happens elsewhere; the fields here are the
//! ones the creation flow and the retention sweeps depend on.

use crate::identity::{ConversationId, ListingId, ReservationRequestId, Timestamp, UserId};
use crate::lifecycle::{ListingState, ReservationRequestState};
use crate::period::ReservationPeriod;
use chrono::{Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// RETENTION POLICY
// ============================================================================

/// Months a closed reservation request is retained before hard deletion.
pub const RESERVATION_RETENTION_MONTHS: u32 = 6;

/// Months a conversation outlives its anchor date before it expires.
pub const CONVERSATION_RETENTION_MONTHS: u32 = 6;

// ============================================================================
// AGGREGATE KIND
// ============================================================================

/// Aggregate discriminator for storage errors and sweep failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateKind {
    Listing,
    User,
    ReservationRequest,
    Conversation,
}

impl AggregateKind {
    /// Human-readable label used in failure messages.
    pub fn label(&self) -> &'static str {
        match self {
            AggregateKind::Listing => "listing",
            AggregateKind::User => "user",
            AggregateKind::ReservationRequest => "reservation request",
            AggregateKind::Conversation => "conversation",
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// LISTING
// ============================================================================

/// Listing - an item offered for sharing.
/// Only the fields the retention sweeps and overlap validation read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub listing_id: ListingId,
    pub sharer_id: UserId,
    pub title: String,
    pub state: ListingState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ============================================================================
// USER REFERENCE
// ============================================================================

/// Lightweight read-side reference to a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub user_id: UserId,
    pub email: String,
}

// ============================================================================
// RESERVATION REQUEST
// ============================================================================

/// ReservationRequest - one reservation proposal against a listing.
///
/// Invariant: for a given listing, no two requests in an active state may
/// have overlapping periods. The creation flow enforces this via the
/// read-side overlap query before persisting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub reservation_request_id: ReservationRequestId,
    pub listing_id: ListingId,
    pub reserver_id: UserId,
    pub state: ReservationRequestState,
    pub reservation_period: ReservationPeriod,
    /// Domain-level delete marker. Set by `request_delete`; the repository
    /// detects it on save and performs the actual removal.
    pub deletion_requested: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ReservationRequest {
    /// Create a new request in `Requested`, stamped with the current time.
    pub fn new(
        listing_id: ListingId,
        reserver_id: UserId,
        reservation_period: ReservationPeriod,
    ) -> Self {
        let now = Utc::now();
        Self {
            reservation_request_id: crate::identity::new_entity_id(),
            listing_id,
            reserver_id,
            state: ReservationRequestState::Requested,
            reservation_period,
            deletion_requested: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark this request for removal.
    pub fn request_delete(&mut self) {
        self.deletion_requested = true;
        self.updated_at = Utc::now();
    }

    /// Lightweight saved-reference view of this request.
    pub fn to_ref(&self) -> ReservationRequestRef {
        ReservationRequestRef {
            reservation_request_id: self.reservation_request_id,
            listing_id: self.listing_id,
            reserver_id: self.reserver_id,
            state: self.state,
            reservation_period: self.reservation_period,
            created_at: self.created_at,
        }
    }
}

/// Saved reference returned by the creation flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRequestRef {
    pub reservation_request_id: ReservationRequestId,
    pub listing_id: ListingId,
    pub reserver_id: UserId,
    pub state: ReservationRequestState,
    pub reservation_period: ReservationPeriod,
    pub created_at: Timestamp,
}

// ============================================================================
// CONVERSATION
// ============================================================================

/// Conversation - a messaging thread tied to a listing (pre-acceptance) or
/// a reservation request (post-acceptance).
///
/// `expires_at` is populated exclusively by the retention sweeps; physical
/// deletion once it elapses is an external collaborator's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversation_id: ConversationId,
    pub sharer_id: UserId,
    pub reserver_id: UserId,
    pub listing_id: ListingId,
    pub reservation_request_id: Option<ReservationRequestId>,
    /// Conversation id at the external messaging provider, if provisioned.
    pub provider_conversation_id: Option<String>,
    pub expires_at: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Conversation {
    /// Schedule this conversation for deletion relative to `anchor`.
    ///
    /// Sets `expires_at = anchor + CONVERSATION_RETENTION_MONTHS` and
    /// returns `true` iff the conversation was newly scheduled. An expiry
    /// already on the record is never cleared or moved, so rescheduling is
    /// a no-op returning `false`.
    pub fn schedule_for_deletion(&mut self, anchor: NaiveDate) -> bool {
        if self.expires_at.is_some() {
            return false;
        }
        // Saturates at the calendar horizon on overflow.
        let expires = anchor
            .checked_add_months(Months::new(CONVERSATION_RETENTION_MONTHS))
            .unwrap_or(NaiveDate::MAX);
        self.expires_at = Some(expires);
        self.updated_at = Utc::now();
        true
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::new_entity_id;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_conversation() -> Conversation {
        let now = Utc::now();
        Conversation {
            conversation_id: new_entity_id(),
            sharer_id: new_entity_id(),
            reserver_id: new_entity_id(),
            listing_id: new_entity_id(),
            reservation_request_id: None,
            provider_conversation_id: None,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_new_request_starts_requested() {
        let period =
            ReservationPeriod::new(date(2024, 3, 1), date(2024, 3, 5)).unwrap();
        let request = ReservationRequest::new(new_entity_id(), new_entity_id(), period);
        assert_eq!(request.state, ReservationRequestState::Requested);
        assert!(!request.deletion_requested);
        assert_eq!(request.created_at, request.updated_at);
    }

    #[test]
    fn test_request_delete_sets_marker() {
        let period =
            ReservationPeriod::new(date(2024, 3, 1), date(2024, 3, 5)).unwrap();
        let mut request = ReservationRequest::new(new_entity_id(), new_entity_id(), period);
        request.request_delete();
        assert!(request.deletion_requested);
    }

    #[test]
    fn test_to_ref_mirrors_request() {
        let period =
            ReservationPeriod::new(date(2024, 3, 1), date(2024, 3, 5)).unwrap();
        let request = ReservationRequest::new(new_entity_id(), new_entity_id(), period);
        let saved = request.to_ref();
        assert_eq!(saved.reservation_request_id, request.reservation_request_id);
        assert_eq!(saved.listing_id, request.listing_id);
        assert_eq!(saved.state, ReservationRequestState::Requested);
        assert_eq!(saved.reservation_period, period);
    }

    #[test]
    fn test_schedule_for_deletion_sets_expiry_from_anchor() {
        let mut conversation = sample_conversation();
        let scheduled = conversation.schedule_for_deletion(date(2024, 1, 15));
        assert!(scheduled);
        assert_eq!(conversation.expires_at, Some(date(2024, 7, 15)));
    }

    #[test]
    fn test_schedule_for_deletion_is_idempotent() {
        let mut conversation = sample_conversation();
        assert!(conversation.schedule_for_deletion(date(2024, 1, 15)));
        // A second sweep with a later anchor must not move the expiry.
        assert!(!conversation.schedule_for_deletion(date(2025, 6, 1)));
        assert_eq!(conversation.expires_at, Some(date(2024, 7, 15)));
    }

    #[test]
    fn test_schedule_for_deletion_never_clears_existing_expiry() {
        let mut conversation = sample_conversation();
        conversation.expires_at = Some(date(2023, 2, 1));
        assert!(!conversation.schedule_for_deletion(date(2024, 1, 1)));
        assert_eq!(conversation.expires_at, Some(date(2023, 2, 1)));
    }

    #[test]
    fn test_aggregate_kind_labels() {
        assert_eq!(AggregateKind::Listing.label(), "listing");
        assert_eq!(
            AggregateKind::ReservationRequest.label(),
            "reservation request"
        );
        assert_eq!(AggregateKind::Conversation.to_string(), "conversation");
    }
}
