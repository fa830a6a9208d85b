//! Lendery Test Utilities
//!
//! Centralized test infrastructure for the Lendery workspace:
//! - Entity fixtures for listings, users, reservation requests, and
//!   conversations
//! - Date and period construction shorthands
//! - Tracing setup for tests

// Re-export the in-memory store so test code needs only one utility crate
pub use lendery_storage::InMemoryStore;

// Re-export core types for convenience
pub use lendery_core::{
    new_entity_id, Conversation, ConversationId, Listing, ListingId, ListingState,
    ReservationPeriod, ReservationRequest, ReservationRequestId, ReservationRequestState,
    Timestamp, UserId, UserRef,
};

use chrono::{NaiveDate, Utc};

// ============================================================================
// DATE HELPERS
// ============================================================================

/// Build a `NaiveDate`. Panics on invalid input; test-only convenience.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid date {year}-{month}-{day}"))
}

/// Build a `ReservationPeriod` from `(y, m, d)` tuples. Panics on a
/// malformed interval; test-only convenience.
pub fn period(start: (i32, u32, u32), end: (i32, u32, u32)) -> ReservationPeriod {
    ReservationPeriod::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2))
        .expect("fixture period must be well-formed")
}

// ============================================================================
// ENTITY FIXTURES
// ============================================================================

/// A listing in the given state, stamped with the current time.
pub fn sample_listing(state: ListingState) -> Listing {
    let now = Utc::now();
    Listing {
        listing_id: new_entity_id(),
        sharer_id: new_entity_id(),
        title: "Cordless drill".to_string(),
        state,
        created_at: now,
        updated_at: now,
    }
}

/// A user reference with the given email.
pub fn sample_user(email: &str) -> UserRef {
    UserRef {
        user_id: new_entity_id(),
        email: email.to_string(),
    }
}

/// A reservation request against `listing_id`, forced into `state`.
pub fn sample_reservation_request(
    listing_id: ListingId,
    state: ReservationRequestState,
    reservation_period: ReservationPeriod,
) -> ReservationRequest {
    let mut request = ReservationRequest::new(listing_id, new_entity_id(), reservation_period);
    request.state = state;
    request
}

/// A conversation attached to a listing only (pre-acceptance).
pub fn sample_conversation_for_listing(listing_id: ListingId) -> Conversation {
    let now = Utc::now();
    Conversation {
        conversation_id: new_entity_id(),
        sharer_id: new_entity_id(),
        reserver_id: new_entity_id(),
        listing_id,
        reservation_request_id: None,
        provider_conversation_id: None,
        expires_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// A conversation attached to a reservation request (post-acceptance).
pub fn sample_conversation_for_request(
    listing_id: ListingId,
    reservation_request_id: ReservationRequestId,
) -> Conversation {
    let mut conversation = sample_conversation_for_listing(listing_id);
    conversation.reservation_request_id = Some(reservation_request_id);
    conversation
}

// ============================================================================
// TRACING
// ============================================================================

/// Initialize a test tracing subscriber honoring `RUST_LOG`.
/// Safe to call from every test; repeated calls are no-ops.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
