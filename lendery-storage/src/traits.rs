//! Collaborator contracts consumed by the reservation and retention core.
//!
//! Read repositories are transaction-free and return owned snapshots,
//! never references mutable in place. Units of work hand out scoped
//! transactions: all mutation of an aggregate happens through a
//! transaction handle, and the staged writes take effect only when
//! `commit` is called. Dropping a handle without committing rolls the
//! transaction back.

use ::async_trait::async_trait;
use lendery_core::{
    Conversation, ConversationId, Listing, ListingId, ListingState, ReservationPeriod,
    ReservationRequest, ReservationRequestId, ReservationRequestRef, ReservationRequestState,
    StorageError, Timestamp, UserRef,
};

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ============================================================================
// READ REPOSITORIES
// ============================================================================

/// Read-only access to listings.
#[async_trait]
pub trait ListingReadRepository: Send + Sync {
    /// Get a listing by ID.
    async fn get_by_id(&self, id: ListingId) -> StorageResult<Option<Listing>>;

    /// List listings in any of the given states.
    async fn get_by_states(&self, states: &[ListingState]) -> StorageResult<Vec<Listing>>;
}

/// Read-only access to user accounts.
#[async_trait]
pub trait UserReadRepository: Send + Sync {
    /// Get a user reference by email address.
    async fn get_by_email(&self, email: &str) -> StorageResult<Option<UserRef>>;
}

/// Read-only access to reservation requests.
#[async_trait]
pub trait ReservationRequestReadRepository: Send + Sync {
    /// Get a reservation request by ID.
    async fn get_by_id(
        &self,
        id: ReservationRequestId,
    ) -> StorageResult<Option<ReservationRequest>>;

    /// List reservation requests in any of the given states.
    async fn get_by_states(
        &self,
        states: &[ReservationRequestState],
    ) -> StorageResult<Vec<ReservationRequest>>;

    /// Active requests for `listing_id` whose periods overlap `period`.
    ///
    /// The overlap test runs storage-side with closed-interval semantics:
    /// `[a,b]` and `[c,d]` overlap iff `a <= d && c <= b`. Archived
    /// requests never block a new reservation.
    async fn get_overlapping_active(
        &self,
        listing_id: ListingId,
        period: &ReservationPeriod,
    ) -> StorageResult<Vec<ReservationRequest>>;

    /// Closed requests whose `updated_at` is at or before `cutoff`.
    async fn get_expired_closed(
        &self,
        cutoff: Timestamp,
    ) -> StorageResult<Vec<ReservationRequest>>;
}

/// Read-only access to conversations.
#[async_trait]
pub trait ConversationReadRepository: Send + Sync {
    /// Conversations attached to a listing.
    async fn get_by_listing_id(
        &self,
        listing_id: ListingId,
    ) -> StorageResult<Vec<Conversation>>;

    /// Conversations attached to a reservation request.
    async fn get_by_reservation_request_id(
        &self,
        reservation_request_id: ReservationRequestId,
    ) -> StorageResult<Vec<Conversation>>;
}

// ============================================================================
// UNITS OF WORK
// ============================================================================

/// Scoped-transaction factory for the Conversation aggregate.
#[async_trait]
pub trait ConversationUnitOfWork: Send + Sync {
    /// Open a transaction scoped to a single conversation mutation.
    async fn begin(&self) -> StorageResult<Box<dyn ConversationTransaction>>;
}

/// One scoped transaction on the Conversation aggregate.
#[async_trait]
pub trait ConversationTransaction: Send {
    /// Load the current committed state of a conversation.
    async fn get(&mut self, id: ConversationId) -> StorageResult<Conversation>;

    /// Stage an update to a conversation.
    async fn save(&mut self, conversation: &Conversation) -> StorageResult<()>;

    /// Commit all staged writes atomically.
    async fn commit(self: Box<Self>) -> StorageResult<()>;
}

/// Scoped-transaction factory for the ReservationRequest aggregate.
#[async_trait]
pub trait ReservationRequestUnitOfWork: Send + Sync {
    /// Open a transaction scoped to a single reservation request mutation.
    async fn begin(&self) -> StorageResult<Box<dyn ReservationRequestTransaction>>;
}

/// One scoped transaction on the ReservationRequest aggregate.
#[async_trait]
pub trait ReservationRequestTransaction: Send {
    /// Load the current committed state of a reservation request.
    async fn get(&mut self, id: ReservationRequestId) -> StorageResult<ReservationRequest>;

    /// Stage a new reservation request and return its saved reference.
    async fn insert(
        &mut self,
        request: &ReservationRequest,
    ) -> StorageResult<ReservationRequestRef>;

    /// Stage an update. A request carrying the delete marker is removed
    /// from storage instead of updated.
    async fn save(&mut self, request: &ReservationRequest) -> StorageResult<()>;

    /// Commit all staged writes atomically.
    async fn commit(self: Box<Self>) -> StorageResult<()>;
}
