//! In-memory reference implementation of the storage contracts.
//!
//! Backs the service and job tests. Aggregates live in `HashMap`s behind a
//! shared `RwLock`; transactions stage their writes locally and apply them
//! under a single write lock on commit, so a dropped transaction leaves the
//! committed state untouched.

use crate::traits::{
    ConversationReadRepository, ConversationTransaction, ConversationUnitOfWork,
    ListingReadRepository, ReservationRequestReadRepository, ReservationRequestTransaction,
    ReservationRequestUnitOfWork, StorageResult, UserReadRepository,
};
use ::async_trait::async_trait;
use lendery_core::{
    AggregateKind, Conversation, ConversationId, Listing, ListingId, ListingState,
    ReservationPeriod, ReservationRequest, ReservationRequestId, ReservationRequestRef,
    ReservationRequestState, StorageError, Timestamp, UserId, UserRef,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// STORE
// ============================================================================

#[derive(Debug, Default)]
struct StoreInner {
    listings: HashMap<ListingId, Listing>,
    users: HashMap<UserId, UserRef>,
    reservation_requests: HashMap<ReservationRequestId, ReservationRequest>,
    conversations: HashMap<ConversationId, Conversation>,
}

/// In-memory store implementing every read repository and unit of work.
///
/// Cloning is cheap and shares the underlying state, so one store instance
/// can be handed to each collaborator slot of a service under test.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, StoreInner>> {
        self.inner.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, StoreInner>> {
        self.inner.write().map_err(|_| StorageError::LockPoisoned)
    }

    // === Seeding and inspection ===

    pub fn insert_listing(&self, listing: Listing) -> StorageResult<()> {
        self.write()?.listings.insert(listing.listing_id, listing);
        Ok(())
    }

    pub fn insert_user(&self, user: UserRef) -> StorageResult<()> {
        self.write()?.users.insert(user.user_id, user);
        Ok(())
    }

    pub fn insert_reservation_request(&self, request: ReservationRequest) -> StorageResult<()> {
        self.write()?
            .reservation_requests
            .insert(request.reservation_request_id, request);
        Ok(())
    }

    pub fn insert_conversation(&self, conversation: Conversation) -> StorageResult<()> {
        self.write()?
            .conversations
            .insert(conversation.conversation_id, conversation);
        Ok(())
    }

    pub fn get_reservation_request(
        &self,
        id: ReservationRequestId,
    ) -> StorageResult<Option<ReservationRequest>> {
        Ok(self.read()?.reservation_requests.get(&id).cloned())
    }

    pub fn get_conversation(&self, id: ConversationId) -> StorageResult<Option<Conversation>> {
        Ok(self.read()?.conversations.get(&id).cloned())
    }

    pub fn reservation_request_count(&self) -> StorageResult<usize> {
        Ok(self.read()?.reservation_requests.len())
    }
}

// ============================================================================
// READ REPOSITORIES
// ============================================================================

#[async_trait]
impl ListingReadRepository for InMemoryStore {
    async fn get_by_id(&self, id: ListingId) -> StorageResult<Option<Listing>> {
        Ok(self.read()?.listings.get(&id).cloned())
    }

    async fn get_by_states(&self, states: &[ListingState]) -> StorageResult<Vec<Listing>> {
        let mut listings: Vec<Listing> = self
            .read()?
            .listings
            .values()
            .filter(|l| states.contains(&l.state))
            .cloned()
            .collect();
        // UUIDv7 ids sort by creation time
        listings.sort_by_key(|l| l.listing_id);
        Ok(listings)
    }
}

#[async_trait]
impl UserReadRepository for InMemoryStore {
    async fn get_by_email(&self, email: &str) -> StorageResult<Option<UserRef>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl ReservationRequestReadRepository for InMemoryStore {
    async fn get_by_id(
        &self,
        id: ReservationRequestId,
    ) -> StorageResult<Option<ReservationRequest>> {
        Ok(self.read()?.reservation_requests.get(&id).cloned())
    }

    async fn get_by_states(
        &self,
        states: &[ReservationRequestState],
    ) -> StorageResult<Vec<ReservationRequest>> {
        let mut requests: Vec<ReservationRequest> = self
            .read()?
            .reservation_requests
            .values()
            .filter(|r| states.contains(&r.state))
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.reservation_request_id);
        Ok(requests)
    }

    async fn get_overlapping_active(
        &self,
        listing_id: ListingId,
        period: &ReservationPeriod,
    ) -> StorageResult<Vec<ReservationRequest>> {
        let mut requests: Vec<ReservationRequest> = self
            .read()?
            .reservation_requests
            .values()
            .filter(|r| {
                r.listing_id == listing_id
                    && r.state.is_active()
                    && r.reservation_period.overlaps(period)
            })
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.reservation_request_id);
        Ok(requests)
    }

    async fn get_expired_closed(
        &self,
        cutoff: Timestamp,
    ) -> StorageResult<Vec<ReservationRequest>> {
        let mut requests: Vec<ReservationRequest> = self
            .read()?
            .reservation_requests
            .values()
            .filter(|r| r.state == ReservationRequestState::Closed && r.updated_at <= cutoff)
            .cloned()
            .collect();
        requests.sort_by_key(|r| r.reservation_request_id);
        Ok(requests)
    }
}

#[async_trait]
impl ConversationReadRepository for InMemoryStore {
    async fn get_by_listing_id(&self, listing_id: ListingId) -> StorageResult<Vec<Conversation>> {
        let mut conversations: Vec<Conversation> = self
            .read()?
            .conversations
            .values()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect();
        conversations.sort_by_key(|c| c.conversation_id);
        Ok(conversations)
    }

    async fn get_by_reservation_request_id(
        &self,
        reservation_request_id: ReservationRequestId,
    ) -> StorageResult<Vec<Conversation>> {
        let mut conversations: Vec<Conversation> = self
            .read()?
            .conversations
            .values()
            .filter(|c| c.reservation_request_id == Some(reservation_request_id))
            .cloned()
            .collect();
        conversations.sort_by_key(|c| c.conversation_id);
        Ok(conversations)
    }
}

// ============================================================================
// TRANSACTIONS
// ============================================================================

#[derive(Debug, Clone)]
enum StagedWrite {
    UpsertConversation(Conversation),
    UpsertReservationRequest(ReservationRequest),
    RemoveReservationRequest(ReservationRequestId),
}

fn apply_staged(store: &InMemoryStore, staged: Vec<StagedWrite>) -> StorageResult<()> {
    let mut inner = store.write()?;
    for write in staged {
        match write {
            StagedWrite::UpsertConversation(c) => {
                inner.conversations.insert(c.conversation_id, c);
            }
            StagedWrite::UpsertReservationRequest(r) => {
                inner
                    .reservation_requests
                    .insert(r.reservation_request_id, r);
            }
            StagedWrite::RemoveReservationRequest(id) => {
                inner.reservation_requests.remove(&id);
            }
        }
    }
    Ok(())
}

/// Transaction on the Conversation aggregate backed by the in-memory store.
pub struct InMemoryConversationTransaction {
    store: InMemoryStore,
    staged: Vec<StagedWrite>,
}

#[async_trait]
impl ConversationTransaction for InMemoryConversationTransaction {
    async fn get(&mut self, id: ConversationId) -> StorageResult<Conversation> {
        self.store
            .get_conversation(id)?
            .ok_or(StorageError::NotFound {
                kind: AggregateKind::Conversation,
                id,
            })
    }

    async fn save(&mut self, conversation: &Conversation) -> StorageResult<()> {
        self.staged
            .push(StagedWrite::UpsertConversation(conversation.clone()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        apply_staged(&self.store, self.staged)
    }
}

#[async_trait]
impl ConversationUnitOfWork for InMemoryStore {
    async fn begin(&self) -> StorageResult<Box<dyn ConversationTransaction>> {
        Ok(Box::new(InMemoryConversationTransaction {
            store: self.clone(),
            staged: Vec::new(),
        }))
    }
}

/// Transaction on the ReservationRequest aggregate backed by the in-memory
/// store.
pub struct InMemoryReservationRequestTransaction {
    store: InMemoryStore,
    staged: Vec<StagedWrite>,
}

#[async_trait]
impl ReservationRequestTransaction for InMemoryReservationRequestTransaction {
    async fn get(&mut self, id: ReservationRequestId) -> StorageResult<ReservationRequest> {
        self.store
            .get_reservation_request(id)?
            .ok_or(StorageError::NotFound {
                kind: AggregateKind::ReservationRequest,
                id,
            })
    }

    async fn insert(
        &mut self,
        request: &ReservationRequest,
    ) -> StorageResult<ReservationRequestRef> {
        self.staged
            .push(StagedWrite::UpsertReservationRequest(request.clone()));
        Ok(request.to_ref())
    }

    async fn save(&mut self, request: &ReservationRequest) -> StorageResult<()> {
        // The delete marker turns the save into a removal.
        if request.deletion_requested {
            self.staged.push(StagedWrite::RemoveReservationRequest(
                request.reservation_request_id,
            ));
        } else {
            self.staged
                .push(StagedWrite::UpsertReservationRequest(request.clone()));
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        apply_staged(&self.store, self.staged)
    }
}

#[async_trait]
impl ReservationRequestUnitOfWork for InMemoryStore {
    async fn begin(&self) -> StorageResult<Box<dyn ReservationRequestTransaction>> {
        Ok(Box::new(InMemoryReservationRequestTransaction {
            store: self.clone(),
            staged: Vec::new(),
        }))
    }
}

// ============================================================================
// TESTS
// ============================================================================
