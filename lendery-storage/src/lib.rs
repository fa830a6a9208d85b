//! Lendery Storage - Storage Contracts and In-Memory Implementation
//!
//! Defines the collaborator contracts the reservation and retention core
//! consumes: read-only repositories per aggregate type and a unit-of-work
//! per mutable aggregate type. Production implementations live behind these
//! traits in the persistence layer; the in-memory store here is the
//! reference implementation used by tests.

pub mod memory;
pub mod traits;

pub use memory::InMemoryStore;
pub use traits::{
    ConversationReadRepository, ConversationTransaction, ConversationUnitOfWork,
    ListingReadRepository, ReservationRequestReadRepository, ReservationRequestTransaction,
    ReservationRequestUnitOfWork, StorageResult, UserReadRepository,
};
