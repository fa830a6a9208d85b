//! Lendery Core - Entity Types
//!
//! Pure data structures and pure domain logic for the reservation and
//! retention core of the Lendery item-sharing marketplace. All other
//! crates depend on this. No I/O lives here.

pub mod entities;
pub mod error;
pub mod identity;
pub mod lifecycle;
pub mod period;

pub use entities::{
    AggregateKind, Conversation, Listing, ReservationRequest, ReservationRequestRef, UserRef,
    CONVERSATION_RETENTION_MONTHS, RESERVATION_RETENTION_MONTHS,
};
pub use error::{
    ConfigError, LenderyError, LenderyResult, ReservationError, StorageError,
};
pub use identity::{
    new_entity_id, ConversationId, EntityId, ListingId, ReservationRequestId, Timestamp, UserId,
};
pub use lifecycle::{
    ListingState, ListingStateParseError, ReservationRequestState,
    ReservationRequestStateParseError,
};
pub use period::ReservationPeriod;
