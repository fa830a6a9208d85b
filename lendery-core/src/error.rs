//! Error types for Lendery operations

use crate::entities::AggregateKind;
use crate::identity::{EntityId, ListingId};
use crate::period::ReservationPeriod;
use chrono::NaiveDate;
use thiserror::Error;

/// Reservation flow errors.
///
/// These are validation failures surfaced directly to the caller of the
/// creation flow; they are never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReservationError {
    #[error("Listing not found: {listing_id}")]
    ListingNotFound { listing_id: ListingId },

    #[error("Reserver not found. Ensure that you are logged in.")]
    ReserverNotFound { email: String },

    #[error("Reservation period {period} overlaps an active reservation for listing {listing_id}")]
    OverlappingReservationPeriod {
        listing_id: ListingId,
        period: ReservationPeriod,
    },

    #[error("ReservationRequest not created: {reason}")]
    PersistenceFailure { reason: String },

    #[error("Invalid reservation period: start {start} is after end {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found: {kind} with id {id}")]
    NotFound { kind: AggregateKind, id: EntityId },

    #[error("Insert failed for {kind}: {reason}")]
    InsertFailed { kind: AggregateKind, reason: String },

    #[error("Update failed for {kind} with id {id}: {reason}")]
    UpdateFailed {
        kind: AggregateKind,
        id: EntityId,
        reason: String,
    },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all Lendery operations.
#[derive(Debug, Clone, Error)]
pub enum LenderyError {
    #[error("Reservation error: {0}")]
    Reservation(#[from] ReservationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for Lendery operations.
pub type LenderyResult<T> = Result<T, LenderyError>;

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::new_entity_id;
    use uuid::Uuid;

    #[test]
    fn test_listing_not_found_display() {
        let err = ReservationError::ListingNotFound {
            listing_id: Uuid::nil(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Listing not found"));
        assert!(msg.contains("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn test_reserver_not_found_display_keeps_login_hint() {
        let err = ReservationError::ReserverNotFound {
            email: "user@example.com".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Reserver not found. Ensure that you are logged in."
        );
    }

    #[test]
    fn test_overlapping_period_display() {
        let period = ReservationPeriod::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap();
        let err = ReservationError::OverlappingReservationPeriod {
            listing_id: new_entity_id(),
            period,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("overlaps"));
        assert!(msg.contains("2024-01-01..2024-01-07"));
    }

    #[test]
    fn test_persistence_failure_display() {
        let err = ReservationError::PersistenceFailure {
            reason: "connection reset".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("ReservationRequest not created"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn test_storage_error_display_not_found() {
        let err = StorageError::NotFound {
            kind: AggregateKind::Conversation,
            id: Uuid::nil(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Entity not found"));
        assert!(msg.contains("conversation"));
    }

    #[test]
    fn test_config_error_display_missing_required() {
        let err = ConfigError::MissingRequired {
            field: "reservation_request_unit_of_work".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Missing required configuration field"));
        assert!(msg.contains("reservation_request_unit_of_work"));
    }

    #[test]
    fn test_lendery_error_from_variants() {
        let reservation = LenderyError::from(ReservationError::PersistenceFailure {
            reason: "timeout".to_string(),
        });
        assert!(matches!(reservation, LenderyError::Reservation(_)));

        let storage = LenderyError::from(StorageError::LockPoisoned);
        assert!(matches!(storage, LenderyError::Storage(_)));

        let config = LenderyError::from(ConfigError::MissingRequired {
            field: "x".to_string(),
        });
        assert!(matches!(config, LenderyError::Config(_)));
    }
}
