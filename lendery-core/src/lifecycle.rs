//! Lifecycle states for reservation requests and listings.
//!
//! State transitions themselves are driven by collaborating workflows
//! (acceptance, rejection, cancellation); this module only encodes which
//! states exist, which transitions are legal, and how states classify for
//! overlap blocking ("active") and retention processing ("archived").
//!
//! # Reservation Request State Transition Diagram
//!
//! ```text
//! create() → Requested ──┬── accept() ──→ Accepted ── close() → Closed (terminal)
//!                        ├── reject() ──→ Rejected (terminal)
//!                        └── cancel() ──→ Cancelled (terminal)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// RESERVATION REQUEST STATE
// ============================================================================

/// Status of a reservation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationRequestState {
    /// Awaiting a decision from the sharer
    Requested,
    /// Approved by the sharer; the reservation will run its course
    Accepted,
    /// Declined by the sharer
    Rejected,
    /// Withdrawn by the reserver
    Cancelled,
    /// The accepted reservation ran to completion
    Closed,
}

impl ReservationRequestState {
    /// States that block overlapping reservation requests on the same listing.
    pub const ACTIVE: [ReservationRequestState; 2] = [
        ReservationRequestState::Requested,
        ReservationRequestState::Accepted,
    ];

    /// States eligible for retention processing.
    pub const ARCHIVED: [ReservationRequestState; 3] = [
        ReservationRequestState::Closed,
        ReservationRequestState::Rejected,
        ReservationRequestState::Cancelled,
    ];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ReservationRequestState::Requested => "Requested",
            ReservationRequestState::Accepted => "Accepted",
            ReservationRequestState::Rejected => "Rejected",
            ReservationRequestState::Cancelled => "Cancelled",
            ReservationRequestState::Closed => "Closed",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, ReservationRequestStateParseError> {
        match s.to_lowercase().as_str() {
            "requested" => Ok(ReservationRequestState::Requested),
            "accepted" => Ok(ReservationRequestState::Accepted),
            "rejected" => Ok(ReservationRequestState::Rejected),
            "cancelled" | "canceled" => Ok(ReservationRequestState::Cancelled),
            "closed" => Ok(ReservationRequestState::Closed),
            _ => Err(ReservationRequestStateParseError(s.to_string())),
        }
    }

    /// Check if this state blocks overlapping requests for the same listing.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ReservationRequestState::Requested | ReservationRequestState::Accepted
        )
    }

    /// Check if this state is closed/ended for business purposes and thus
    /// eligible for retention processing.
    pub fn is_archived(&self) -> bool {
        matches!(
            self,
            ReservationRequestState::Closed
                | ReservationRequestState::Rejected
                | ReservationRequestState::Cancelled
        )
    }

    /// Check if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        self.is_archived()
    }

    /// Check whether a transition from this state to `next` is legal.
    pub fn can_transition_to(&self, next: ReservationRequestState) -> bool {
        matches!(
            (self, next),
            (
                ReservationRequestState::Requested,
                ReservationRequestState::Accepted
                    | ReservationRequestState::Rejected
                    | ReservationRequestState::Cancelled,
            ) | (
                ReservationRequestState::Accepted,
                ReservationRequestState::Closed,
            )
        )
    }
}

impl fmt::Display for ReservationRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for ReservationRequestState {
    type Err = ReservationRequestStateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid reservation request state string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationRequestStateParseError(pub String);

impl fmt::Display for ReservationRequestStateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid reservation request state: {}", self.0)
    }
}

impl std::error::Error for ReservationRequestStateParseError {}

// ============================================================================
// LISTING STATE
// ============================================================================

/// Status of a listing. Authoring transitions live outside this core; the
/// retention sweeps only need to recognize the archived states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingState {
    /// Visible in the marketplace and open for reservation requests
    Published,
    /// Availability window ran out
    Expired,
    /// Taken down by the sharer
    Cancelled,
}

impl ListingState {
    /// States eligible for retention processing.
    pub const ARCHIVED: [ListingState; 2] = [ListingState::Expired, ListingState::Cancelled];

    /// Convert to database string representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ListingState::Published => "Published",
            ListingState::Expired => "Expired",
            ListingState::Cancelled => "Cancelled",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self, ListingStateParseError> {
        match s.to_lowercase().as_str() {
            "published" => Ok(ListingState::Published),
            "expired" => Ok(ListingState::Expired),
            "cancelled" | "canceled" => Ok(ListingState::Cancelled),
            _ => Err(ListingStateParseError(s.to_string())),
        }
    }

    /// Check if this listing is closed/ended for business purposes.
    pub fn is_archived(&self) -> bool {
        matches!(self, ListingState::Expired | ListingState::Cancelled)
    }
}

impl fmt::Display for ListingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

impl FromStr for ListingState {
    type Err = ListingStateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_db_str(s)
    }
}

/// Error when parsing an invalid listing state string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingStateParseError(pub String);

impl fmt::Display for ListingStateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid listing state: {}", self.0)
    }
}

impl std::error::Error for ListingStateParseError {}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_state_roundtrip() {
        for state in [
            ReservationRequestState::Requested,
            ReservationRequestState::Accepted,
            ReservationRequestState::Rejected,
            ReservationRequestState::Cancelled,
            ReservationRequestState::Closed,
        ] {
            let db_str = state.as_db_str();
            let parsed = ReservationRequestState::from_db_str(db_str).unwrap();
            assert_eq!(state, parsed);
        }
    }

    #[test]
    fn test_reservation_state_parse_rejects_unknown() {
        assert!(matches!(
            ReservationRequestState::from_db_str("pending"),
            Err(ReservationRequestStateParseError(_))
        ));
    }

    #[test]
    fn test_active_and_archived_are_disjoint_and_exhaustive() {
        for state in [
            ReservationRequestState::Requested,
            ReservationRequestState::Accepted,
            ReservationRequestState::Rejected,
            ReservationRequestState::Cancelled,
            ReservationRequestState::Closed,
        ] {
            assert_ne!(state.is_active(), state.is_archived());
        }
        for state in ReservationRequestState::ACTIVE {
            assert!(state.is_active());
        }
        for state in ReservationRequestState::ARCHIVED {
            assert!(state.is_archived());
        }
    }

    #[test]
    fn test_legal_transitions() {
        use ReservationRequestState::*;
        assert!(Requested.can_transition_to(Accepted));
        assert!(Requested.can_transition_to(Rejected));
        assert!(Requested.can_transition_to(Cancelled));
        assert!(Accepted.can_transition_to(Closed));
    }

    #[test]
    fn test_illegal_transitions() {
        use ReservationRequestState::*;
        assert!(!Requested.can_transition_to(Closed));
        assert!(!Requested.can_transition_to(Requested));
        assert!(!Accepted.can_transition_to(Rejected));
        assert!(!Accepted.can_transition_to(Cancelled));
        // Terminal states have no outgoing transitions
        for terminal in [Rejected, Cancelled, Closed] {
            for next in [Requested, Accepted, Rejected, Cancelled, Closed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ReservationRequestState::Requested.is_terminal());
        assert!(!ReservationRequestState::Accepted.is_terminal());
        assert!(ReservationRequestState::Rejected.is_terminal());
        assert!(ReservationRequestState::Cancelled.is_terminal());
        assert!(ReservationRequestState::Closed.is_terminal());
    }

    #[test]
    fn test_listing_state_roundtrip() {
        for state in [
            ListingState::Published,
            ListingState::Expired,
            ListingState::Cancelled,
        ] {
            let parsed = ListingState::from_db_str(state.as_db_str()).unwrap();
            assert_eq!(state, parsed);
        }
    }

    #[test]
    fn test_listing_archived_states() {
        assert!(!ListingState::Published.is_archived());
        assert!(ListingState::Expired.is_archived());
        assert!(ListingState::Cancelled.is_archived());
    }

    #[test]
    fn test_american_spelling_accepted() {
        assert_eq!(
            ReservationRequestState::from_db_str("canceled").unwrap(),
            ReservationRequestState::Cancelled
        );
        assert_eq!(
            ListingState::from_db_str("canceled").unwrap(),
            ListingState::Cancelled
        );
    }
}
