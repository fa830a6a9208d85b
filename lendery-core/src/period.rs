//! Reservation periods: closed date intervals with date-only semantics.

use crate::error::ReservationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed, inclusive date interval `[start, end]`.
///
/// Periods are date-only: a reservation from Jan 1 to Jan 7 occupies both
/// boundary days, so a follow-up reservation may start on Jan 8 at the
/// earliest. Construction rejects intervals with `start > end`, which keeps
/// every `ReservationPeriod` value well-formed and the overlap test total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReservationPeriod {
    /// Create a period from inclusive start and end dates.
    ///
    /// # Errors
    /// Returns `ReservationError::InvalidPeriod` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReservationError> {
        if start > end {
            return Err(ReservationError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the period (inclusive).
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Overlap test for closed intervals.
    ///
    /// Two intervals `[a,b]` and `[c,d]` overlap iff `a <= d && c <= b`.
    /// Touching boundaries (`b == c`) count as overlapping: both
    /// reservations would occupy the shared day.
    pub fn overlaps(&self, other: &ReservationPeriod) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Number of days covered, boundary days included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for ReservationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(s: (i32, u32, u32), e: (i32, u32, u32)) -> ReservationPeriod {
        ReservationPeriod::new(date(s.0, s.1, s.2), date(e.0, e.1, e.2)).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_period() {
        let result = ReservationPeriod::new(date(2024, 1, 10), date(2024, 1, 1));
        assert!(matches!(
            result,
            Err(ReservationError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_single_day_period_is_valid() {
        let p = ReservationPeriod::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(p.days(), 1);
    }

    #[test]
    fn test_disjoint_periods_do_not_overlap() {
        let a = period((2024, 1, 1), (2024, 1, 7));
        let b = period((2024, 1, 8), (2024, 1, 10));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_boundary_touching_periods_overlap() {
        // Jan 1-7 and Jan 7-10 share Jan 7
        let a = period((2024, 1, 1), (2024, 1, 7));
        let b = period((2024, 1, 7), (2024, 1, 10));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_contained_period_overlaps() {
        let outer = period((2024, 1, 1), (2024, 1, 31));
        let inner = period((2024, 1, 10), (2024, 1, 12));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_display_format() {
        let p = period((2024, 1, 1), (2024, 1, 7));
        assert_eq!(p.to_string(), "2024-01-01..2024-01-07");
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    const EPOCH_DAYS: i64 = 738_000; // days from CE, ~mid-2021; keeps generated dates in a sane range

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_num_days_from_ce_opt((EPOCH_DAYS + offset) as i32).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// For any well-formed [a,b], [c,d]: overlaps() is true iff a <= d and c <= b.
        #[test]
        fn prop_overlap_matches_closed_interval_rule(
            a in 0i64..700, len1 in 0i64..60,
            c in 0i64..700, len2 in 0i64..60,
        ) {
            let p1 = ReservationPeriod::new(day(a), day(a + len1)).unwrap();
            let p2 = ReservationPeriod::new(day(c), day(c + len2)).unwrap();

            let expected = p1.start() <= p2.end() && p2.start() <= p1.end();
            prop_assert_eq!(p1.overlaps(&p2), expected);
        }

        /// Overlap is symmetric.
        #[test]
        fn prop_overlap_is_symmetric(
            a in 0i64..700, len1 in 0i64..60,
            c in 0i64..700, len2 in 0i64..60,
        ) {
            let p1 = ReservationPeriod::new(day(a), day(a + len1)).unwrap();
            let p2 = ReservationPeriod::new(day(c), day(c + len2)).unwrap();
            prop_assert_eq!(p1.overlaps(&p2), p2.overlaps(&p1));
        }

        /// A period always overlaps itself.
        #[test]
        fn prop_overlap_is_reflexive(a in 0i64..700, len in 0i64..60) {
            let p = ReservationPeriod::new(day(a), day(a + len)).unwrap();
            prop_assert!(p.overlaps(&p));
        }

        /// Construction rejects every inverted pair.
        #[test]
        fn prop_inverted_periods_rejected(a in 1i64..700, gap in 1i64..60) {
            let result = ReservationPeriod::new(day(a + gap), day(a));
            let is_invalid_period = matches!(result, Err(ReservationError::InvalidPeriod { .. }));
            prop_assert!(is_invalid_period);
        }
    }
}
