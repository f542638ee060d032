//! Booking lifecycle rules: status state machine, night counting, pricing,
//! and creation-time date validation.
//!
//! Nights are counted over `[start_date, end_date)`: a Friday-to-Sunday
//! stay is two nights. Availability is stricter and treats both endpoints
//! as occupied, so no new stay may start on another stay's end date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Booking status. Stored as lowercase text in the `bookings` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Declined,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Declined => "declined",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "declined" => Ok(BookingStatus::Declined),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Statut de réservation inconnu: {other}"
            ))),
        }
    }

    /// An active booking still occupies calendar availability.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Accepted)
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Declined | BookingStatus::Cancelled)
    }

    /// State machine:
    /// `pending → {accepted, declined, cancelled}`, `accepted → {cancelled}`.
    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        match (self, target) {
            (BookingStatus::Pending, BookingStatus::Accepted)
            | (BookingStatus::Pending, BookingStatus::Declined)
            | (BookingStatus::Pending, BookingStatus::Cancelled)
            | (BookingStatus::Accepted, BookingStatus::Cancelled) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of nights in `[start, end)`.
///
/// Callers must have validated `end > start` first.
pub fn nights_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end - start).num_days() as i32
}

/// Total price for a stay: nights × nightly rate, exactly.
pub fn total_price(nights: i32, price_per_night: f64) -> f64 {
    nights as f64 * price_per_night
}

/// Validate a creation-time date range: start must not be in the past and
/// the end date must come strictly after the start date.
pub fn validate_booking_dates(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), CoreError> {
    if start < today {
        return Err(CoreError::Validation(
            "La date de début doit être dans le futur".into(),
        ));
    }
    if end <= start {
        return Err(CoreError::Validation(
            "La date de fin doit être après la date de début".into(),
        ));
    }
    Ok(())
}

/// Two half-open ranges `[a_start, a_end)` and `[b_start, b_end)` share at
/// least one night.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn pending_transitions() {
        let p = BookingStatus::Pending;
        assert!(p.can_transition_to(BookingStatus::Accepted));
        assert!(p.can_transition_to(BookingStatus::Declined));
        assert!(p.can_transition_to(BookingStatus::Cancelled));
        assert!(!p.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn accepted_can_only_cancel() {
        let a = BookingStatus::Accepted;
        assert!(a.can_transition_to(BookingStatus::Cancelled));
        assert!(!a.can_transition_to(BookingStatus::Declined));
        assert!(!a.can_transition_to(BookingStatus::Pending));
    }

    #[test]
    fn terminal_states_are_stuck() {
        for s in [BookingStatus::Declined, BookingStatus::Cancelled] {
            assert!(s.is_terminal());
            for t in [
                BookingStatus::Pending,
                BookingStatus::Accepted,
                BookingStatus::Declined,
                BookingStatus::Cancelled,
            ] {
                assert!(!s.can_transition_to(t));
            }
        }
    }

    #[test]
    fn nights_and_price() {
        let nights = nights_between(d("2026-09-01"), d("2026-09-06"));
        assert_eq!(nights, 5);
        assert_eq!(total_price(nights, 100.0), 500.0);
    }

    #[test]
    fn single_night() {
        assert_eq!(nights_between(d("2026-09-01"), d("2026-09-02")), 1);
    }

    #[test]
    fn rejects_past_start() {
        let err = validate_booking_dates(d("2026-01-01"), d("2026-01-05"), d("2026-06-01"));
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = validate_booking_dates(d("2026-09-05"), d("2026-09-05"), d("2026-01-01"));
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[test]
    fn start_today_is_allowed() {
        assert!(validate_booking_dates(d("2026-06-01"), d("2026-06-03"), d("2026-06-01")).is_ok());
    }

    #[test]
    fn overlap_predicate() {
        // [1, 5) vs [4, 8) share the night of the 4th.
        assert!(ranges_overlap(
            d("2026-09-01"),
            d("2026-09-05"),
            d("2026-09-04"),
            d("2026-09-08")
        ));
        // [1, 5) vs [5, 8) are back-to-back, no shared night.
        assert!(!ranges_overlap(
            d("2026-09-01"),
            d("2026-09-05"),
            d("2026-09-05"),
            d("2026-09-08")
        ));
    }

    #[test]
    fn status_round_trip() {
        for s in ["pending", "accepted", "declined", "cancelled"] {
            assert_eq!(BookingStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(BookingStatus::parse("paused").is_err());
    }
}
