//! Booking lifecycle: status vocabulary, transition table and intake rules.
//!
//! Transition rules:
//! - `new`         -> `confirmed`, `cancelled`
//! - `confirmed`   -> `in_progress`, `cancelled`, `rescheduled`
//! - `in_progress` -> `completed`, `cancelled`
//! - `rescheduled` -> `confirmed`, `cancelled`
//! - `completed`, `cancelled` are terminal

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::transition::TransitionTable;

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

define_vocabulary! {
    /// Booking status.
    BookingStatus ("booking status") {
        New = "new",
        Confirmed = "confirmed",
        InProgress = "in_progress",
        Completed = "completed",
        Cancelled = "cancelled",
        Rescheduled = "rescheduled",
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        Self::New
    }
}

impl TransitionTable for BookingStatus {
    const ENTITY: &'static str = "Booking";

    fn allowed_transitions(self) -> &'static [Self] {
        use BookingStatus::*;
        match self {
            New => &[Confirmed, Cancelled],
            Confirmed => &[InProgress, Cancelled, Rescheduled],
            InProgress => &[Completed, Cancelled],
            Rescheduled => &[Confirmed, Cancelled],
            Completed | Cancelled => &[],
        }
    }
}

define_vocabulary! {
    /// Two-hour arrival windows offered to customers.
    TimeSlot ("time slot") {
        Early = "08:00-10:00",
        Morning = "10:00-12:00",
        Midday = "12:00-14:00",
        Afternoon = "14:00-16:00",
        Evening = "16:00-18:00",
        Flexible = "flexible",
    }
}

impl Default for TimeSlot {
    fn default() -> Self {
        Self::Flexible
    }
}

define_vocabulary! {
    /// Channel a booking arrived through.
    BookingSource ("booking source") {
        Website = "website",
        Phone = "phone",
        Email = "email",
        Referral = "referral",
        SocialMedia = "social_media",
        WalkIn = "walk_in",
    }
}

impl Default for BookingSource {
    fn default() -> Self {
        Self::Website
    }
}

// ---------------------------------------------------------------------------
// Intake validation
// ---------------------------------------------------------------------------

/// How far ahead a customer may request a visit.
pub const MAX_BOOKING_HORIZON_DAYS: i64 = 90;

/// Maximum length of the free-text message on a booking or inquiry.
pub const MAX_MESSAGE_LENGTH: usize = 5_000;

/// Validate a requested visit date against `today`.
pub fn validate_preferred_date(date: NaiveDate, today: NaiveDate) -> Result<(), CoreError> {
    if date < today {
        return Err(CoreError::Validation(
            "Preferred date cannot be in the past".into(),
        ));
    }
    if date > today + Duration::days(MAX_BOOKING_HORIZON_DAYS) {
        return Err(CoreError::Validation(format!(
            "Bookings can only be made up to {MAX_BOOKING_HORIZON_DAYS} days in advance"
        )));
    }
    Ok(())
}

pub fn validate_message(message: &str) -> Result<(), CoreError> {
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message exceeds maximum length of {MAX_MESSAGE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Costs recorded on a booking must not be negative.
pub fn validate_cost(field: &str, value: Option<Decimal>) -> Result<(), CoreError> {
    match value {
        Some(v) if v < Decimal::ZERO => Err(CoreError::Validation(format!(
            "{field} cannot be negative"
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::transition::{can_transition, plan_transition, SYSTEM_ACTOR};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn table_matches_documented_rules() {
        use BookingStatus::*;
        let expected: &[(BookingStatus, &[BookingStatus])] = &[
            (New, &[Confirmed, Cancelled]),
            (Confirmed, &[InProgress, Cancelled, Rescheduled]),
            (InProgress, &[Completed, Cancelled]),
            (Rescheduled, &[Confirmed, Cancelled]),
            (Completed, &[]),
            (Cancelled, &[]),
        ];
        for (from, allowed) in expected {
            for to in BookingStatus::ALL {
                assert_eq!(
                    can_transition(*from, to.as_str()),
                    allowed.contains(to),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn terminal_states_have_no_exits() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(!BookingStatus::Rescheduled.is_terminal());
    }

    #[test]
    fn unknown_target_is_not_allowed() {
        assert!(!can_transition(BookingStatus::New, "archived"));
        assert!(!can_transition(BookingStatus::New, ""));
    }

    #[test]
    fn new_cannot_jump_to_completed() {
        let err = plan_transition(BookingStatus::New, "completed", Some("Amina"), None).unwrap_err();
        assert_matches!(
            err,
            CoreError::InvalidTransition { entity: "Booking", ref from, ref to }
                if from == "new" && to == "completed"
        );
    }

    #[test]
    fn happy_path_produces_three_audit_lines() {
        let mut status = BookingStatus::New;
        let mut trail = Vec::new();
        for target in ["confirmed", "in_progress", "completed"] {
            let change = plan_transition(status, target, None, None).unwrap();
            trail.push(change.audit_line());
            status = change.to;
        }

        assert_eq!(status, BookingStatus::Completed);
        assert_eq!(
            trail,
            vec![
                "Status changed from new to confirmed by System",
                "Status changed from confirmed to in_progress by System",
                "Status changed from in_progress to completed by System",
            ]
        );
        for target in BookingStatus::ALL {
            assert!(plan_transition(status, target.as_str(), None, None).is_err());
        }
    }

    #[test]
    fn actor_and_note_are_trimmed() {
        let change =
            plan_transition(BookingStatus::Confirmed, "cancelled", Some(" Otieno "), Some("  "))
                .unwrap();
        assert_eq!(change.actor, "Otieno");
        assert_eq!(change.note, None);

        let change = plan_transition(BookingStatus::Confirmed, "rescheduled", Some(""), Some("rain"))
            .unwrap();
        assert_eq!(change.actor, SYSTEM_ACTOR);
        assert_eq!(
            change.audit_line(),
            "Status changed from confirmed to rescheduled by System: rain"
        );
    }

    #[test]
    fn preferred_date_window() {
        let today = date("2026-03-01");
        assert!(validate_preferred_date(today, today).is_ok());
        assert!(validate_preferred_date(date("2026-05-30"), today).is_ok());
        assert!(validate_preferred_date(date("2026-02-28"), today).is_err());
        assert!(validate_preferred_date(date("2026-05-31"), today).is_err());
    }

    #[test]
    fn time_slot_uses_clock_ranges() {
        assert_eq!("10:00-12:00".parse::<TimeSlot>().unwrap(), TimeSlot::Morning);
        assert_eq!(TimeSlot::default().as_str(), "flexible");
    }

    #[test]
    fn negative_cost_rejected() {
        assert!(validate_cost("Actual cost", Some(dec!(-1.00))).is_err());
        assert!(validate_cost("Actual cost", Some(dec!(0))).is_ok());
        assert!(validate_cost("Actual cost", None).is_ok());
    }
}
