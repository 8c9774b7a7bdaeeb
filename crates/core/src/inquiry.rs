//! Inquiry status vocabulary and transition table.
//!
//! Transition rules:
//! - `new`       -> `in_review`, `closed`
//! - `in_review` -> `quoted`, `closed`
//! - `quoted`    -> `converted`, `closed`
//! - `converted` -> `closed`
//! - `closed` is terminal

use crate::error::CoreError;
use crate::transition::TransitionTable;

define_vocabulary! {
    /// Inquiry status.
    InquiryStatus ("inquiry status") {
        New = "new",
        InReview = "in_review",
        Quoted = "quoted",
        Converted = "converted",
        Closed = "closed",
    }
}

impl Default for InquiryStatus {
    fn default() -> Self {
        Self::New
    }
}

impl TransitionTable for InquiryStatus {
    const ENTITY: &'static str = "Inquiry";

    fn allowed_transitions(self) -> &'static [Self] {
        use InquiryStatus::*;
        match self {
            New => &[InReview, Closed],
            InReview => &[Quoted, Closed],
            Quoted => &[Converted, Closed],
            Converted => &[Closed],
            Closed => &[],
        }
    }
}

/// How a quotation linked to an inquiry came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationOrigin {
    /// Drafted from the inquiry by the convert action.
    Conversion,
    /// Authored by staff with an `inquiry_id` attached.
    Manual,
}

/// Status an inquiry takes once a quotation is drafted for it, or `None`
/// to keep the current one.
///
/// A `new` inquiry moves to `in_review` through the transition table.
/// Conversion leaves a `quoted` inquiry as it is; a manual quotation may
/// only attach to `new` or `in_review`. Anything else is an
/// `InvalidTransition`.
pub fn status_on_quotation(
    current: InquiryStatus,
    origin: QuotationOrigin,
) -> Result<Option<InquiryStatus>, CoreError> {
    use InquiryStatus::*;
    match (current, origin) {
        (InReview, _) | (Quoted, QuotationOrigin::Conversion) => Ok(None),
        (status, _) if status.can_transition_to(InReview) => Ok(Some(InReview)),
        (status, _) => Err(CoreError::InvalidTransition {
            entity: InquiryStatus::ENTITY,
            from: status.to_string(),
            to: InReview.to_string(),
        }),
    }
}

pub const MAX_SUBJECT_LENGTH: usize = 200;

/// Length limit shared by `budget_range` and `timeline`.
pub const MAX_HINT_LENGTH: usize = 100;

pub fn validate_subject(subject: &str) -> Result<String, CoreError> {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Subject is required".into()));
    }
    if trimmed.chars().count() > MAX_SUBJECT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Subject exceeds maximum length of {MAX_SUBJECT_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an optional free-text hint such as the budget range.
pub fn validate_hint(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    if value.is_some_and(|v| v.chars().count() > MAX_HINT_LENGTH) {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_HINT_LENGTH} characters"
        )));
    }
    Ok(())
}
