//! Generic status transition planning.
//!
//! Each lifecycle status enum implements [`TransitionTable`]. Planning a
//! transition is pure: [`plan_transition`] either returns the
//! [`StatusChange`] to persist or a [`CoreError::InvalidTransition`], and
//! never touches the record itself.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::CoreError;

/// Actor recorded when a transition is not attributed to a staff member.
pub const SYSTEM_ACTOR: &str = "System";

/// A status vocabulary with a fixed table of legal next states.
pub trait TransitionTable: Copy + Eq + Display + FromStr + 'static {
    /// Entity name used in error messages, e.g. `"Booking"`.
    const ENTITY: &'static str;

    /// The states reachable from `self` in one step.
    fn allowed_transitions(self) -> &'static [Self];

    fn can_transition_to(self, target: Self) -> bool {
        self.allowed_transitions().contains(&target)
    }

    fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// Returns `true` iff `target` names a state in the table entry for
/// `current`. Unknown target names return `false`.
pub fn can_transition<S: TransitionTable>(current: S, target: &str) -> bool {
    target
        .parse::<S>()
        .is_ok_and(|target| current.can_transition_to(target))
}

/// A validated, not yet persisted status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange<S> {
    pub from: S,
    pub to: S,
    pub actor: String,
    pub note: Option<String>,
}

impl<S: Display> StatusChange<S> {
    /// Human-readable audit line for this change.
    pub fn audit_line(&self) -> String {
        format_audit_line(
            &self.from.to_string(),
            &self.to.to_string(),
            &self.actor,
            self.note.as_deref(),
        )
    }
}

/// Render `"Status changed from <old> to <new> by <actor>[: <note>]"`.
pub fn format_audit_line(from: &str, to: &str, actor: &str, note: Option<&str>) -> String {
    match note {
        Some(note) => format!("Status changed from {from} to {to} by {actor}: {note}"),
        None => format!("Status changed from {from} to {to} by {actor}"),
    }
}

/// Validate a transition request and build the change to persist.
///
/// `actor` defaults to [`SYSTEM_ACTOR`]; a blank note is dropped.
pub fn plan_transition<S: TransitionTable>(
    current: S,
    target: &str,
    actor: Option<&str>,
    note: Option<&str>,
) -> Result<StatusChange<S>, CoreError> {
    let invalid = || CoreError::InvalidTransition {
        entity: S::ENTITY,
        from: current.to_string(),
        to: target.to_string(),
    };

    let to = target.parse::<S>().map_err(|_| invalid())?;
    if !current.can_transition_to(to) {
        return Err(invalid());
    }

    let actor = actor
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(SYSTEM_ACTOR)
        .to_string();
    let note = note
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    Ok(StatusChange {
        from: current,
        to,
        actor,
        note,
    })
}
