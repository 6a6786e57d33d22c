//! Mutation engine: one pure function per user intent.
//!
//! # Responsibility
//! - Produce a new, valid snapshot from an old snapshot plus intent
//!   arguments.
//! - Coerce blank titles to defaults instead of rejecting them.
//!
//! # Invariants
//! - The input snapshot is never modified; every operation returns a new
//!   value.
//! - An id that does not resolve turns the operation into a no-op that
//!   returns an equal snapshot. Stale ids are expected input, not errors.
//! - Entities not targeted by an operation are left untouched.
//! - `ValidationError` is reserved for malformed intents; it is raised
//!   before any change is made.

pub mod board_ops;
pub mod card_ops;
pub mod catalog_ops;
pub mod checklist_ops;

use crate::model::board::{Board, Card, List};
use crate::model::catalog::{LabelId, MemberId};
use crate::model::snapshot::Snapshot;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MutationResult<T> = Result<T, ValidationError>;

/// Malformed intent rejected by the mutation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Label id is blank after trim.
    BlankLabelId,
    /// Label name is blank after trim.
    BlankLabelName,
    /// Color is neither a palette name nor a `#rgb`/`#rrggbb` literal.
    InvalidLabelColor(String),
    /// Patch introduces a label reference missing from the global catalog.
    UnknownLabel(LabelId),
    /// Patch introduces a member reference missing from the global catalog.
    UnknownMember(MemberId),
    /// Patch checklists reuse an id already taken.
    DuplicateChecklistId(String),
    /// Patch checklist items reuse an id already taken.
    DuplicateChecklistItemId(String),
    /// Card patch JSON could not be decoded.
    MalformedPatch(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankLabelId => write!(f, "label id must not be blank"),
            Self::BlankLabelName => write!(f, "label name must not be blank"),
            Self::InvalidLabelColor(value) => write!(
                f,
                "invalid label color `{value}`; expected a palette name or #rgb/#rrggbb"
            ),
            Self::UnknownLabel(id) => write!(f, "label not found: {id}"),
            Self::UnknownMember(id) => write!(f, "member not found: {id}"),
            Self::DuplicateChecklistId(id) => write!(f, "duplicate checklist id: {id}"),
            Self::DuplicateChecklistItemId(id) => {
                write!(f, "duplicate checklist item id: {id}")
            }
            Self::MalformedPatch(message) => write!(f, "malformed card patch: {message}"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value`, falling back to `default` when nothing is left.
pub(crate) fn coerce_title(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) fn edit_board<T>(
    snapshot: &Snapshot,
    op: &'static str,
    board_id: &str,
    edit: impl FnOnce(&mut Board) -> T,
) -> (Snapshot, Option<T>) {
    let Some(board_index) = snapshot.board_index(board_id) else {
        debug!("event=mutation module=mutation op={op} status=noop reason=board_missing");
        return (snapshot.clone(), None);
    };
    let mut next = snapshot.clone();
    let output = edit(&mut next.boards[board_index]);
    (next, Some(output))
}

pub(crate) fn edit_list<T>(
    snapshot: &Snapshot,
    op: &'static str,
    list_id: &str,
    edit: impl FnOnce(&mut List) -> T,
) -> (Snapshot, Option<T>) {
    let Some((board_index, list_index)) = snapshot.list_position(list_id) else {
        debug!("event=mutation module=mutation op={op} status=noop reason=list_missing");
        return (snapshot.clone(), None);
    };
    let mut next = snapshot.clone();
    let output = edit(&mut next.boards[board_index].lists[list_index]);
    (next, Some(output))
}

pub(crate) fn edit_card<T>(
    snapshot: &Snapshot,
    op: &'static str,
    card_id: &str,
    edit: impl FnOnce(&mut Card) -> T,
) -> (Snapshot, Option<T>) {
    let Some((board_index, list_index, card_index)) = snapshot.card_position(card_id) else {
        debug!("event=mutation module=mutation op={op} status=noop reason=card_missing");
        return (snapshot.clone(), None);
    };
    let mut next = snapshot.clone();
    let output = edit(&mut next.boards[board_index].lists[list_index].cards[card_index]);
    (next, Some(output))
}

#[cfg(test)]
mod tests {
    use super::coerce_title;

    #[test]
    fn coerce_title_trims_and_falls_back() {
        assert_eq!(coerce_title("  Sprint  ", "x"), "Sprint");
        assert_eq!(coerce_title(" \t ", "Untitled Board"), "Untitled Board");
    }
}
