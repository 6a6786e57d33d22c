//! Move algorithm for drag-and-drop results.
//!
//! # Responsibility
//! - Reorder lists within a board.
//! - Reorder cards within a list and transfer cards across lists.
//!
//! # Invariants
//! - The moved element ends at the destination index of the post-removal
//!   sequence (clamped to its end).
//! - Moves never change identity or content, only position and, for
//!   cross-list moves, the parent list.
//! - Cross-list moves replace both lists in one new snapshot; no partial
//!   state is observable.
//! - A drop without a destination, or any unresolved container/index, is a
//!   no-op.
//!
//! The gesture layer is an external collaborator: only the resolved
//! `(container id, index)` pairs reach this module.

mod relocate;

pub use relocate::relocate;

use crate::model::snapshot::Snapshot;
use log::debug;

/// Kind of container a drop happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// Container ids are board ids; elements are lists.
    List,
    /// Container ids are list ids; elements are cards.
    Card,
}

/// One end of a drag: a container id and an index inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropLocation {
    pub container_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(container_id: impl Into<String>, index: usize) -> Self {
        Self {
            container_id: container_id.into(),
            index,
        }
    }
}

/// Resolved outcome of a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub kind: DropKind,
    pub source: DropLocation,
    /// `None` when the element was dropped outside any container.
    pub destination: Option<DropLocation>,
}

/// Applies a drop result to the snapshot.
pub fn apply_drop(snapshot: &Snapshot, drop: &DropResult) -> Snapshot {
    match drop.kind {
        DropKind::List => {
            let destination = match &drop.destination {
                Some(destination) if destination.container_id == drop.source.container_id => {
                    Some(destination.index)
                }
                Some(_) => {
                    debug!("event=move module=moves kind=list status=noop reason=cross_board");
                    return snapshot.clone();
                }
                None => None,
            };
            move_list(
                snapshot,
                &drop.source.container_id,
                drop.source.index,
                destination,
            )
        }
        DropKind::Card => move_card(snapshot, &drop.source, drop.destination.as_ref()),
    }
}

/// Moves the list at `source_index` of a board to `destination_index`.
pub fn move_list(
    snapshot: &Snapshot,
    board_id: &str,
    source_index: usize,
    destination_index: Option<usize>,
) -> Snapshot {
    let Some(destination_index) = destination_index else {
        debug!("event=move module=moves kind=list status=noop reason=no_destination");
        return snapshot.clone();
    };
    let Some(board_index) = snapshot.board_index(board_id) else {
        debug!("event=move module=moves kind=list status=noop reason=board_missing");
        return snapshot.clone();
    };
    if source_index >= snapshot.boards[board_index].lists.len() {
        debug!("event=move module=moves kind=list status=noop reason=source_out_of_range");
        return snapshot.clone();
    }

    let mut next = snapshot.clone();
    relocate(
        &mut next.boards[board_index].lists,
        source_index,
        destination_index,
    );
    next
}

/// Moves a card within one list or across two lists.
pub fn move_card(
    snapshot: &Snapshot,
    source: &DropLocation,
    destination: Option<&DropLocation>,
) -> Snapshot {
    let Some(destination) = destination else {
        debug!("event=move module=moves kind=card status=noop reason=no_destination");
        return snapshot.clone();
    };
    let Some((source_board, source_list)) = snapshot.list_position(&source.container_id) else {
        debug!("event=move module=moves kind=card status=noop reason=source_list_missing");
        return snapshot.clone();
    };
    if source.index >= snapshot.boards[source_board].lists[source_list].cards.len() {
        debug!("event=move module=moves kind=card status=noop reason=source_out_of_range");
        return snapshot.clone();
    }

    if destination.container_id == source.container_id {
        let mut next = snapshot.clone();
        relocate(
            &mut next.boards[source_board].lists[source_list].cards,
            source.index,
            destination.index,
        );
        return next;
    }

    let Some((dest_board, dest_list)) = snapshot.list_position(&destination.container_id) else {
        debug!("event=move module=moves kind=card status=noop reason=destination_list_missing");
        return snapshot.clone();
    };

    let mut next = snapshot.clone();
    let card = next.boards[source_board].lists[source_list]
        .cards
        .remove(source.index);
    let dest_cards = &mut next.boards[dest_board].lists[dest_list].cards;
    let insert_at = destination.index.min(dest_cards.len());
    dest_cards.insert(insert_at, card);
    next
}
