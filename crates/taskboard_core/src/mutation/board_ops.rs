//! Board and list intents.

use crate::model::board::{
    Board, BoardId, List, ListId, DEFAULT_BOARD_TITLE, DEFAULT_LIST_TITLE, INITIAL_LIST_TITLE,
};
use crate::model::snapshot::Snapshot;
use crate::mutation::{coerce_title, edit_board, edit_list};
use log::debug;

/// Appends a new board holding one default "To Do" list.
///
/// A blank title becomes "Untitled Board"; a blank background is dropped.
pub fn create_board(
    snapshot: &Snapshot,
    title: &str,
    background: Option<&str>,
) -> (Snapshot, BoardId) {
    let mut board = Board::new(
        coerce_title(title, DEFAULT_BOARD_TITLE),
        normalize_background(background),
    );
    board.lists.push(List::new(INITIAL_LIST_TITLE));
    let board_id = board.id.clone();

    let mut next = snapshot.clone();
    next.boards.push(board);
    (next, board_id)
}

pub fn rename_board(snapshot: &Snapshot, board_id: &str, title: &str) -> Snapshot {
    let title = coerce_title(title, DEFAULT_BOARD_TITLE);
    edit_board(snapshot, "rename_board", board_id, |board| board.title = title).0
}

/// Replaces the board background; `None` or blank clears it.
pub fn set_board_background(
    snapshot: &Snapshot,
    board_id: &str,
    background: Option<&str>,
) -> Snapshot {
    let background = normalize_background(background);
    edit_board(snapshot, "set_board_background", board_id, |board| {
        board.background = background
    })
    .0
}

/// Removes a board together with all of its lists and cards.
pub fn delete_board(snapshot: &Snapshot, board_id: &str) -> Snapshot {
    let Some(board_index) = snapshot.board_index(board_id) else {
        debug!("event=mutation module=mutation op=delete_board status=noop reason=board_missing");
        return snapshot.clone();
    };
    let mut next = snapshot.clone();
    next.boards.remove(board_index);
    next
}

/// Appends a list to the end of a board's list sequence.
///
/// Returns `None` for the id when the board does not resolve.
pub fn create_list(snapshot: &Snapshot, board_id: &str, title: &str) -> (Snapshot, Option<ListId>) {
    let list = List::new(coerce_title(title, DEFAULT_LIST_TITLE));
    edit_board(snapshot, "create_list", board_id, |board| {
        let list_id = list.id.clone();
        board.lists.push(list);
        list_id
    })
}

/// Renames a list. Blank input becomes "Untitled List"; an empty title is
/// only ever a transient state of the editing surface.
pub fn rename_list(snapshot: &Snapshot, list_id: &str, title: &str) -> Snapshot {
    let title = coerce_title(title, DEFAULT_LIST_TITLE);
    edit_list(snapshot, "rename_list", list_id, |list| list.title = title).0
}

/// Removes a list and every card in it.
pub fn delete_list(snapshot: &Snapshot, list_id: &str) -> Snapshot {
    let Some((board_index, list_index)) = snapshot.list_position(list_id) else {
        debug!("event=mutation module=mutation op=delete_list status=noop reason=list_missing");
        return snapshot.clone();
    };
    let mut next = snapshot.clone();
    next.boards[board_index].lists.remove(list_index);
    next
}

fn normalize_background(background: Option<&str>) -> Option<String> {
    background
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::{create_board, create_list, delete_list, rename_list};
    use crate::model::snapshot::Snapshot;

    #[test]
    fn create_board_coerces_blank_title_and_adds_default_list() {
        let base = Snapshot::default();
        let (next, board_id) = create_board(&base, "   ", Some("  "));

        let board = next.board(&board_id).unwrap();
        assert_eq!(board.title, "Untitled Board");
        assert_eq!(board.background, None);
        assert_eq!(board.lists.len(), 1);
        assert_eq!(board.lists[0].title, "To Do");
        assert!(base.boards.is_empty());
    }

    #[test]
    fn list_operations_on_unknown_ids_are_noops() {
        let (base, _) = create_board(&Snapshot::default(), "Board", None);

        let (next, list_id) = create_list(&base, "missing-board", "Later");
        assert_eq!(list_id, None);
        assert_eq!(next, base);

        assert_eq!(rename_list(&base, "missing-list", "x"), base);
        assert_eq!(delete_list(&base, "missing-list"), base);
    }
}
