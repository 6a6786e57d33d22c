//! Snapshot: the complete data store at one point in time.
//!
//! # Responsibility
//! - Hold boards plus the global member and label collections.
//! - Locate entities by id for the mutation and move layers.
//! - Resolve card references for display, with placeholders for dangling
//!   ids.
//!
//! # Invariants
//! - A snapshot value is never mutated after it has been handed out;
//!   operations clone and return a new value.

use crate::model::board::{Board, Card, List};
use crate::model::catalog::{Label, Member};
use serde::{Deserialize, Serialize};

/// Position of a list inside the snapshot: `(board_index, list_index)`.
pub type ListPosition = (usize, usize);

/// Position of a card inside the snapshot:
/// `(board_index, list_index, card_index)`.
pub type CardPosition = (usize, usize, usize);

/// Persisted record: `{ boards, members, labels }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Snapshot {
    pub fn board_index(&self, board_id: &str) -> Option<usize> {
        self.boards.iter().position(|board| board.id == board_id)
    }

    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards.iter().find(|board| board.id == board_id)
    }

    pub fn list_position(&self, list_id: &str) -> Option<ListPosition> {
        self.boards
            .iter()
            .enumerate()
            .find_map(|(board_index, board)| {
                board
                    .lists
                    .iter()
                    .position(|list| list.id == list_id)
                    .map(|list_index| (board_index, list_index))
            })
    }

    pub fn list(&self, list_id: &str) -> Option<&List> {
        self.list_position(list_id)
            .map(|(board_index, list_index)| &self.boards[board_index].lists[list_index])
    }

    pub fn card_position(&self, card_id: &str) -> Option<CardPosition> {
        for (board_index, board) in self.boards.iter().enumerate() {
            for (list_index, list) in board.lists.iter().enumerate() {
                if let Some(card_index) = list.position_of(card_id) {
                    return Some((board_index, list_index, card_index));
                }
            }
        }
        None
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.card_position(card_id)
            .map(|(board_index, list_index, card_index)| {
                &self.boards[board_index].lists[list_index].cards[card_index]
            })
    }

    pub fn label(&self, label_id: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.id == label_id)
    }

    pub fn member(&self, member_id: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.id == member_id)
    }

    /// Resolves a card's labels for display.
    ///
    /// Dangling references come back as [`Label::placeholder`].
    pub fn resolve_labels(&self, card: &Card) -> Vec<Label> {
        card.labels
            .iter()
            .map(|id| {
                self.label(id)
                    .cloned()
                    .unwrap_or_else(|| Label::placeholder(id))
            })
            .collect()
    }

    /// Resolves a card's members for display.
    ///
    /// Dangling references come back as [`Member::placeholder`].
    pub fn resolve_members(&self, card: &Card) -> Vec<Member> {
        card.members
            .iter()
            .map(|id| {
                self.member(id)
                    .cloned()
                    .unwrap_or_else(|| Member::placeholder(id))
            })
            .collect()
    }

    /// Total number of cards across all boards.
    pub fn card_count(&self) -> usize {
        self.boards.iter().map(Board::card_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;
    use crate::model::board::{Board, Card, List};
    use crate::model::catalog::{Label, LabelColor, Member};

    fn fixture() -> Snapshot {
        let mut card = Card::new("c");
        card.id = "c1".to_string();
        card.labels = vec!["l-known".to_string(), "l-gone".to_string()];
        card.members = vec!["m-gone".to_string()];
        let mut list = List::new("todo");
        list.id = "L1".to_string();
        list.cards.push(card);
        let mut board = Board::new("b", None);
        board.id = "B1".to_string();
        board.lists.push(List::new("empty"));
        board.lists.push(list);

        Snapshot {
            boards: vec![board],
            members: vec![Member::new("m1", "Alice")],
            labels: vec![Label::with_id("l-known", "known", LabelColor::default())],
        }
    }

    #[test]
    fn locates_lists_and_cards_by_id() {
        let snapshot = fixture();
        assert_eq!(snapshot.list_position("L1"), Some((0, 1)));
        assert_eq!(snapshot.card_position("c1"), Some((0, 1, 0)));
        assert!(snapshot.card("nope").is_none());
        assert_eq!(snapshot.card_count(), 1);
    }

    #[test]
    fn dangling_references_resolve_to_placeholders() {
        let snapshot = fixture();
        let card = snapshot.card("c1").unwrap();

        let labels = snapshot.resolve_labels(card);
        assert_eq!(labels[0].name, "known");
        assert_eq!(labels[1].name, "l-gone");
        assert_eq!(labels[1].color.as_str(), "gray");

        let members = snapshot.resolve_members(card);
        assert_eq!(members[0].name, "m-gone");
    }
}
