//! Seeded default snapshot used on first run or after corruption.

use crate::model::board::{Board, Card, Checklist, ChecklistItem, List};
use crate::model::catalog::{Label, LabelColor, Member, PaletteColor};
use crate::model::snapshot::Snapshot;

/// Builds the default snapshot: one sample board, a fixed member list and a
/// fixed label palette.
///
/// Ids are fixed so repeated seeding yields identical snapshots.
pub fn seed_snapshot() -> Snapshot {
    Snapshot {
        boards: vec![sample_board()],
        members: seed_members(),
        labels: seed_labels(),
    }
}

pub fn seed_members() -> Vec<Member> {
    vec![
        Member::new("m1", "Alice"),
        Member::new("m2", "Bob"),
        Member::new("m3", "Charlie"),
    ]
}

pub fn seed_labels() -> Vec<Label> {
    [
        ("l-frontend", "frontend", PaletteColor::Green),
        ("l-backend", "backend", PaletteColor::Amber),
        ("l-urgent", "urgent", PaletteColor::Red),
        ("l-design", "design", PaletteColor::Violet),
        ("l-bug", "bug", PaletteColor::Red),
        ("l-feature", "feature", PaletteColor::Blue),
    ]
    .into_iter()
    .map(|(id, name, color)| Label::with_id(id, name, LabelColor::Palette(color)))
    .collect()
}

fn sample_board() -> Board {
    let setup = Card {
        id: "c1".to_string(),
        description: "Create Vite + React skeleton".to_string(),
        labels: vec!["l-frontend".to_string()],
        members: vec!["m1".to_string()],
        checklists: vec![Checklist {
            id: "cl1".to_string(),
            title: "Setup tasks".to_string(),
            items: vec![ChecklistItem {
                id: "cl1-i1".to_string(),
                text: "init repo".to_string(),
                done: true,
            }],
        }],
        ..Card::new("Setup project")
    };
    let schema = Card {
        id: "c2".to_string(),
        labels: vec!["l-backend".to_string()],
        members: vec!["m2".to_string()],
        ..Card::new("Design DB schema")
    };

    Board {
        id: "b1".to_string(),
        title: "Default Board".to_string(),
        background: None,
        lists: vec![
            List {
                id: "l1".to_string(),
                title: "To Do".to_string(),
                cards: vec![setup, schema],
            },
            List {
                id: "l2".to_string(),
                title: "In Progress".to_string(),
                cards: Vec::new(),
            },
            List {
                id: "l3".to_string(),
                title: "Done".to_string(),
                cards: Vec::new(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::seed_snapshot;

    #[test]
    fn seed_is_deterministic_and_fully_resolved() {
        let seed = seed_snapshot();
        assert_eq!(seed, seed_snapshot());
        assert_eq!(seed.boards.len(), 1);
        assert_eq!(seed.members.len(), 3);
        assert_eq!(seed.labels.len(), 6);

        for board in &seed.boards {
            for list in &board.lists {
                for card in &list.cards {
                    assert!(card.labels.iter().all(|id| seed.label(id).is_some()));
                    assert!(card.members.iter().all(|id| seed.member(id).is_some()));
                }
            }
        }
    }
}
