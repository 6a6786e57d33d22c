//! Board, list, card and checklist records.
//!
//! # Responsibility
//! - Define the canonical persisted shape of the board hierarchy.
//! - Provide derived card/checklist projections (progress, completion).
//!
//! # Invariants
//! - `Board::lists` order is the canonical list order.
//! - `List::cards` order is the canonical card order; archived cards stay
//!   in place.
//! - Checklist progress is derived and never stored.

use crate::model::catalog::{LabelId, MemberId};
use crate::model::new_id;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub type BoardId = String;
pub type ListId = String;
pub type CardId = String;
pub type ChecklistId = String;
pub type ChecklistItemId = String;

pub const DEFAULT_BOARD_TITLE: &str = "Untitled Board";
pub const DEFAULT_LIST_TITLE: &str = "Untitled List";
pub const DEFAULT_CARD_TITLE: &str = "Untitled Card";
pub const DEFAULT_CHECKLIST_TITLE: &str = "Checklist";
pub const DEFAULT_CHECKLIST_ITEM_TEXT: &str = "New item";
/// Title of the list every new board starts with.
pub const INITIAL_LIST_TITLE: &str = "To Do";

/// Top-level board container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    /// `#hex` color or image reference.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub lists: Vec<List>,
}

/// Interpreted board background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardBackground<'a> {
    Color(&'a str),
    Image(&'a str),
}

impl Board {
    pub fn new(title: impl Into<String>, background: Option<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            background,
            lists: Vec::new(),
        }
    }

    /// Classifies `background`: values starting with `#` are colors,
    /// anything else is an image reference.
    pub fn background_kind(&self) -> Option<BoardBackground<'_>> {
        self.background.as_deref().map(|value| {
            if value.starts_with('#') {
                BoardBackground::Color(value)
            } else {
                BoardBackground::Image(value)
            }
        })
    }

    pub fn list(&self, list_id: &str) -> Option<&List> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    /// Number of cards across all lists, archived included.
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|list| list.cards.len()).sum()
    }
}

/// Ordered card column within a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl List {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    pub fn position_of(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.id == card_id)
    }
}

/// Task card.
///
/// `labels` and `members` behave as sets: no duplicates, insertion order
/// kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub members: Vec<MemberId>,
    #[serde(default)]
    pub labels: Vec<LabelId>,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            description: String::new(),
            due_date: None,
            archived: false,
            members: Vec::new(),
            labels: Vec::new(),
            checklists: Vec::new(),
        }
    }

    pub fn has_label(&self, label_id: &str) -> bool {
        self.labels.iter().any(|id| id == label_id)
    }

    pub fn has_member(&self, member_id: &str) -> bool {
        self.members.iter().any(|id| id == member_id)
    }

    /// Returns `(done, total)` item counts across all checklists.
    pub fn checklist_totals(&self) -> (usize, usize) {
        self.checklists
            .iter()
            .fold((0, 0), |(done, total), checklist| {
                (
                    done + checklist.done_count(),
                    total + checklist.items.len(),
                )
            })
    }

    /// A card is complete when it has at least one checklist item and
    /// every item is done.
    pub fn is_complete(&self) -> bool {
        let (done, total) = self.checklist_totals();
        total > 0 && done == total
    }

    pub fn checklist(&self, checklist_id: &str) -> Option<&Checklist> {
        self.checklists
            .iter()
            .find(|checklist| checklist.id == checklist_id)
    }
}

/// Named checklist nested in a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: ChecklistId,
    pub title: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn done_count(&self) -> usize {
        self.items.iter().filter(|item| item.done).count()
    }

    /// Completion percent, rounded half up; `0` for an empty checklist.
    pub fn progress_percent(&self) -> u8 {
        progress_percent(self.done_count(), self.items.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            done: false,
        }
    }
}

/// `round(100 * done / total)`, defined as `0` when `total == 0`.
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total);
    // Integer form of round-half-up: (200 * done + total) / (2 * total).
    ((200 * done + total) / (2 * total)) as u8
}

/// Partial card update.
///
/// `None` leaves a field untouched. `due_date: Some(None)` clears the due
/// date. `id` is never patchable; `archived` only changes when included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub labels: Option<Vec<LabelId>>,
    #[serde(default)]
    pub members: Option<Vec<MemberId>>,
    #[serde(default)]
    pub checklists: Option<Vec<Checklist>>,
    #[serde(default)]
    pub archived: Option<bool>,
}

impl CardPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// Distinguishes an explicit `null` from an absent key.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
