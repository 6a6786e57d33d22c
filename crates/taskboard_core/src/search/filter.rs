//! Board view filtering.
//!
//! # Responsibility
//! - Derive a filtered view of one board without touching the snapshot.
//! - Match boards by title for the board picker.
//! - List archived cards for the archive view.
//!
//! # Invariants
//! - Active filter dimensions are combined with AND.
//! - Archived cards never appear in a filtered view.
//! - The view keeps every list of the board, in order, even when its
//!   filtered card sequence is empty.
//! - Due buckets are evaluated against a caller-supplied `today`, so the
//!   derivation stays pure.

use crate::model::board::{Board, Card, ListId};
use crate::model::catalog::{LabelId, MemberId};
use crate::model::snapshot::Snapshot;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Card completion status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// At least one checklist item and every item done.
    Complete,
    Incomplete,
}

impl CardStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "complete" => Some(Self::Complete),
            "incomplete" => Some(Self::Incomplete),
            _ => None,
        }
    }
}

/// Due-date bucket filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueBucket {
    /// Due strictly before today.
    Overdue,
    /// Due today or tomorrow.
    NextDay,
    /// Due within the next seven days, today included.
    NextWeek,
    /// Due within the next calendar month, today included.
    NextMonth,
}

impl DueBucket {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "overdue" => Some(Self::Overdue),
            "nextday" => Some(Self::NextDay),
            "nextweek" => Some(Self::NextWeek),
            "nextmonth" => Some(Self::NextMonth),
            _ => None,
        }
    }

    /// Whether `due` falls into this bucket relative to `today`.
    pub fn contains(self, due: NaiveDate, today: NaiveDate) -> bool {
        let horizon = match self {
            Self::Overdue => return due < today,
            Self::NextDay => today.checked_add_days(Days::new(1)),
            Self::NextWeek => today.checked_add_days(Days::new(7)),
            Self::NextMonth => today.checked_add_months(Months::new(1)),
        };
        due >= today && horizon.map_or(true, |horizon| due <= horizon)
    }
}

/// Filter criteria for a board view.
///
/// Empty keyword and empty member/label sets are inactive dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub keyword: String,
    pub members: BTreeSet<MemberId>,
    pub labels: BTreeSet<LabelId>,
    pub status: Option<CardStatus>,
    pub due: Option<DueBucket>,
}

impl FilterSpec {
    /// Whether any dimension narrows the view.
    pub fn is_active(&self) -> bool {
        !self.keyword.trim().is_empty()
            || !self.members.is_empty()
            || !self.labels.is_empty()
            || self.status.is_some()
            || self.due.is_some()
    }

    /// Evaluates the conjunctive predicate for one card.
    pub fn matches(&self, card: &Card, today: NaiveDate) -> bool {
        if card.archived {
            return false;
        }

        let keyword = self.keyword.trim().to_lowercase();
        if !keyword.is_empty() && !card.title.to_lowercase().contains(&keyword) {
            return false;
        }
        if !self.members.is_empty() && !card.members.iter().any(|id| self.members.contains(id)) {
            return false;
        }
        if !self.labels.is_empty() && !card.labels.iter().any(|id| self.labels.contains(id)) {
            return false;
        }
        match self.status {
            Some(CardStatus::Complete) if !card.is_complete() => return false,
            Some(CardStatus::Incomplete) if card.is_complete() => return false,
            _ => {}
        }
        if let Some(bucket) = self.due {
            match card.due_date {
                Some(due) if bucket.contains(due, today) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Produces a filtered copy of one board.
///
/// Returns `None` when `board_id` does not resolve.
pub fn filter_board(
    snapshot: &Snapshot,
    board_id: &str,
    spec: &FilterSpec,
    today: NaiveDate,
) -> Option<Board> {
    let board = snapshot.board(board_id)?;
    let mut view = board.clone();
    for list in &mut view.lists {
        list.cards.retain(|card| spec.matches(card, today));
    }
    Some(view)
}

/// Boards whose title contains `query`, case-insensitively, in board
/// order. A blank query matches every board.
pub fn boards_matching<'a>(snapshot: &'a Snapshot, query: &str) -> Vec<&'a Board> {
    let query = query.trim().to_lowercase();
    snapshot
        .boards
        .iter()
        .filter(|board| query.is_empty() || board.title.to_lowercase().contains(&query))
        .collect()
}

/// Archived card together with the list that still holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedCard {
    pub list_id: ListId,
    pub card: Card,
}

/// Lists the archived cards of a board in board order.
pub fn archived_cards(snapshot: &Snapshot, board_id: &str) -> Vec<ArchivedCard> {
    let Some(board) = snapshot.board(board_id) else {
        return Vec::new();
    };
    board
        .lists
        .iter()
        .flat_map(|list| {
            list.cards
                .iter()
                .filter(|card| card.archived)
                .map(|card| ArchivedCard {
                    list_id: list.id.clone(),
                    card: card.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{boards_matching, CardStatus, DueBucket, FilterSpec};
    use crate::model::board::Card;
    use crate::model::seed::seed_snapshot;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_buckets_are_relative_to_today() {
        let today = date(2024, 1, 31);
        assert!(DueBucket::Overdue.contains(date(2024, 1, 30), today));
        assert!(!DueBucket::Overdue.contains(today, today));

        assert!(DueBucket::NextDay.contains(today, today));
        assert!(DueBucket::NextDay.contains(date(2024, 2, 1), today));
        assert!(!DueBucket::NextDay.contains(date(2024, 2, 2), today));

        assert!(DueBucket::NextWeek.contains(date(2024, 2, 7), today));
        assert!(!DueBucket::NextWeek.contains(date(2024, 2, 8), today));

        assert!(DueBucket::NextMonth.contains(date(2024, 2, 29), today));
        assert!(!DueBucket::NextMonth.contains(date(2024, 3, 1), today));
    }

    #[test]
    fn parse_accepts_filter_panel_values() {
        assert_eq!(DueBucket::parse("nextweek"), Some(DueBucket::NextWeek));
        assert_eq!(DueBucket::parse("NextMonth"), Some(DueBucket::NextMonth));
        assert_eq!(DueBucket::parse("someday"), None);
        assert_eq!(CardStatus::parse("complete"), Some(CardStatus::Complete));
    }

    #[test]
    fn keyword_matches_case_insensitive_title_substring() {
        let card = Card::new("Fix Login Redirect");
        let today = date(2024, 1, 1);
        let spec = FilterSpec {
            keyword: "  login ".to_string(),
            ..FilterSpec::default()
        };
        assert!(spec.matches(&card, today));

        let miss = FilterSpec {
            keyword: "logout".to_string(),
            ..FilterSpec::default()
        };
        assert!(!miss.matches(&card, today));
        assert!(!FilterSpec::default().is_active());
    }

    #[test]
    fn cards_without_due_date_fail_active_bucket() {
        let card = Card::new("undated");
        let spec = FilterSpec {
            due: Some(DueBucket::Overdue),
            ..FilterSpec::default()
        };
        assert!(!spec.matches(&card, date(2024, 1, 1)));
    }

    #[test]
    fn board_title_query_is_case_insensitive_and_blank_matches_all() {
        let snapshot = seed_snapshot();
        let title = snapshot.boards[0].title.clone();
        let needle = title[1..].to_uppercase();

        let hits = boards_matching(&snapshot, &format!("  {needle} "));
        assert!(hits.iter().any(|board| board.title == title));
        assert_eq!(boards_matching(&snapshot, "   ").len(), snapshot.boards.len());
        assert!(boards_matching(&snapshot, "no board is called this").is_empty());
    }
}
