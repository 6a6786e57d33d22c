//! Boundary normalization from loosely-shaped JSON into a canonical
//! [`Snapshot`].
//!
//! # Responsibility
//! - Accept any loaded JSON value (current schema, legacy drafts, or
//!   garbage) and produce a snapshot conforming to the entity model.
//! - Collapse legacy label/member representations (embedded objects,
//!   free-text names) into id references so nothing deeper in the engine
//!   branches on representation.
//!
//! # Invariants
//! - Never panics and never fails; unusable fragments are dropped.
//! - Idempotent: normalizing the serialized output again yields the same
//!   snapshot.
//! - Embedded label/member objects are registered in the global catalogs
//!   before any free-text reference is resolved.
//! - Within each entity class the first occurrence of an id wins; later
//!   duplicates are dropped.

use crate::model::board::{
    Board, Card, Checklist, ChecklistItem, List, DEFAULT_BOARD_TITLE, DEFAULT_CARD_TITLE,
    DEFAULT_CHECKLIST_TITLE, DEFAULT_LIST_TITLE,
};
use crate::model::catalog::{Label, LabelColor, Member};
use crate::model::new_id;
use crate::model::snapshot::Snapshot;
use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

type Object = Map<String, Value>;

/// Counters describing what normalization had to repair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Entities that arrived without a usable id.
    pub generated_ids: usize,
    /// Entities dropped because their id was already taken.
    pub dropped_duplicates: usize,
    /// Labels/members registered from objects embedded in cards.
    pub registered_catalog_entries: usize,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalizes an arbitrary JSON value into a canonical snapshot.
///
/// A non-object root yields an empty snapshot.
pub fn normalize_value(raw: &Value) -> Snapshot {
    normalize_value_with_report(raw).0
}

/// Same as [`normalize_value`], also returning repair counters.
pub fn normalize_value_with_report(raw: &Value) -> (Snapshot, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let Some(root) = raw.as_object() else {
        return (Snapshot::default(), report);
    };

    let mut catalog = Catalog::default();
    for value in array(root.get("labels")) {
        if let Some(label) = catalog_label(value, &mut report) {
            catalog.add_label(label, &mut report);
        }
    }
    for value in array(root.get("members")) {
        if let Some(member) = catalog_member(value, &mut report) {
            catalog.add_member(member, &mut report);
        }
    }

    let raw_boards = array(root.get("boards"));
    register_embedded_refs(raw_boards, &mut catalog, &mut report);

    let mut ids = SeenIds::default();
    let boards = raw_boards
        .iter()
        .filter_map(|value| normalize_board(value, &catalog, &mut ids, &mut report))
        .collect();

    let snapshot = Snapshot {
        boards,
        members: catalog.members,
        labels: catalog.labels,
    };
    (snapshot, report)
}

/// Re-normalizes an already typed snapshot.
pub fn normalize_snapshot(snapshot: &Snapshot) -> Snapshot {
    match serde_json::to_value(snapshot) {
        Ok(value) => normalize_value(&value),
        Err(_) => snapshot.clone(),
    }
}

#[derive(Default)]
struct Catalog {
    labels: Vec<Label>,
    members: Vec<Member>,
    label_ids: HashSet<String>,
    member_ids: HashSet<String>,
    label_by_name: HashMap<String, String>,
    member_by_name: HashMap<String, String>,
}

impl Catalog {
    fn add_label(&mut self, label: Label, report: &mut NormalizeReport) {
        if !self.label_ids.insert(label.id.clone()) {
            report.dropped_duplicates += 1;
            return;
        }
        if let Some(key) = name_key(&label.name) {
            self.label_by_name.entry(key).or_insert_with(|| label.id.clone());
        }
        self.labels.push(label);
    }

    fn add_member(&mut self, member: Member, report: &mut NormalizeReport) {
        if !self.member_ids.insert(member.id.clone()) {
            report.dropped_duplicates += 1;
            return;
        }
        if let Some(key) = name_key(&member.name) {
            self.member_by_name
                .entry(key)
                .or_insert_with(|| member.id.clone());
        }
        self.members.push(member);
    }

    fn resolve_label(&self, value: &Value) -> Option<String> {
        resolve_ref(value, &self.label_ids, &self.label_by_name)
    }

    fn resolve_member(&self, value: &Value) -> Option<String> {
        resolve_ref(value, &self.member_ids, &self.member_by_name)
    }
}

#[derive(Default)]
struct SeenIds {
    boards: HashSet<String>,
    lists: HashSet<String>,
    cards: HashSet<String>,
    checklists: HashSet<String>,
    items: HashSet<String>,
}

/// Claims `candidate` in `seen`; generates an id when missing and returns
/// `None` when the id is already taken.
fn claim(
    seen: &mut HashSet<String>,
    candidate: Option<String>,
    report: &mut NormalizeReport,
) -> Option<String> {
    let id = match candidate {
        Some(id) => id,
        None => {
            report.generated_ids += 1;
            new_id()
        }
    };
    if seen.insert(id.clone()) {
        Some(id)
    } else {
        report.dropped_duplicates += 1;
        None
    }
}

fn catalog_label(value: &Value, report: &mut NormalizeReport) -> Option<Label> {
    match value {
        Value::Object(obj) => {
            let id = id_of(obj).unwrap_or_else(|| {
                report.generated_ids += 1;
                new_id()
            });
            let name = string_field(obj, "name").unwrap_or_default();
            Some(Label::with_id(id, name, color_of(obj)))
        }
        Value::String(name) if !name.trim().is_empty() => {
            report.generated_ids += 1;
            Some(Label::new(name.trim(), LabelColor::default()))
        }
        _ => None,
    }
}

fn catalog_member(value: &Value, report: &mut NormalizeReport) -> Option<Member> {
    match value {
        Value::Object(obj) => {
            let id = id_of(obj).unwrap_or_else(|| {
                report.generated_ids += 1;
                new_id()
            });
            let name = string_field(obj, "name").unwrap_or_default();
            Some(Member::new(id, name))
        }
        Value::String(name) if !name.trim().is_empty() => {
            report.generated_ids += 1;
            Some(Member::new(new_id(), name.trim()))
        }
        _ => None,
    }
}

fn register_embedded_refs(boards: &[Value], catalog: &mut Catalog, report: &mut NormalizeReport) {
    let cards = boards
        .iter()
        .flat_map(|board| array(board.get("lists")))
        .flat_map(|list| array(list.get("cards")))
        .filter_map(Value::as_object);

    for card in cards {
        for obj in array(card.get("labels")).iter().filter_map(Value::as_object) {
            let name = string_field(obj, "name").unwrap_or_default();
            let label = match id_of(obj) {
                Some(id) if catalog.label_ids.contains(&id) => continue,
                Some(id) => {
                    let name = if name.trim().is_empty() { id.clone() } else { name };
                    Label::with_id(id, name, color_of(obj))
                }
                None => match name_key(&name) {
                    Some(key) if !catalog.label_by_name.contains_key(&key) => {
                        report.generated_ids += 1;
                        Label::new(name.trim(), color_of(obj))
                    }
                    _ => continue,
                },
            };
            report.registered_catalog_entries += 1;
            catalog.add_label(label, report);
        }

        for obj in array(card.get("members")).iter().filter_map(Value::as_object) {
            let name = string_field(obj, "name").unwrap_or_default();
            let member = match id_of(obj) {
                Some(id) if catalog.member_ids.contains(&id) => continue,
                Some(id) => {
                    let name = if name.trim().is_empty() { id.clone() } else { name };
                    Member::new(id, name)
                }
                None => match name_key(&name) {
                    Some(key) if !catalog.member_by_name.contains_key(&key) => {
                        report.generated_ids += 1;
                        Member::new(new_id(), name.trim())
                    }
                    _ => continue,
                },
            };
            report.registered_catalog_entries += 1;
            catalog.add_member(member, report);
        }
    }
}

fn normalize_board(
    value: &Value,
    catalog: &Catalog,
    ids: &mut SeenIds,
    report: &mut NormalizeReport,
) -> Option<Board> {
    let obj = value.as_object()?;
    let id = claim(&mut ids.boards, id_of(obj), report)?;
    let lists = array(obj.get("lists"))
        .iter()
        .filter_map(|list| normalize_list(list, catalog, ids, report))
        .collect();

    Some(Board {
        id,
        title: title_or(obj, "title", DEFAULT_BOARD_TITLE),
        background: string_field(obj, "background").filter(|value| !value.trim().is_empty()),
        lists,
    })
}

fn normalize_list(
    value: &Value,
    catalog: &Catalog,
    ids: &mut SeenIds,
    report: &mut NormalizeReport,
) -> Option<List> {
    let obj = value.as_object()?;
    let id = claim(&mut ids.lists, id_of(obj), report)?;
    let cards = array(obj.get("cards"))
        .iter()
        .filter_map(|card| normalize_card(card, catalog, ids, report))
        .collect();

    Some(List {
        id,
        title: title_or(obj, "title", DEFAULT_LIST_TITLE),
        cards,
    })
}

fn normalize_card(
    value: &Value,
    catalog: &Catalog,
    ids: &mut SeenIds,
    report: &mut NormalizeReport,
) -> Option<Card> {
    let obj = value.as_object()?;
    let id = claim(&mut ids.cards, id_of(obj), report)?;

    Some(Card {
        id,
        title: title_or(obj, "title", DEFAULT_CARD_TITLE),
        description: string_field(obj, "description").unwrap_or_default(),
        due_date: obj.get("dueDate").and_then(parse_due_date),
        archived: obj.get("archived").and_then(Value::as_bool).unwrap_or(false),
        members: dedup_refs(
            array(obj.get("members"))
                .iter()
                .filter_map(|value| catalog.resolve_member(value)),
        ),
        labels: dedup_refs(
            array(obj.get("labels"))
                .iter()
                .filter_map(|value| catalog.resolve_label(value)),
        ),
        checklists: normalize_checklists(obj, ids, report),
    })
}

/// Collects nested checklists from `checklists` and the legacy singular
/// `checklist` field. Loose items found in either are gathered into one
/// implicit checklist appended last.
fn normalize_checklists(
    card: &Object,
    ids: &mut SeenIds,
    report: &mut NormalizeReport,
) -> Vec<Checklist> {
    let mut checklists = Vec::new();
    let mut loose_items = Vec::new();

    let entries = array(card.get("checklists"))
        .iter()
        .chain(array(card.get("checklist")))
        .filter_map(Value::as_object);
    for obj in entries {
        if looks_like_item(obj) {
            loose_items.extend(normalize_item(obj, ids, report));
            continue;
        }
        let Some(id) = claim(&mut ids.checklists, id_of(obj), report) else {
            continue;
        };
        let items = array(obj.get("items"))
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|item| normalize_item(item, ids, report))
            .collect();
        checklists.push(Checklist {
            id,
            title: title_or(obj, "title", DEFAULT_CHECKLIST_TITLE),
            items,
        });
    }

    if !loose_items.is_empty() {
        if let Some(id) = claim(&mut ids.checklists, None, report) {
            checklists.push(Checklist {
                id,
                title: DEFAULT_CHECKLIST_TITLE.to_string(),
                items: loose_items,
            });
        }
    }
    checklists
}

fn looks_like_item(obj: &Object) -> bool {
    !obj.contains_key("items") && (obj.contains_key("text") || obj.contains_key("done"))
}

fn normalize_item(
    obj: &Object,
    ids: &mut SeenIds,
    report: &mut NormalizeReport,
) -> Option<ChecklistItem> {
    let id = claim(&mut ids.items, id_of(obj), report)?;
    Some(ChecklistItem {
        id,
        text: string_field(obj, "text").unwrap_or_default(),
        done: obj.get("done").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, or any string whose first ten
/// characters form a calendar date.
fn parse_due_date(value: &Value) -> Option<NaiveDate> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|stamp| stamp.date_naive())
        })
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

fn resolve_ref(
    value: &Value,
    known_ids: &HashSet<String>,
    by_name: &HashMap<String, String>,
) -> Option<String> {
    let (id, name) = match value {
        Value::String(text) => (Some(text.clone()), Some(text.clone())),
        Value::Number(number) => (Some(number.to_string()), None),
        Value::Object(obj) => (id_of(obj), string_field(obj, "name")),
        _ => return None,
    };

    if let Some(id) = id.as_ref().filter(|id| !id.trim().is_empty()) {
        if known_ids.contains(id) {
            return Some(id.clone());
        }
    }
    if let Some(found) = name
        .as_deref()
        .and_then(name_key)
        .and_then(|key| by_name.get(&key))
    {
        return Some(found.clone());
    }
    // Unresolvable ids stay as dangling references; they render as
    // placeholders.
    id.filter(|id| !id.trim().is_empty())
}

fn dedup_refs(refs: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    refs.filter(|id| seen.insert(id.clone())).collect()
}

fn array(value: Option<&Value>) -> &[Value] {
    value
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn id_of(obj: &Object) -> Option<String> {
    match obj.get("id")? {
        Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn string_field(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn title_or(obj: &Object, key: &str, fallback: &str) -> String {
    string_field(obj, key)
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn color_of(obj: &Object) -> LabelColor {
    obj.get("color")
        .and_then(Value::as_str)
        .map(LabelColor::parse_lenient)
        .unwrap_or_default()
}

pub(crate) fn name_key(name: &str) -> Option<String> {
    let trimmed = name.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{normalize_value, normalize_value_with_report, parse_due_date};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn non_object_root_yields_empty_snapshot() {
        assert!(normalize_value(&json!(42)).boards.is_empty());
        assert!(normalize_value(&json!(null)).labels.is_empty());
        assert!(normalize_value(&json!([1, 2])).members.is_empty());
    }

    #[test]
    fn due_date_accepts_plain_and_timestamp_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_due_date(&json!("2024-05-01")), expected);
        assert_eq!(parse_due_date(&json!("2024-05-01T09:30:00Z")), expected);
        assert_eq!(parse_due_date(&json!("2024-05-01T09:30:00.000")), expected);
        assert_eq!(parse_due_date(&json!("soon")), None);
        assert_eq!(parse_due_date(&json!(17)), None);
    }

    #[test]
    fn report_counts_generated_ids_and_duplicates() {
        let raw = json!({
            "boards": [
                { "title": "no id", "lists": [] },
                { "id": "b", "title": "one" },
                { "id": "b", "title": "dup" }
            ]
        });
        let (snapshot, report) = normalize_value_with_report(&raw);
        assert_eq!(snapshot.boards.len(), 2);
        assert_eq!(report.generated_ids, 1);
        assert_eq!(report.dropped_duplicates, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn embedded_label_objects_are_registered_before_name_resolution() {
        let raw = json!({
            "labels": [],
            "boards": [{
                "id": "b",
                "title": "B",
                "lists": [{
                    "id": "l",
                    "title": "L",
                    "cards": [
                        { "id": "c1", "title": "first", "labels": ["Infra"] },
                        { "id": "c2", "title": "second",
                          "labels": [{ "id": "x-infra", "name": "infra", "color": "teal" }] }
                    ]
                }]
            }]
        });
        let snapshot = normalize_value(&raw);
        assert_eq!(snapshot.labels.len(), 1);
        assert_eq!(snapshot.labels[0].id, "x-infra");
        assert_eq!(snapshot.card("c1").unwrap().labels, vec!["x-infra".to_string()]);
        assert_eq!(snapshot.card("c2").unwrap().labels, vec!["x-infra".to_string()]);
    }
}
