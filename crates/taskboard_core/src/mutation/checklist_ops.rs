//! Checklist intents, each scoped to one card.
//!
//! All operations are no-ops when the card, checklist or item id does not
//! resolve.

use crate::model::board::{
    Card, Checklist, ChecklistId, ChecklistItem, ChecklistItemId, DEFAULT_CHECKLIST_ITEM_TEXT,
    DEFAULT_CHECKLIST_TITLE,
};
use crate::model::snapshot::Snapshot;
use crate::mutation::{coerce_title, edit_card};

/// Appends a new empty checklist to a card.
pub fn add_checklist(
    snapshot: &Snapshot,
    card_id: &str,
    title: &str,
) -> (Snapshot, Option<ChecklistId>) {
    let checklist = Checklist::new(coerce_title(title, DEFAULT_CHECKLIST_TITLE));
    edit_card(snapshot, "add_checklist", card_id, |card| {
        let checklist_id = checklist.id.clone();
        card.checklists.push(checklist);
        checklist_id
    })
}

pub fn rename_checklist(
    snapshot: &Snapshot,
    card_id: &str,
    checklist_id: &str,
    title: &str,
) -> Snapshot {
    let title = coerce_title(title, DEFAULT_CHECKLIST_TITLE);
    edit_checklist(snapshot, "rename_checklist", card_id, checklist_id, |checklist| {
        checklist.title = title
    })
    .0
}

pub fn remove_checklist(snapshot: &Snapshot, card_id: &str, checklist_id: &str) -> Snapshot {
    if !has_checklist(snapshot, card_id, checklist_id) {
        return snapshot.clone();
    }
    edit_card(snapshot, "remove_checklist", card_id, |card| {
        card.checklists.retain(|checklist| checklist.id != checklist_id)
    })
    .0
}

/// Appends an unchecked item; blank text becomes "New item".
pub fn add_checklist_item(
    snapshot: &Snapshot,
    card_id: &str,
    checklist_id: &str,
    text: &str,
) -> (Snapshot, Option<ChecklistItemId>) {
    let item = ChecklistItem::new(coerce_title(text, DEFAULT_CHECKLIST_ITEM_TEXT));
    edit_checklist(snapshot, "add_checklist_item", card_id, checklist_id, |checklist| {
        let item_id = item.id.clone();
        checklist.items.push(item);
        item_id
    })
}

/// Replaces an item's text verbatim.
pub fn edit_checklist_item(
    snapshot: &Snapshot,
    card_id: &str,
    checklist_id: &str,
    item_id: &str,
    text: &str,
) -> Snapshot {
    edit_item(snapshot, "edit_checklist_item", card_id, checklist_id, item_id, |item| {
        item.text = text.to_string()
    })
}

pub fn toggle_checklist_item(
    snapshot: &Snapshot,
    card_id: &str,
    checklist_id: &str,
    item_id: &str,
) -> Snapshot {
    edit_item(snapshot, "toggle_checklist_item", card_id, checklist_id, item_id, |item| {
        item.done = !item.done
    })
}

pub fn remove_checklist_item(
    snapshot: &Snapshot,
    card_id: &str,
    checklist_id: &str,
    item_id: &str,
) -> Snapshot {
    if find_item(snapshot, card_id, checklist_id, item_id).is_none() {
        return snapshot.clone();
    }
    edit_checklist(snapshot, "remove_checklist_item", card_id, checklist_id, |checklist| {
        checklist.items.retain(|item| item.id != item_id)
    })
    .0
}

fn has_checklist(snapshot: &Snapshot, card_id: &str, checklist_id: &str) -> bool {
    snapshot
        .card(card_id)
        .and_then(|card| card.checklist(checklist_id))
        .is_some()
}

fn find_item<'a>(
    snapshot: &'a Snapshot,
    card_id: &str,
    checklist_id: &str,
    item_id: &str,
) -> Option<&'a ChecklistItem> {
    snapshot
        .card(card_id)?
        .checklist(checklist_id)?
        .items
        .iter()
        .find(|item| item.id == item_id)
}

fn edit_checklist<T>(
    snapshot: &Snapshot,
    op: &'static str,
    card_id: &str,
    checklist_id: &str,
    edit: impl FnOnce(&mut Checklist) -> T,
) -> (Snapshot, Option<T>) {
    if !has_checklist(snapshot, card_id, checklist_id) {
        log::debug!("event=mutation module=mutation op={op} status=noop reason=checklist_missing");
        return (snapshot.clone(), None);
    }
    let (next, output) = edit_card(snapshot, op, card_id, |card: &mut Card| {
        card.checklists
            .iter_mut()
            .find(|checklist| checklist.id == checklist_id)
            .map(edit)
    });
    (next, output.flatten())
}

fn edit_item(
    snapshot: &Snapshot,
    op: &'static str,
    card_id: &str,
    checklist_id: &str,
    item_id: &str,
    edit: impl FnOnce(&mut ChecklistItem),
) -> Snapshot {
    if find_item(snapshot, card_id, checklist_id, item_id).is_none() {
        log::debug!("event=mutation module=mutation op={op} status=noop reason=item_missing");
        return snapshot.clone();
    }
    edit_checklist(snapshot, op, card_id, checklist_id, |checklist| {
        if let Some(item) = checklist.items.iter_mut().find(|item| item.id == item_id) {
            edit(item);
        }
    })
    .0
}
