//! Card intents: create, patch, archive, and label/member toggles.

use crate::model::board::{
    Card, CardId, CardPatch, Checklist, ChecklistItem, DEFAULT_CARD_TITLE, DEFAULT_CHECKLIST_TITLE,
};
use crate::model::new_id;
use crate::model::snapshot::Snapshot;
use crate::mutation::{coerce_title, edit_card, edit_list, MutationResult, ValidationError};
use log::debug;
use std::collections::HashSet;

/// Appends a fresh card to a list.
///
/// Returns `None` for the id when the list does not resolve.
pub fn create_card(snapshot: &Snapshot, list_id: &str, title: &str) -> (Snapshot, Option<CardId>) {
    let card = Card::new(coerce_title(title, DEFAULT_CARD_TITLE));
    edit_list(snapshot, "create_card", list_id, |list| {
        let card_id = card.id.clone();
        list.cards.push(card);
        card_id
    })
}

/// Applies a partial update to a card.
///
/// `id` is always preserved and `archived` only changes when the patch
/// carries it. Patch checklists are stored in canonical form: blank
/// titles become the default title and blank checklist/item ids are
/// replaced with fresh ones.
///
/// # Errors
/// - `UnknownLabel` / `UnknownMember` when the patch adds a reference that
///   is not in the global catalog. References already on the card are
///   kept even if they dangle.
/// - `DuplicateChecklistId` / `DuplicateChecklistItemId` when patch
///   checklists collide with each other or with another card's.
pub fn update_card(snapshot: &Snapshot, card_id: &str, patch: &CardPatch) -> MutationResult<Snapshot> {
    let Some(current) = snapshot.card(card_id) else {
        debug!("event=mutation module=mutation op=update_card status=noop reason=card_missing");
        return Ok(snapshot.clone());
    };

    if let Some(labels) = &patch.labels {
        if let Some(unknown) = labels
            .iter()
            .find(|id| !current.has_label(id) && snapshot.label(id).is_none())
        {
            return Err(ValidationError::UnknownLabel(unknown.clone()));
        }
    }
    if let Some(members) = &patch.members {
        if let Some(unknown) = members
            .iter()
            .find(|id| !current.has_member(id) && snapshot.member(id).is_none())
        {
            return Err(ValidationError::UnknownMember(unknown.clone()));
        }
    }
    let checklists = patch.checklists.as_deref().map(canonical_checklists);
    if let Some(checklists) = &checklists {
        ensure_checklist_ids_free(snapshot, card_id, checklists)?;
    }

    let (next, _) = edit_card(snapshot, "update_card", card_id, |card| {
        if let Some(title) = &patch.title {
            card.title = coerce_title(title, DEFAULT_CARD_TITLE);
        }
        if let Some(description) = &patch.description {
            card.description = description.clone();
        }
        if let Some(due_date) = patch.due_date {
            card.due_date = due_date;
        }
        if let Some(labels) = &patch.labels {
            card.labels = dedup(labels);
        }
        if let Some(members) = &patch.members {
            card.members = dedup(members);
        }
        if let Some(checklists) = checklists {
            card.checklists = checklists;
        }
        if let Some(archived) = patch.archived {
            card.archived = archived;
        }
    });
    Ok(next)
}

/// Flags a card as archived. Idempotent; the card keeps its position.
pub fn archive_card(snapshot: &Snapshot, card_id: &str) -> Snapshot {
    edit_card(snapshot, "archive_card", card_id, |card| card.archived = true).0
}

/// Clears the archived flag.
pub fn restore_card(snapshot: &Snapshot, card_id: &str) -> Snapshot {
    edit_card(snapshot, "restore_card", card_id, |card| card.archived = false).0
}

/// Adds or removes a label reference on a card.
///
/// Adding requires the label to exist globally; removing works even for a
/// dangling reference.
pub fn toggle_card_label(snapshot: &Snapshot, card_id: &str, label_id: &str) -> Snapshot {
    let Some(card) = snapshot.card(card_id) else {
        debug!("event=mutation module=mutation op=toggle_card_label status=noop reason=card_missing");
        return snapshot.clone();
    };
    if !card.has_label(label_id) && snapshot.label(label_id).is_none() {
        debug!("event=mutation module=mutation op=toggle_card_label status=noop reason=label_missing");
        return snapshot.clone();
    }
    edit_card(snapshot, "toggle_card_label", card_id, |card| {
        toggle(&mut card.labels, label_id)
    })
    .0
}

/// Adds or removes a member reference on a card.
///
/// Adding requires the member to exist globally; removing works even for
/// a dangling reference.
pub fn toggle_card_member(snapshot: &Snapshot, card_id: &str, member_id: &str) -> Snapshot {
    let Some(card) = snapshot.card(card_id) else {
        debug!("event=mutation module=mutation op=toggle_card_member status=noop reason=card_missing");
        return snapshot.clone();
    };
    if !card.has_member(member_id) && snapshot.member(member_id).is_none() {
        debug!("event=mutation module=mutation op=toggle_card_member status=noop reason=member_missing");
        return snapshot.clone();
    }
    edit_card(snapshot, "toggle_card_member", card_id, |card| {
        toggle(&mut card.members, member_id)
    })
    .0
}

fn toggle(ids: &mut Vec<String>, id: &str) {
    if let Some(index) = ids.iter().position(|existing| existing == id) {
        ids.remove(index);
    } else {
        ids.push(id.to_string());
    }
}

fn dedup(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

fn canonical_checklists(checklists: &[Checklist]) -> Vec<Checklist> {
    checklists
        .iter()
        .map(|checklist| Checklist {
            id: id_or_fresh(&checklist.id),
            title: coerce_title(&checklist.title, DEFAULT_CHECKLIST_TITLE),
            items: checklist
                .items
                .iter()
                .map(|item| ChecklistItem {
                    id: id_or_fresh(&item.id),
                    ..item.clone()
                })
                .collect(),
        })
        .collect()
}

fn id_or_fresh(id: &str) -> String {
    if id.trim().is_empty() {
        new_id()
    } else {
        id.to_string()
    }
}

fn ensure_checklist_ids_free(
    snapshot: &Snapshot,
    card_id: &str,
    checklists: &[Checklist],
) -> MutationResult<()> {
    let mut taken_checklists = HashSet::new();
    let mut taken_items = HashSet::new();
    let other_cards = snapshot
        .boards
        .iter()
        .flat_map(|board| board.lists.iter())
        .flat_map(|list| list.cards.iter())
        .filter(|card| card.id != card_id);
    for checklist in other_cards.flat_map(|card| card.checklists.iter()) {
        taken_checklists.insert(checklist.id.as_str());
        taken_items.extend(checklist.items.iter().map(|item| item.id.as_str()));
    }

    for checklist in checklists {
        if !taken_checklists.insert(checklist.id.as_str()) {
            return Err(ValidationError::DuplicateChecklistId(checklist.id.clone()));
        }
        for item in &checklist.items {
            if !taken_items.insert(item.id.as_str()) {
                return Err(ValidationError::DuplicateChecklistItemId(item.id.clone()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{create_card, toggle_card_label, update_card};
    use crate::model::board::{CardPatch, Checklist, ChecklistItem};
    use crate::model::seed::seed_snapshot;
    use crate::mutation::ValidationError;

    #[test]
    fn create_card_starts_empty_and_unarchived() {
        let base = seed_snapshot();
        let (next, card_id) = create_card(&base, "l2", "");
        let card = next.card(&card_id.unwrap()).unwrap();

        assert_eq!(card.title, "Untitled Card");
        assert!(card.description.is_empty());
        assert!(card.labels.is_empty() && card.members.is_empty());
        assert!(card.checklists.is_empty());
        assert!(!card.archived);
    }

    #[test]
    fn update_card_keeps_existing_dangling_refs_but_rejects_new_ones() {
        let mut base = seed_snapshot();
        base.boards[0].lists[0].cards[0].labels.push("l-retired".to_string());

        let keep = CardPatch {
            labels: Some(vec!["l-retired".to_string(), "l-bug".to_string()]),
            ..CardPatch::default()
        };
        let next = update_card(&base, "c1", &keep).unwrap();
        assert_eq!(next.card("c1").unwrap().labels, vec!["l-retired", "l-bug"]);

        let introduce = CardPatch {
            labels: Some(vec!["l-nowhere".to_string()]),
            ..CardPatch::default()
        };
        assert_eq!(
            update_card(&base, "c1", &introduce).unwrap_err(),
            ValidationError::UnknownLabel("l-nowhere".to_string())
        );
    }

    #[test]
    fn update_card_stores_patch_checklists_in_canonical_form() {
        let base = seed_snapshot();
        let patch = CardPatch {
            checklists: Some(vec![Checklist {
                id: String::new(),
                title: "   ".to_string(),
                items: vec![ChecklistItem {
                    id: " ".to_string(),
                    text: "tables".to_string(),
                    done: true,
                }],
            }]),
            ..CardPatch::default()
        };

        let next = update_card(&base, "c2", &patch).unwrap();
        let checklist = &next.card("c2").unwrap().checklists[0];
        assert_eq!(checklist.title, "Checklist");
        assert!(!checklist.id.trim().is_empty());
        assert!(!checklist.items[0].id.trim().is_empty());
        assert_eq!(checklist.items[0].text, "tables");
        assert!(checklist.items[0].done);
    }

    #[test]
    fn toggle_label_ignores_unknown_label() {
        let base = seed_snapshot();
        assert_eq!(toggle_card_label(&base, "c1", "l-nowhere"), base);
    }
}
