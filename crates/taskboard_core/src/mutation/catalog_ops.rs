//! Global label catalog intents.

use crate::model::catalog::{Label, LabelColor};
use crate::model::normalize::name_key;
use crate::model::snapshot::Snapshot;
use crate::mutation::{MutationResult, ValidationError};
use log::debug;
use std::collections::HashSet;

/// Strictly parses a user-supplied label color.
pub fn parse_label_color(value: &str) -> MutationResult<LabelColor> {
    LabelColor::parse(value).ok_or_else(|| ValidationError::InvalidLabelColor(value.to_string()))
}

/// Appends `label` to the global catalog.
///
/// Duplicate suppression is by id: when a label with the same id already
/// exists the snapshot is returned unchanged. Two labels may share a name.
///
/// Dangling card references spelled like the new label's name are bound
/// to its id when it is the first label carrying that name, matching how
/// a reload resolves free-text references.
///
/// # Errors
/// - `BlankLabelId` when the id is blank after trim.
/// - `BlankLabelName` when the name is blank after trim.
/// - `InvalidLabelColor` when a hex color is malformed.
pub fn create_label(snapshot: &Snapshot, label: &Label) -> MutationResult<Snapshot> {
    if label.id.trim().is_empty() {
        return Err(ValidationError::BlankLabelId);
    }
    let name = label.name.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankLabelName);
    }
    if LabelColor::parse(label.color.as_str()).as_ref() != Some(&label.color) {
        return Err(ValidationError::InvalidLabelColor(label.color.to_string()));
    }
    if snapshot.label(&label.id).is_some() {
        debug!("event=mutation module=mutation op=create_label status=noop reason=label_exists");
        return Ok(snapshot.clone());
    }

    let mut next = snapshot.clone();
    next.labels
        .push(Label::with_id(label.id.clone(), name, label.color.clone()));
    bind_dangling_refs(&mut next, &label.id, name);
    Ok(next)
}

fn bind_dangling_refs(snapshot: &mut Snapshot, label_id: &str, name: &str) {
    let key = name_key(name);
    let first_with_name = snapshot
        .labels
        .iter()
        .find(|label| name_key(&label.name) == key)
        .map(|label| label.id.as_str());
    if key.is_none() || first_with_name != Some(label_id) {
        return;
    }

    let known: HashSet<String> = snapshot.labels.iter().map(|label| label.id.clone()).collect();
    let cards = snapshot
        .boards
        .iter_mut()
        .flat_map(|board| board.lists.iter_mut())
        .flat_map(|list| list.cards.iter_mut());
    let mut bound = 0usize;
    for card in cards {
        let mut changed = false;
        for reference in &mut card.labels {
            if !known.contains(reference.as_str()) && name_key(reference) == key {
                *reference = label_id.to_string();
                changed = true;
            }
        }
        if changed {
            let mut seen = HashSet::new();
            card.labels.retain(|id| seen.insert(id.clone()));
            bound += 1;
        }
    }
    if bound > 0 {
        debug!("event=mutation module=mutation op=create_label status=ok bound_cards={bound}");
    }
}
