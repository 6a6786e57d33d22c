use serde_json::json;
use taskboard_core::model::normalize::normalize_value_with_report;
use taskboard_core::{normalize_snapshot, normalize_value, seed_snapshot, LabelColor, Snapshot};

#[test]
fn legacy_draft_is_collapsed_into_id_references() {
    let raw = json!({
        "members": ["Alice", { "id": "m2", "name": "Bob" }],
        "labels": [{ "id": "l-old", "name": "Old", "color": "#123" }],
        "boards": [{
            "id": "b1",
            "title": "Legacy",
            "lists": [{
                "id": "l1",
                "title": "Inbox",
                "cards": [{
                    "id": "c1",
                    "title": "Port me",
                    "dueDate": "2024-05-01T09:30:00Z",
                    "members": ["bob", { "id": "m9", "name": "Zed" }],
                    "labels": ["old", { "name": "Fresh", "color": "teal" }],
                    "checklist": [
                        { "text": "first", "done": true },
                        { "text": "second" }
                    ]
                }]
            }]
        }]
    });

    let snapshot = normalize_value(&raw);
    let card = snapshot.card("c1").unwrap();

    assert_eq!(card.due_date.unwrap().to_string(), "2024-05-01");
    assert_eq!(card.members[0], "m2");
    assert_eq!(card.members[1], "m9");
    assert!(snapshot.member("m9").is_some());

    assert_eq!(card.labels[0], "l-old");
    let fresh = snapshot
        .labels
        .iter()
        .find(|label| label.name == "Fresh")
        .unwrap();
    assert_eq!(card.labels[1], fresh.id);
    assert_eq!(fresh.color.as_str(), "teal");

    assert_eq!(card.checklists.len(), 1);
    assert_eq!(card.checklists[0].title, "Checklist");
    assert_eq!(card.checklists[0].items.len(), 2);
    assert!(card.checklists[0].items[0].done);
    assert_eq!(card.checklist_totals(), (1, 2));
}

#[test]
fn missing_fields_get_defaults_and_duplicate_ids_are_dropped() {
    let raw = json!({
        "boards": [{
            "id": "b1",
            "lists": [
                { "id": "l1", "cards": [{ "id": "c1" }, { "id": "c1", "title": "dup" }] },
                { "id": "l1", "title": "dup list" }
            ]
        }]
    });

    let (snapshot, report) = normalize_value_with_report(&raw);
    let board = snapshot.board("b1").unwrap();
    assert_eq!(board.title, "Untitled Board");
    assert_eq!(board.lists.len(), 1);
    assert_eq!(board.lists[0].title, "Untitled List");
    assert_eq!(board.lists[0].cards.len(), 1);

    let card = &board.lists[0].cards[0];
    assert_eq!(card.title, "Untitled Card");
    assert!(!card.archived);
    assert!(card.description.is_empty());
    assert_eq!(card.due_date, None);
    assert_eq!(report.dropped_duplicates, 2);
    assert!(snapshot.members.is_empty());
}

#[test]
fn malformed_label_colors_fall_back_to_gray() {
    let raw = json!({ "labels": [{ "id": "x", "name": "weird", "color": "#12345" }] });
    let snapshot = normalize_value(&raw);
    assert_eq!(snapshot.labels[0].color, LabelColor::default());
    assert_eq!(snapshot.labels[0].color.as_str(), "gray");
}

#[test]
fn normalization_is_idempotent_on_its_own_output() {
    let raw = json!({
        "members": ["Alice"],
        "boards": [{
            "title": "No ids",
            "lists": [{ "title": "L", "cards": [{ "title": "C", "members": ["alice"],
                "checklists": [{ "title": "T", "items": [{ "text": "x" }] }] }] }]
        }]
    });

    let once = normalize_value(&raw);
    let twice = normalize_value(&serde_json::to_value(&once).unwrap());
    assert_eq!(once, twice);
    assert_eq!(normalize_snapshot(&once), once);
}

#[test]
fn seed_survives_serialization_round_trip() {
    let seed = seed_snapshot();
    let raw = serde_json::to_string(&seed).unwrap();
    let reloaded: Snapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(reloaded, seed);
    assert_eq!(normalize_snapshot(&seed), seed);
}

#[test]
fn dangling_references_resolve_to_placeholders() {
    let raw = json!({
        "boards": [{ "id": "b", "title": "B", "lists": [{ "id": "l", "title": "L",
            "cards": [{ "id": "c", "title": "C", "labels": ["ghost"], "members": ["nobody"] }] }] }]
    });
    let snapshot = normalize_value(&raw);
    let card = snapshot.card("c").unwrap();

    let labels = snapshot.resolve_labels(card);
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].id, "ghost");
    assert_eq!(labels[0].color, LabelColor::default());

    let members = snapshot.resolve_members(card);
    assert_eq!(members[0].id, "nobody");
}
