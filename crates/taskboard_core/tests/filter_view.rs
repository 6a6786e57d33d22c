use chrono::NaiveDate;
use taskboard_core::mutation::card_ops::{archive_card, update_card};
use taskboard_core::{
    archived_cards, filter_board, seed_snapshot, CardPatch, CardStatus, DueBucket, FilterSpec,
    Snapshot,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

fn with_due(snapshot: &Snapshot, card_id: &str, due: &str) -> Snapshot {
    let patch = CardPatch {
        due_date: Some(Some(NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap())),
        ..CardPatch::default()
    };
    update_card(snapshot, card_id, &patch).unwrap()
}

fn visible_ids(snapshot: &Snapshot, spec: &FilterSpec) -> Vec<String> {
    filter_board(snapshot, "b1", spec, today())
        .unwrap()
        .lists
        .iter()
        .flat_map(|list| list.cards.iter().map(|card| card.id.clone()))
        .collect()
}

#[test]
fn inactive_filter_shows_every_unarchived_card() {
    let snapshot = archive_card(&seed_snapshot(), "c2");
    let view = filter_board(&snapshot, "b1", &FilterSpec::default(), today()).unwrap();

    assert_eq!(view.lists.len(), 3);
    assert_eq!(visible_ids(&snapshot, &FilterSpec::default()), vec!["c1"]);
    assert!(snapshot.card("c2").unwrap().archived);
}

#[test]
fn dimensions_combine_with_and() {
    let snapshot = seed_snapshot();
    let spec = FilterSpec {
        keyword: "setup".to_string(),
        labels: ["l-frontend".to_string()].into_iter().collect(),
        ..FilterSpec::default()
    };
    assert_eq!(visible_ids(&snapshot, &spec), vec!["c1"]);

    let spec = FilterSpec {
        keyword: "setup".to_string(),
        members: ["m2".to_string()].into_iter().collect(),
        ..FilterSpec::default()
    };
    assert!(visible_ids(&snapshot, &spec).is_empty());
}

#[test]
fn member_and_label_sets_match_any_element() {
    let snapshot = seed_snapshot();
    let spec = FilterSpec {
        members: ["m1".to_string(), "m2".to_string()].into_iter().collect(),
        ..FilterSpec::default()
    };
    assert_eq!(visible_ids(&snapshot, &spec), vec!["c1", "c2"]);
}

#[test]
fn status_filter_uses_checklist_completion() {
    let snapshot = seed_snapshot();
    let complete = FilterSpec {
        status: Some(CardStatus::Complete),
        ..FilterSpec::default()
    };
    assert_eq!(visible_ids(&snapshot, &complete), vec!["c1"]);

    let incomplete = FilterSpec {
        status: Some(CardStatus::Incomplete),
        ..FilterSpec::default()
    };
    assert_eq!(visible_ids(&snapshot, &incomplete), vec!["c2"]);
}

#[test]
fn due_buckets_select_cards_relative_to_today() {
    let snapshot = with_due(&seed_snapshot(), "c1", "2024-03-09");
    let snapshot = with_due(&snapshot, "c2", "2024-03-15");

    let overdue = FilterSpec {
        due: Some(DueBucket::Overdue),
        ..FilterSpec::default()
    };
    assert_eq!(visible_ids(&snapshot, &overdue), vec!["c1"]);

    let next_week = FilterSpec {
        due: Some(DueBucket::NextWeek),
        ..FilterSpec::default()
    };
    assert_eq!(visible_ids(&snapshot, &next_week), vec!["c2"]);

    let next_day = FilterSpec {
        due: Some(DueBucket::NextDay),
        ..FilterSpec::default()
    };
    assert!(visible_ids(&snapshot, &next_day).is_empty());
}

#[test]
fn unknown_board_yields_no_view() {
    assert!(filter_board(&seed_snapshot(), "nope", &FilterSpec::default(), today()).is_none());
}

#[test]
fn archived_query_lists_cards_with_their_list() {
    let snapshot = archive_card(&seed_snapshot(), "c2");
    let archived = archived_cards(&snapshot, "b1");
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].list_id, "l1");
    assert_eq!(archived[0].card.id, "c2");
    assert!(archived_cards(&snapshot, "nope").is_empty());
}
