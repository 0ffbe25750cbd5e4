use super::*;
use crate::view::{ListView, UiAction, EMPTY_PLACEHOLDER};
use chrono::{NaiveDate, NaiveTime};

fn party(id: i64, name: &str, location: &str) -> Party {
    Party {
        id: PartyId::Number(id),
        name: name.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("date"),
        time: None,
        location: location.to_string(),
        description: "Annual".to_string(),
    }
}

#[test]
fn empty_store_renders_single_placeholder() {
    let mut store = PartyStore::new();
    store.load(Vec::new());

    let nodes = store.render();
    assert_eq!(nodes, vec![DisplayNode::Placeholder(EMPTY_PLACEHOLDER)]);
    assert_eq!(nodes[0].to_string(), "No parties.");
    assert!(nodes[0].action().is_none());
}

#[test]
fn renders_one_node_per_party_with_its_fields() {
    let mut store = PartyStore::new();
    store.load(vec![party(1, "Gala", "Hall"), party(2, "Picnic", "Park")]);

    let nodes = store.render();
    assert_eq!(nodes.len(), 2);
    assert_eq!(
        nodes[0].to_string(),
        "Name: Gala\nDate: 2024-05-01\nLocation: Hall\nDescription: Annual"
    );
    assert!(nodes[1].to_string().contains("Picnic"));
    assert_eq!(
        nodes[1].action(),
        Some(&UiAction::Delete(PartyId::Number(2)))
    );
}

#[test]
fn time_line_only_appears_when_present() {
    let mut with_time = party(3, "Dinner", "Bistro");
    with_time.time = NaiveTime::from_hms_opt(19, 30, 0);

    let mut store = PartyStore::new();
    store.load(vec![with_time, party(4, "Lunch", "Cafe")]);

    let nodes = store.render();
    assert!(nodes[0].to_string().contains("Time: 19:30"));
    assert!(!nodes[1].to_string().contains("Time:"));
}

#[test]
fn render_is_idempotent_without_mutation() {
    let mut store = PartyStore::new();
    store.load(vec![party(1, "Gala", "Hall")]);
    assert_eq!(store.render(), store.render());
}

#[test]
fn load_replaces_instead_of_merging() {
    let mut store = PartyStore::new();
    store.load(vec![party(1, "Gala", "Hall"), party(2, "Picnic", "Park")]);
    store.load(vec![party(3, "Dinner", "Bistro")]);

    assert_eq!(store.len(), 1);
    assert!(store.get(&PartyId::Number(1)).is_none());
    assert_eq!(store.render().len(), 1);
}

#[test]
fn remove_leaves_remaining_party() {
    let mut store = PartyStore::new();
    store.load(vec![party(1, "Gala", "Hall"), party(2, "Picnic", "Park")]);

    assert!(store.remove(&PartyId::Number(1)));
    assert!(!store.remove(&PartyId::Number(1)));

    let nodes = store.render();
    assert_eq!(nodes.len(), 1);
    assert!(nodes[0].to_string().contains("Picnic"));
}

#[test]
fn append_keeps_server_order() {
    let mut store = PartyStore::new();
    store.load(vec![party(1, "Gala", "Hall")]);
    store.append(party(2, "Picnic", "Park"));

    let ids: Vec<_> = store.parties().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec![PartyId::Number(1), PartyId::Number(2)]);
    let nodes = store.render();
    assert!(nodes[0].to_string().contains("Gala"));
    assert!(nodes[1].to_string().contains("Picnic"));
}

#[test]
fn removing_last_party_falls_back_to_placeholder() {
    let mut store = PartyStore::new();
    store.load(vec![party(1, "Gala", "Hall")]);
    store.remove(&PartyId::Number(1));

    assert!(store.is_empty());
    assert!(store.render()[0].is_placeholder());
}

#[test]
fn list_view_delegates_actions_by_index() {
    let mut store = PartyStore::new();
    store.load(vec![party(1, "Gala", "Hall"), party(7, "Picnic", "Park")]);

    let mut view = ListView::default();
    assert_eq!(view.action_at(0), None);

    view.replace(store.render());
    assert_eq!(view.len(), 2);
    assert_eq!(view.action_at(1), Some(UiAction::Delete(PartyId::Number(7))));
    assert_eq!(view.action_at(2), None);
}
