use ledgerdesk_core::{
    InitOutcome, InitState, RecordStore, ReconcileStrategy, StoreInitializer, StoreRecord,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Item {
    id: String,
    label: String,
}

fn item(id: &str, label: &str) -> Item {
    Item {
        id: id.to_string(),
        label: label.to_string(),
    }
}

impl StoreRecord for Item {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

#[test]
fn first_render_seeds_empty_store() {
    let mut store = RecordStore::new();
    let mut init = StoreInitializer::default();
    assert_eq!(init.state(), InitState::Uninitialized);

    let outcome = init.on_render(&mut store, &[item("a", "1")]);

    assert_eq!(outcome, InitOutcome::Seeded);
    assert_eq!(init.state(), InitState::Seeded);
    assert_eq!(store.all(), [item("a", "1")]);
}

#[test]
fn later_renders_never_touch_the_store() {
    let mut store = RecordStore::new();
    let mut init = StoreInitializer::default();
    init.on_render(&mut store, &[item("a", "1")]);

    store.add(item("b", "local"));
    let outcome = init.on_render(&mut store, &[item("z", "server")]);

    assert_eq!(outcome, InitOutcome::Skipped);
    assert_eq!(store.all(), [item("a", "1"), item("b", "local")]);
}

#[test]
fn first_render_with_matching_store_is_in_sync() {
    let mut store = RecordStore::new();
    store.seed(vec![item("a", "1")]);
    let mut init = StoreInitializer::new(ReconcileStrategy::KeyDiff);

    assert_eq!(init.on_render(&mut store, &[item("a", "1")]), InitOutcome::InSync);
    assert_eq!(init.state(), InitState::Seeded);
}

#[test]
fn empty_snapshot_and_empty_store_transition_without_seeding() {
    let mut store = RecordStore::<Item>::new();
    let mut init = StoreInitializer::default();

    assert_eq!(init.on_render(&mut store, &[]), InitOutcome::InSync);
    assert_eq!(init.state(), InitState::Seeded);
    assert_eq!(init.on_render(&mut store, &[item("a", "1")]), InitOutcome::Skipped);
    assert!(store.is_empty());
}

#[test]
fn key_diff_reseeds_same_length_with_different_ids() {
    let mut store = RecordStore::new();
    store.seed(vec![item("a", "1"), item("b", "2")]);
    let mut init = StoreInitializer::new(ReconcileStrategy::KeyDiff);

    let outcome = init.on_render(&mut store, &[item("a", "1"), item("c", "3")]);

    assert_eq!(outcome, InitOutcome::Seeded);
    assert_eq!(store.all(), [item("a", "1"), item("c", "3")]);
}

#[test]
fn key_diff_reseeds_changed_content() {
    let mut store = RecordStore::new();
    store.seed(vec![item("a", "old")]);
    let mut init = StoreInitializer::new(ReconcileStrategy::KeyDiff);

    assert_eq!(init.on_render(&mut store, &[item("a", "new")]), InitOutcome::Seeded);
    assert_eq!(store.get("a").unwrap().label, "new");
}

#[test]
fn length_heuristic_misses_same_count_edits() {
    let mut store = RecordStore::new();
    store.seed(vec![item("a", "1"), item("b", "2")]);
    let mut init = StoreInitializer::new(ReconcileStrategy::LengthHeuristic);

    let outcome = init.on_render(&mut store, &[item("a", "1"), item("c", "3")]);

    assert_eq!(outcome, InitOutcome::InSync);
    assert_eq!(store.all(), [item("a", "1"), item("b", "2")]);
}

#[test]
fn length_heuristic_seeds_on_count_change() {
    let mut store = RecordStore::new();
    store.seed(vec![item("a", "1")]);
    let mut init = StoreInitializer::new(ReconcileStrategy::LengthHeuristic);

    let outcome = init.on_render(&mut store, &[item("a", "1"), item("b", "2")]);

    assert_eq!(outcome, InitOutcome::Seeded);
    assert_eq!(store.len(), 2);
}

#[test]
fn each_mount_gets_its_own_first_render() {
    let mut store = RecordStore::new();
    let mut first_mount = StoreInitializer::default();
    first_mount.on_render(&mut store, &[item("a", "1")]);

    let mut second_mount = StoreInitializer::default();
    let outcome = second_mount.on_render(&mut store, &[item("a", "1"), item("b", "2")]);

    assert_eq!(outcome, InitOutcome::Seeded);
    assert_eq!(store.len(), 2);
}
